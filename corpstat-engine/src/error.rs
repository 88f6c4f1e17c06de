//! Layered error types
//!
//! Core errors are deterministic and never retried. Pool construction
//! failures are the only transient errors.

use crate::job::JobState;
use corpstat_core::CoreError;
use thiserror::Error;

/// Engine-level errors (Application Layer)
#[derive(Error, Debug)]
pub enum EngineError {
    /// Core algorithm error
    #[error("core algorithm error: {0}")]
    Core(#[from] CoreError),

    /// Configuration error, raised before any chunking
    #[error("invalid configuration: {0}")]
    ConfigError(String),

    /// Counting a chunk failed
    #[error("chunk {chunk} failed at corpus sentence {sentence}: {source}")]
    ChunkFailed {
        /// Index of the failing chunk
        chunk: usize,
        /// Corpus offset of the offending sentence
        sentence: usize,
        /// The counting error
        #[source]
        source: CoreError,
    },

    /// The worker pool could not be built
    #[error("thread pool unavailable after {attempts} attempt(s): {reason}")]
    ThreadPool {
        /// How many builds were attempted
        attempts: usize,
        /// The last build error
        reason: String,
    },

    /// A job tried to leave its linear stage order
    #[error("invalid job transition from {from} to {to}")]
    InvalidTransition {
        /// Current stage
        from: JobState,
        /// Requested stage
        to: JobState,
    },

    /// A job failed; carries the stage it was in
    #[error("{analysis} job failed during {stage}: {source}")]
    JobFailed {
        /// Analysis name
        analysis: &'static str,
        /// The stage that failed
        stage: JobState,
        /// The underlying error
        #[source]
        source: Box<EngineError>,
    },
}

impl EngineError {
    /// Whether retrying the failed operation could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            EngineError::ThreadPool { .. } => true,
            EngineError::JobFailed { source, .. } => source.is_transient(),
            _ => false,
        }
    }

    /// The stage a failed job stopped in
    pub fn failed_stage(&self) -> Option<JobState> {
        match self {
            EngineError::JobFailed { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
