//! Configuration types for the engine

use crate::{
    error::{EngineError, Result},
    executor::ExecutionMode,
};
use corpstat_core::WindowSides;
use std::collections::BTreeSet;

/// Sentences per chunk unless configured otherwise
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;
/// Pool construction retries after the first attempt
pub const DEFAULT_POOL_RETRIES: usize = 2;
/// Collocation window in tokens
pub const DEFAULT_WINDOW: usize = 2;
/// Subjects selected by general collocation
pub const DEFAULT_TOP_K: usize = 1000;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Sentences per chunk
    pub chunk_size: usize,
    /// Number of worker threads (None = one per logical CPU)
    pub threads: Option<usize>,
    /// Execution mode selector
    pub execution_mode: ExecutionMode,
    /// How often a failed worker pool build is retried
    pub pool_retries: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            threads: None,
            execution_mode: ExecutionMode::Adaptive,
            pool_retries: DEFAULT_POOL_RETRIES,
        }
    }
}

impl EngineConfig {
    /// Start building a configuration
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::new()
    }

    /// Single-threaded configuration
    pub fn sequential() -> Self {
        Self {
            threads: Some(1),
            execution_mode: ExecutionMode::Sequential,
            ..Default::default()
        }
    }

    /// Reject zero chunk sizes and zero thread counts
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(EngineError::ConfigError(
                "chunk_size must be greater than 0".to_string(),
            ));
        }
        if self.threads == Some(0) {
            return Err(EngineError::ConfigError(
                "threads must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolved worker count
    pub fn thread_count(&self) -> usize {
        self.threads.unwrap_or_else(available_threads)
    }
}

#[cfg(feature = "parallel")]
fn available_threads() -> usize {
    num_cpus::get()
}

#[cfg(not(feature = "parallel"))]
fn available_threads() -> usize {
    1
}

/// Builder for EngineConfig
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Create a builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set sentences per chunk
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the thread count
    pub fn threads(mut self, count: Option<usize>) -> Self {
        self.config.threads = count;
        self
    }

    /// Set the execution mode
    pub fn execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.config.execution_mode = mode;
        self
    }

    /// Set how often pool construction is retried
    pub fn pool_retries(mut self, retries: usize) -> Self {
        self.config.pool_retries = retries;
        self
    }

    /// Validate and build the configuration
    pub fn build(self) -> Result<EngineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Options for n-gram frequency counting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyOptions {
    /// N-gram length
    pub n: usize,
    /// Entries with a global count at or below this are dropped; 0 keeps all
    pub discard_threshold: u64,
    /// Keep only the most frequent entries in the ranking
    pub limit: Option<usize>,
}

impl Default for FrequencyOptions {
    fn default() -> Self {
        Self {
            n: 1,
            discard_threshold: 0,
            limit: None,
        }
    }
}

impl FrequencyOptions {
    /// Options for `n`-grams with no threshold or limit
    pub fn new(n: usize) -> Self {
        Self {
            n,
            ..Default::default()
        }
    }
}

/// Options for collocation around caller-chosen subjects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecificCollocateOptions {
    /// Subject words
    pub subjects: BTreeSet<String>,
    /// Maximum collocate length in tokens
    pub window: usize,
    /// Which sides of a subject are scanned
    pub sides: WindowSides,
}

impl SpecificCollocateOptions {
    /// Options for `subjects` with the default window
    pub fn new<I, S>(subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            subjects: subjects.into_iter().map(Into::into).collect(),
            window: DEFAULT_WINDOW,
            sides: WindowSides::default(),
        }
    }
}

/// Options for collocation around the most frequent words
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneralCollocateOptions {
    /// Maximum collocate length in tokens
    pub window: usize,
    /// Number of most frequent words used as subjects
    pub top_k: usize,
    /// Which sides of a subject are scanned
    pub sides: WindowSides,
    /// Collocates kept per subject before the merged ranking; `None` keeps all
    pub per_subject_limit: Option<usize>,
    /// Length of the merged ranking
    pub limit: Option<usize>,
}

impl Default for GeneralCollocateOptions {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            top_k: DEFAULT_TOP_K,
            sides: WindowSides::default(),
            per_subject_limit: None,
            limit: None,
        }
    }
}

/// The statistic a job computes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Analysis {
    /// N-gram frequencies
    Frequency(FrequencyOptions),
    /// Part-of-speech tag transitions
    Transitions,
    /// Collocates of the given subjects
    SpecificCollocate(SpecificCollocateOptions),
    /// Collocates of the most frequent words
    GeneralCollocate(GeneralCollocateOptions),
}

impl Analysis {
    /// Short name used in logs and reports
    pub fn name(&self) -> &'static str {
        match self {
            Analysis::Frequency(_) => "frequency",
            Analysis::Transitions => "transitions",
            Analysis::SpecificCollocate(_) => "specific-collocate",
            Analysis::GeneralCollocate(_) => "general-collocate",
        }
    }

    /// Check the parameters before any work starts
    pub fn validate(&self) -> Result<()> {
        match self {
            Analysis::Frequency(options) => {
                positive("n", options.n)?;
                positive_limit("limit", options.limit)
            }
            Analysis::Transitions => Ok(()),
            Analysis::SpecificCollocate(options) => {
                positive("window", options.window)?;
                if options.subjects.is_empty() {
                    return Err(EngineError::ConfigError(
                        "at least one subject is required".to_string(),
                    ));
                }
                let invalid = options
                    .subjects
                    .iter()
                    .find(|s| s.is_empty() || s.chars().any(char::is_whitespace));
                if let Some(subject) = invalid {
                    return Err(EngineError::ConfigError(format!(
                        "invalid subject {subject:?}"
                    )));
                }
                Ok(())
            }
            Analysis::GeneralCollocate(options) => {
                positive("window", options.window)?;
                positive("top_k", options.top_k)?;
                positive_limit("per_subject_limit", options.per_subject_limit)?;
                positive_limit("limit", options.limit)
            }
        }
    }
}

fn positive(name: &str, value: usize) -> Result<()> {
    if value == 0 {
        return Err(EngineError::ConfigError(format!(
            "{name} must be greater than 0"
        )));
    }
    Ok(())
}

fn positive_limit(name: &str, value: Option<usize>) -> Result<()> {
    match value {
        Some(limit) => positive(name, limit),
        None => Ok(()),
    }
}
