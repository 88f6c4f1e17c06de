//! Core error types (deterministic only)

use thiserror::Error;

/// Core algorithm errors (no I/O, no external failures)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A counter or scorer parameter is out of range
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Why the parameter was rejected
        reason: String,
    },

    /// A token whose word form is empty or contains whitespace
    #[error("malformed token {token} in sentence {sentence}: word form is empty or contains whitespace")]
    MalformedToken {
        /// Sentence index within the chunk being counted
        sentence: usize,
        /// Token index within the sentence
        token: usize,
    },
}

impl CoreError {
    /// Shorthand for [`CoreError::InvalidConfig`]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        CoreError::InvalidConfig {
            reason: reason.into(),
        }
    }
}

/// Result type for core operations
pub type Result<T> = core::result::Result<T, CoreError>;
