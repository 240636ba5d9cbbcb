//! Error types for running suite trees.

use nestspec_core::SuiteError;

/// Errors produced outside of spec outcomes: tree construction and report I/O.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("suite construction failed: {0}")]
    Suite(#[from] SuiteError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for runner operations.
pub type Result<T> = std::result::Result<T, RunnerError>;
