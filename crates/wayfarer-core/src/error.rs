//! Error types for wayfarer-core
//!
//! Capability and inference failures never surface here; they are absorbed
//! into failed results and degraded turns. Only routing exhaustion and a
//! deadline with no output end a run with an error.

use thiserror::Error;

/// Orchestration error type
#[derive(Debug, Error)]
pub enum Error {
    /// No eligible worker could be found for an outstanding requirement
    #[error("no eligible worker for request: {0}")]
    RoutingExhausted(String),

    /// The run deadline passed before any worker produced output
    #[error("run deadline exceeded with no worker output")]
    DeadlineExceeded,

    /// Invalid configuration
    #[error("invalid configuration: {field}: {message}")]
    InvalidConfig {
        /// Configuration field name
        field: String,
        /// What is wrong with it
        message: String,
    },

    /// Inference provider error
    #[error("llm error: {0}")]
    Llm(#[from] wayfarer_llm::Error),

    /// Capability error
    #[error("capability error: {0}")]
    Capability(#[from] wayfarer_tools::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
