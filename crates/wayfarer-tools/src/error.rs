//! Error types for wayfarer-tools

use thiserror::Error;

/// Capability error type
#[derive(Debug, Error)]
pub enum Error {
    /// Capability not found in the registry
    #[error("capability not found: {0}")]
    NotFound(String),

    /// Invalid input arguments
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Invocation failed
    #[error("invocation failed: {0}")]
    Execution(String),

    /// Network error
    #[error("network error: {0}")]
    Network(String),

    /// Invocation timed out
    #[error("invocation timed out after {0}ms")]
    Timeout(u64),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
