//! Error types for zephyr-core

use thiserror::Error;

/// Result type alias for zephyr operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the zephyr servers
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid HTTP method
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// Invalid path
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Listen address could not be parsed
    #[error("Invalid listen address: {0}")]
    InvalidAddress(String),

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error (bind, accept, runtime startup)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
