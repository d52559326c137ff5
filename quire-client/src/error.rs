//! Error types for the queue client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when pulling from the queue
///
/// Timeouts and non-200 responses are not errors; `fetch` reports them as
/// "no data".
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connection refused, DNS, TLS, ...)
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Response body was not the expected JSON
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// The client could not be built from the given settings
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
