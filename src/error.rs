//! Error types for the wellness backend.

use thiserror::Error;

/// Failures while reading from the backend. The fetcher turns these into
/// empty records; only the school listing surfaces them.
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Backend answered with a non-success status.
    #[error("backend returned status {0}")]
    Status(u16),

    /// Connection failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Body was not JSON.
    #[error("failed to parse response: {0}")]
    Parse(String),

    #[error("request timed out")]
    Timeout,
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SourceError::Timeout
        } else if err.is_connect() {
            SourceError::Connection(err.to_string())
        } else if err.is_decode() {
            SourceError::Parse(err.to_string())
        } else {
            SourceError::Http(err.to_string())
        }
    }
}
