/*
[INPUT]:  Error sources (HTTP, sidecar envelope, serialization, process, config)
[OUTPUT]: Structured error types with context and retry hints
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the pmxt adapter
#[derive(Error, Debug)]
pub enum PmxtError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Sidecar reported a failure, either in the envelope or via status code
    #[error("API error (code {code}): {message}")]
    Api { code: i32, message: String },

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Lock file or process handling failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Sidecar could not be reached, started or stopped
    #[error("Sidecar error: {0}")]
    Sidecar(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A facade operation failed
    #[error("Failed to {operation}: {message}")]
    Operation { operation: String, message: String },
}

impl PmxtError {
    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            PmxtError::Http(err) => err.is_timeout() || err.is_connect(),
            PmxtError::Api { code, .. } => *code == 429 || *code >= 500,
            PmxtError::Sidecar(_) => true,
            _ => false,
        }
    }

    pub fn is_operation_failure(&self) -> bool {
        matches!(self, PmxtError::Operation { .. })
    }

    /// Create an API error from status code and message
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        PmxtError::Api {
            code: status.as_u16() as i32,
            message: message.into(),
        }
    }

    /// Fold this error into an operation failure, keeping the cleanest
    /// message available. Already-folded errors pass through.
    pub fn into_operation(self, operation: &str) -> Self {
        let message = match self {
            PmxtError::Operation { .. } => return self,
            PmxtError::Api { message, .. } => message,
            PmxtError::Sidecar(message) | PmxtError::Config(message) => message,
            other => other.to_string(),
        };
        PmxtError::Operation {
            operation: operation.to_string(),
            message,
        }
    }
}

/// Result type alias for pmxt operations
pub type Result<T> = std::result::Result<T, PmxtError>;
