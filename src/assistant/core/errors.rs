//! Error types for the assistant subsystem.

use thiserror::Error;

/// Assistant subsystem error type.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// The reply service rejected the request.
    #[error("reply service rejected the message: {0}")]
    SendRejected(String),
    /// The reply endpoint answered with a non-success status.
    #[error("reply service returned HTTP {status}: {body}")]
    ReplyStatus {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },
    /// HTTP transport error.
    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// A history entry was requested outside `0..len`.
    #[error("history index {index} is out of range (history holds {len} sessions)")]
    InvalidHistoryIndex {
        /// Requested index.
        index: usize,
        /// Current history length.
        len: usize,
    },
    /// Invalid configuration or unsupported values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// URL parse error.
    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
}

/// Convenience result alias for assistant operations.
pub type AssistantResult<T> = Result<T, AssistantError>;
