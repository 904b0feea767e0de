//! Errors reported by downstream sinks.

use serde::{Deserialize, Serialize};

/// Errors from downstream sink operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkError {
    /// Error code for categorization.
    pub code: SinkErrorCode,

    /// Human-readable message.
    pub message: String,

    /// HTTP status returned by the sink (if any).
    pub status: Option<u16>,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl SinkError {
    /// Create a new sink error.
    pub fn new(code: SinkErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
            retryable: code.is_retryable(),
        }
    }

    /// Attach the HTTP status the sink answered with.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(SinkErrorCode::NetworkError, message)
    }

    /// Create a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(SinkErrorCode::Timeout, message)
    }

    /// Map a non-success HTTP status to an error.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let code = match status {
            429 => SinkErrorCode::RateLimitExceeded,
            500..=599 => SinkErrorCode::Unavailable,
            _ => SinkErrorCode::Rejected,
        };
        Self::new(code, message).with_status(status)
    }

    /// Create a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(SinkErrorCode::SerializationError, message)
    }

    /// Returns true if retrying may succeed.
    pub fn is_retryable(&self) -> bool {
        self.retryable
    }
}

impl std::fmt::Display for SinkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} ({}): {}", self.code, status, self.message),
            None => write!(f, "{}: {}", self.code, self.message),
        }
    }
}

impl std::error::Error for SinkError {}

/// Sink error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// The sink did not answer in time.
    Timeout,

    /// Rate limit exceeded.
    RateLimitExceeded,

    /// The sink answered with a server error.
    Unavailable,

    /// The sink refused the request (4xx other than 429).
    Rejected,

    /// The payload could not be encoded.
    SerializationError,
}

impl SinkErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SinkErrorCode::NetworkError
                | SinkErrorCode::Timeout
                | SinkErrorCode::RateLimitExceeded
                | SinkErrorCode::Unavailable
        )
    }
}

impl std::fmt::Display for SinkErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SinkErrorCode::NetworkError => "network_error",
            SinkErrorCode::Timeout => "timeout",
            SinkErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            SinkErrorCode::Unavailable => "unavailable",
            SinkErrorCode::Rejected => "rejected",
            SinkErrorCode::SerializationError => "serialization_error",
        };
        write!(f, "{}", s)
    }
}
