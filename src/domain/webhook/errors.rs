//! Webhook error types for the ingestion pipeline.
//!
//! Defines every failure the pipeline can report, each tagged with an
//! [`ErrorKind`] from the shared taxonomy.

use std::collections::HashMap;

use thiserror::Error;

use crate::domain::foundation::ErrorKind;

/// Errors that occur during webhook ingestion and dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookError {
    /// The request carried no signature header.
    #[error("Missing signature header")]
    MissingSignature,

    /// Webhook signature verification failed.
    #[error("Invalid signature")]
    InvalidSignature,

    /// The request body could not be read (too large, truncated).
    #[error("Unreadable body: {0}")]
    UnreadableBody(String),

    /// The body is not a well-formed webhook envelope.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// A handler could not find or read a field it requires.
    #[error("Invalid event data at '{field}': {reason}")]
    InvalidEventData { field: String, reason: String },

    /// A handler refused the event for the account it targets.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A resource referenced by the event does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A downstream quota was exceeded.
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// A downstream call failed after exhausting its retries.
    #[error("External service failed after {attempts} attempt(s): {message}")]
    ExternalService { attempts: u32, message: String },

    /// Unexpected failure inside the pipeline.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl WebhookError {
    /// Creates an invalid event data error for a field path.
    pub fn invalid_event_data(field: impl Into<String>, reason: impl Into<String>) -> Self {
        WebhookError::InvalidEventData {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Taxonomy kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            WebhookError::MissingSignature
            | WebhookError::UnreadableBody(_)
            | WebhookError::MalformedPayload(_)
            | WebhookError::InvalidEventData { .. } => ErrorKind::Validation,
            WebhookError::InvalidSignature => ErrorKind::Authentication,
            WebhookError::Forbidden(_) => ErrorKind::Authorization,
            WebhookError::NotFound(_) => ErrorKind::NotFound,
            WebhookError::RateLimited(_) => ErrorKind::RateLimit,
            WebhookError::ExternalService { .. } => ErrorKind::ExternalService,
            WebhookError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Structured context for server-side logs.
    pub fn details(&self) -> HashMap<String, String> {
        let mut details = HashMap::new();
        match self {
            WebhookError::InvalidEventData { field, .. } => {
                details.insert("field".to_string(), field.clone());
            }
            WebhookError::ExternalService { attempts, .. } => {
                details.insert("attempts".to_string(), attempts.to_string());
            }
            _ => {}
        }
        details
    }
}
