//! HTTP DTOs for the webhook endpoint.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ClassifiedError;

/// Body sent back once a webhook is acknowledged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckResponse {
    pub success: bool,
}

impl AckResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Error body. Only the classified message and code go over the wire;
/// details stay in the server logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl From<&ClassifiedError> for ErrorResponse {
    fn from(err: &ClassifiedError) -> Self {
        Self {
            error: err.message().to_string(),
            code: err.code().to_string(),
        }
    }
}

/// Liveness response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
