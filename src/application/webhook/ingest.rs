//! IngestWebhookHandler - Command handler for inbound webhook requests.
//!
//! A request moves through Received → Verifying → Decoding → Dispatching →
//! Acknowledged. Each stage only runs if the previous one succeeded; the
//! decoder can only be reached with a [`VerifiedBody`](crate::domain::webhook::VerifiedBody).

use std::sync::Arc;

use axum::body::Bytes;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::webhook::{SignatureVerifier, WebhookEnvelope, WebhookError};

use super::router::{DispatchOutcome, EventRouter};

/// Command to ingest one webhook delivery.
#[derive(Debug, Clone)]
pub struct IngestWebhookCommand {
    /// Raw request body, exactly as received.
    pub payload: Bytes,
    /// Signature header value, if the header was present.
    pub signature: Option<String>,
    /// Correlation id of the HTTP request.
    pub request_id: Option<String>,
}

/// Acknowledgement of a processed delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReceipt {
    pub ingestion_id: Uuid,
    pub event_type: String,
    pub outcome: DispatchOutcome,
    pub received_at: DateTime<Utc>,
}

/// Handler for inbound webhooks.
pub struct IngestWebhookHandler {
    verifier: Arc<dyn SignatureVerifier>,
    router: Arc<EventRouter>,
}

impl IngestWebhookHandler {
    pub fn new(verifier: Arc<dyn SignatureVerifier>, router: Arc<EventRouter>) -> Self {
        Self { verifier, router }
    }

    pub fn router(&self) -> &EventRouter {
        &self.router
    }

    pub async fn handle(&self, cmd: IngestWebhookCommand) -> Result<IngestReceipt, WebhookError> {
        let ingestion_id = Uuid::new_v4();
        let received_at = Utc::now();

        // 1. Received: a signature must be present
        let signature = cmd
            .signature
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(WebhookError::MissingSignature)?;

        // 2. Verifying
        let verified = self
            .verifier
            .authenticate(&cmd.payload, signature)
            .ok_or(WebhookError::InvalidSignature)?;

        // 3. Decoding
        let envelope = WebhookEnvelope::decode(verified)?;

        tracing::info!(
            %ingestion_id,
            request_id = cmd.request_id.as_deref(),
            event_type = envelope.event_type(),
            event_id = envelope.event_id(),
            "Webhook authenticated"
        );

        // 4. Dispatching
        let outcome = self.router.dispatch(&envelope).await?;

        // 5. Acknowledged
        Ok(IngestReceipt {
            ingestion_id,
            event_type: envelope.event_type().to_string(),
            outcome,
            received_at,
        })
    }
}
