//! Webhook ingestion pipeline: retry executor, side effects, routing and
//! the ingest command handler.

mod ingest;
mod retry;
mod router;
mod side_effects;

pub use ingest::{IngestReceipt, IngestWebhookCommand, IngestWebhookHandler};
pub use retry::{with_retry, with_retry_if};
pub use router::{DispatchOutcome, EventRouter, EventRouterBuilder, RouterError, WebhookEventHandler};
pub use side_effects::{AdvisoryOutcome, SideEffects};
