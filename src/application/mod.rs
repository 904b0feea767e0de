//! Application layer - Command handler, routing and event handlers.
//!
//! This layer orchestrates the webhook pipeline between the domain and the
//! downstream ports.

pub mod handlers;
pub mod webhook;

pub use handlers::default_router;
pub use webhook::{
    AdvisoryOutcome, DispatchOutcome, EventRouter, IngestReceipt, IngestWebhookCommand,
    IngestWebhookHandler, RouterError, SideEffects, WebhookEventHandler,
};
