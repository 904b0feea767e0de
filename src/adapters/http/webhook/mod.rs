//! Webhook HTTP adapter.

mod dto;
mod handlers;
mod routes;

pub use dto::{AckResponse, ErrorResponse, HealthResponse};
pub use handlers::{
    health, receive_webhook, route_not_found, WebhookApiError, WebhookAppState, MAX_BODY_BYTES,
    REQUEST_ID_HEADER,
};
pub use routes::webhook_routes;
