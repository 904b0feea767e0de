//! Axum routes for webhook ingestion.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use super::handlers::{health, receive_webhook, route_not_found, WebhookAppState, MAX_BODY_BYTES};

/// Create the webhook router.
///
/// # Routes
/// - `POST /webhooks` - Ingest a signed webhook delivery
/// - `GET /health` - Liveness probe
///
/// Unknown paths and methods get a classified 404 instead of axum's
/// plain-text rejection.
pub fn webhook_routes() -> Router<WebhookAppState> {
    Router::new()
        .route(
            "/webhooks",
            post(receive_webhook)
                .fallback(route_not_found)
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .route("/health", get(health).fallback(route_not_found))
        .fallback(route_not_found)
}
