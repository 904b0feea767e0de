//! HTTP adapters - REST API implementations.
//!
//! [`app_router`] assembles the webhook routes with the cross-cutting
//! layers (request id, tracing, panic capture and request timeout).

pub mod webhook;

use std::any::Any;
use std::time::Duration;

use axum::{
    body::Body,
    http::Response,
    response::IntoResponse,
    Json, Router,
};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::domain::foundation::{ClassifiedError, Disclosure};

pub use webhook::{webhook_routes, WebhookAppState};

/// Builds the full application router.
///
/// Layers, outermost first: request id, tracing, request id propagation,
/// panic capture, timeout (408).
pub fn app_router(state: WebhookAppState, request_timeout: Duration) -> Router {
    let disclosure = state.disclosure;

    webhook_routes()
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(CatchPanicLayer::custom(
                    move |panic: Box<dyn Any + Send + 'static>| panic_response(panic, disclosure),
                ))
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .with_state(state)
}

/// Renders a caught panic as a classified internal error.
fn panic_response(panic: Box<dyn Any + Send + 'static>, disclosure: Disclosure) -> Response<Body> {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    let classified = ClassifiedError::internal(format!("Handler panicked: {}", detail), disclosure);
    tracing::error!(
        code = classified.code(),
        panic = %detail,
        "Request handler panicked"
    );

    (
        classified.http_status(),
        Json(webhook::ErrorResponse::from(&classified)),
    )
        .into_response()
}
