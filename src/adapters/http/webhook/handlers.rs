//! HTTP handlers for webhook ingestion.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    response::{IntoResponse, Response},
    Json,
};
use http::{HeaderMap, HeaderName, Method, Uri};

use crate::application::webhook::{IngestWebhookCommand, IngestWebhookHandler};
use crate::domain::foundation::{classify, ClassifiedError, Disclosure, ErrorKind};
use crate::domain::webhook::WebhookError;

use super::dto::{AckResponse, ErrorResponse, HealthResponse};

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Largest webhook body accepted, in bytes.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the webhook routes.
#[derive(Clone)]
pub struct WebhookAppState {
    pub ingest: Arc<IngestWebhookHandler>,
    pub signature_header: HeaderName,
    pub disclosure: Disclosure,
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /webhooks - Ingest one webhook delivery.
///
/// The body is taken as raw bytes so that the signature is checked over
/// exactly what the provider sent. A body that cannot be read (over
/// [`MAX_BODY_BYTES`], aborted) is classified like any other failure.
pub async fn receive_webhook(
    State(state): State<WebhookAppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<AckResponse>, WebhookApiError> {
    let body = body.map_err(|rejection| {
        WebhookApiError::new(
            &WebhookError::UnreadableBody(rejection.body_text()),
            state.disclosure,
            header_string(&headers, REQUEST_ID_HEADER),
        )
    })?;

    let cmd = ingest_command(&state.signature_header, &headers, body);
    let request_id = cmd.request_id.clone();

    match state.ingest.handle(cmd).await {
        Ok(receipt) => {
            tracing::info!(
                ingestion_id = %receipt.ingestion_id,
                request_id = request_id.as_deref(),
                event_type = %receipt.event_type,
                handled = receipt.outcome.is_handled(),
                "Webhook acknowledged"
            );
            Ok(Json(AckResponse::ok()))
        }
        Err(err) => Err(WebhookApiError::new(&err, state.disclosure, request_id)),
    }
}

/// GET /health - Liveness probe.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Fallback for unknown routes and unsupported methods.
pub async fn route_not_found(method: Method, uri: Uri, headers: HeaderMap) -> WebhookApiError {
    WebhookApiError::from_classified(
        ClassifiedError::new(
            ErrorKind::NotFound,
            format!("No route for {} {}", method, uri.path()),
        ),
        header_string(&headers, REQUEST_ID_HEADER),
    )
}

/// Builds the ingest command; the body buffer is handed over, not copied.
fn ingest_command(
    signature_header: &HeaderName,
    headers: &HeaderMap,
    body: Bytes,
) -> IngestWebhookCommand {
    // Non-UTF-8 signatures are passed through lossily and fail verification.
    let signature = headers
        .get(signature_header)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

    IngestWebhookCommand {
        payload: body,
        signature,
        request_id: header_string(headers, REQUEST_ID_HEADER),
    }
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error that renders a classified failure as an HTTP response.
#[derive(Debug)]
pub struct WebhookApiError {
    classified: ClassifiedError,
    request_id: Option<String>,
}

impl WebhookApiError {
    pub fn new(err: &WebhookError, disclosure: Disclosure, request_id: Option<String>) -> Self {
        Self::from_classified(classify(err, disclosure), request_id)
    }

    pub fn from_classified(classified: ClassifiedError, request_id: Option<String>) -> Self {
        Self {
            classified,
            request_id,
        }
    }

    pub fn classified(&self) -> &ClassifiedError {
        &self.classified
    }
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> Response {
        let classified = &self.classified;
        let details = classified.details().map(|d| format!("{:?}", d));

        if classified.kind().is_server_error() {
            tracing::error!(
                request_id = self.request_id.as_deref(),
                kind = %classified.kind(),
                code = classified.code(),
                details = details.as_deref(),
                error = %classified.message(),
                "Webhook ingestion failed"
            );
        } else {
            tracing::warn!(
                request_id = self.request_id.as_deref(),
                kind = %classified.kind(),
                code = classified.code(),
                details = details.as_deref(),
                error = %classified.message(),
                "Webhook rejected"
            );
        }

        (classified.http_status(), Json(ErrorResponse::from(classified))).into_response()
    }
}
