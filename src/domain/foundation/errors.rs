//! Error taxonomy shared by every layer.
//!
//! Failures anywhere in the pipeline end up here: [`classify`] maps an
//! arbitrary error into a [`ClassifiedError`] carrying the HTTP status and
//! machine-readable code that the HTTP boundary sends back to the provider.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;

use axum::http::StatusCode;

use crate::domain::webhook::WebhookError;

/// Message exposed for internal failures outside development.
pub const GENERIC_INTERNAL_MESSAGE: &str = "An unexpected error occurred";

/// Failure categories, each with a fixed status and code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Authentication,
    Authorization,
    NotFound,
    RateLimit,
    ExternalService,
    Internal,
}

impl ErrorKind {
    /// HTTP status reported for this kind.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
            ErrorKind::Authorization => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::RateLimit => StatusCode::TOO_MANY_REQUESTS,
            ErrorKind::ExternalService => StatusCode::BAD_GATEWAY,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code reported for this kind.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::Authentication => "AUTHENTICATION_ERROR",
            ErrorKind::Authorization => "AUTHORIZATION_ERROR",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::RateLimit => "RATE_LIMIT_EXCEEDED",
            ErrorKind::ExternalService => "EXTERNAL_SERVICE_ERROR",
            ErrorKind::Internal => "INTERNAL_ERROR",
        }
    }

    /// Returns true for kinds that indicate a fault on our side (5xx).
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// How much of an internal failure may be shown to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Disclosure {
    /// Internal messages pass through unchanged (development).
    Full,
    /// Internal messages are replaced with [`GENERIC_INTERNAL_MESSAGE`].
    #[default]
    Redacted,
}

/// Result of mapping an error through the taxonomy.
///
/// Immutable once built. `details` are for server-side logs only and are
/// never written to a response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedError {
    kind: ErrorKind,
    http_status: StatusCode,
    code: &'static str,
    message: String,
    details: Option<HashMap<String, String>>,
}

impl ClassifiedError {
    /// Creates a classified error for the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            http_status: kind.status_code(),
            code: kind.code(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates an internal error, redacting the message when required.
    ///
    /// The original message is always retained under the `cause` detail.
    pub fn internal(message: impl Into<String>, disclosure: Disclosure) -> Self {
        let message = message.into();
        let exposed = match disclosure {
            Disclosure::Full => message.clone(),
            Disclosure::Redacted => GENERIC_INTERNAL_MESSAGE.to_string(),
        };
        Self::new(ErrorKind::Internal, exposed).with_detail("cause", message)
    }

    /// Adds a server-side detail.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn http_status(&self) -> StatusCode {
        self.http_status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&HashMap<String, String>> {
        self.details.as_ref()
    }
}

impl fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Maps any error to a [`ClassifiedError`].
///
/// - Pipeline errors ([`WebhookError`]) keep the kind they were built with.
/// - JSON shape errors are `Validation`.
/// - Everything else is `Internal`.
///
/// Pure and total.
pub fn classify(error: &(dyn Error + 'static), disclosure: Disclosure) -> ClassifiedError {
    if let Some(err) = error.downcast_ref::<WebhookError>() {
        return classify_webhook_error(err, disclosure);
    }

    if let Some(err) = error.downcast_ref::<serde_json::Error>() {
        return ClassifiedError::new(ErrorKind::Validation, format!("Invalid payload: {}", err));
    }

    ClassifiedError::internal(error.to_string(), disclosure)
}

fn classify_webhook_error(err: &WebhookError, disclosure: Disclosure) -> ClassifiedError {
    let kind = err.kind();
    let classified = if kind == ErrorKind::Internal {
        ClassifiedError::internal(err.to_string(), disclosure)
    } else {
        ClassifiedError::new(kind, err.to_string())
    };

    err.details()
        .into_iter()
        .fold(classified, |acc, (key, value)| acc.with_detail(key, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct OpaqueFailure;

    impl fmt::Display for OpaqueFailure {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "connection pool exhausted")
        }
    }

    impl Error for OpaqueFailure {}

    // ══════════════════════════════════════════════════════════════
    // ErrorKind Mapping Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn kinds_map_to_expected_statuses() {
        assert_eq!(ErrorKind::Validation.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorKind::Authentication.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorKind::Authorization.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorKind::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorKind::RateLimit.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(ErrorKind::ExternalService.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(ErrorKind::Internal.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn kind_displays_its_code() {
        assert_eq!(format!("{}", ErrorKind::RateLimit), "RATE_LIMIT_EXCEEDED");
        assert_eq!(format!("{}", ErrorKind::Internal), "INTERNAL_ERROR");
    }

    #[test]
    fn only_internal_and_external_are_server_errors() {
        assert!(ErrorKind::Internal.is_server_error());
        assert!(ErrorKind::ExternalService.is_server_error());
        assert!(!ErrorKind::Validation.is_server_error());
        assert!(!ErrorKind::Authentication.is_server_error());
    }

    // ══════════════════════════════════════════════════════════════
    // classify Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn classify_keeps_kind_of_pipeline_errors() {
        let err = WebhookError::InvalidSignature;

        let classified = classify(&err, Disclosure::Redacted);

        assert_eq!(classified.kind(), ErrorKind::Authentication);
        assert_eq!(classified.http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(classified.code(), "AUTHENTICATION_ERROR");
    }

    #[test]
    fn classify_maps_rate_limit_errors() {
        let err = WebhookError::RateLimited("analytics quota".to_string());

        let classified = classify(&err, Disclosure::Redacted);

        assert_eq!(classified.kind(), ErrorKind::RateLimit);
    }

    #[test]
    fn classify_maps_json_errors_to_validation() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();

        let classified = classify(&err, Disclosure::Redacted);

        assert_eq!(classified.kind(), ErrorKind::Validation);
        assert_eq!(classified.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn classify_maps_unknown_errors_to_internal() {
        let classified = classify(&OpaqueFailure, Disclosure::Full);

        assert_eq!(classified.kind(), ErrorKind::Internal);
        assert_eq!(classified.message(), "connection pool exhausted");
    }

    #[test]
    fn classify_redacts_internal_messages() {
        let classified = classify(&OpaqueFailure, Disclosure::Redacted);

        assert_eq!(classified.message(), GENERIC_INTERNAL_MESSAGE);
        assert_eq!(
            classified.details().and_then(|d| d.get("cause")),
            Some(&"connection pool exhausted".to_string())
        );
    }

    #[test]
    fn classify_redacts_internal_pipeline_errors() {
        let err = WebhookError::Internal("router poisoned".to_string());

        let classified = classify(&err, Disclosure::Redacted);

        assert_eq!(classified.kind(), ErrorKind::Internal);
        assert_eq!(classified.message(), GENERIC_INTERNAL_MESSAGE);
    }

    #[test]
    fn classify_never_redacts_validation_messages() {
        let err = WebhookError::MalformedPayload("missing type".to_string());

        let classified = classify(&err, Disclosure::Redacted);

        assert_eq!(classified.message(), "Malformed payload: missing type");
    }

    #[test]
    fn classify_carries_field_details() {
        let err = WebhookError::invalid_event_data("payment.amount_money", "missing");

        let classified = classify(&err, Disclosure::Redacted);

        assert_eq!(
            classified.details().and_then(|d| d.get("field")),
            Some(&"payment.amount_money".to_string())
        );
    }

    #[test]
    fn classified_error_displays_code_and_message() {
        let err = ClassifiedError::new(ErrorKind::NotFound, "Handler not found");
        assert_eq!(format!("{}", err), "[NOT_FOUND] Handler not found");
    }
}
