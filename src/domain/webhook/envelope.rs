//! Webhook envelope decoding.
//!
//! Only the envelope fields (`type`, `data`, `created_at`, `event_id`) are
//! checked here. The shape of `data` belongs to each event handler, which
//! narrows it with [`WebhookEnvelope::field`].

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::errors::WebhookError;
use super::signature::VerifiedBody;

/// Authenticated, decoded unit of webhook work.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookEnvelope {
    event_type: String,
    data: Map<String, Value>,
    created_at: Option<DateTime<Utc>>,
    event_id: Option<String>,
}

/// Wire shape before validation; every field optional so that we can
/// report which one is wrong.
#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(rename = "type")]
    event_type: Option<String>,
    data: Option<Value>,
    created_at: Option<String>,
    event_id: Option<Value>,
}

impl WebhookEnvelope {
    /// Decodes an authenticated body into an envelope.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::MalformedPayload` if the body is not a JSON
    /// object, `type` is missing or empty, `data` is missing or not an
    /// object, or `created_at` is not an RFC 3339 timestamp.
    pub fn decode(body: VerifiedBody<'_>) -> Result<Self, WebhookError> {
        let raw: RawEnvelope = serde_json::from_slice(body.as_bytes())
            .map_err(|e| WebhookError::MalformedPayload(e.to_string()))?;

        let event_type = raw
            .event_type
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| WebhookError::MalformedPayload("missing event type".to_string()))?;

        let data = match raw.data {
            Some(Value::Object(map)) => map,
            Some(_) => {
                return Err(WebhookError::MalformedPayload(
                    "data must be an object".to_string(),
                ))
            }
            None => return Err(WebhookError::MalformedPayload("missing data".to_string())),
        };

        let created_at = raw
            .created_at
            .map(|ts| {
                DateTime::parse_from_rfc3339(&ts)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|_| {
                        WebhookError::MalformedPayload(
                            "created_at must be an ISO-8601 timestamp".to_string(),
                        )
                    })
            })
            .transpose()?;

        Ok(Self {
            event_type,
            data,
            created_at,
            event_id: raw.event_id.and_then(correlation_id),
        })
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn event_id(&self) -> Option<&str> {
        self.event_id.as_deref()
    }

    /// Provider creation time, falling back to when we received the event.
    pub fn occurred_at(&self, received_at: DateTime<Utc>) -> DateTime<Utc> {
        self.created_at.unwrap_or(received_at)
    }

    /// Reads a required field from `data` by dot-separated path.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::InvalidEventData` if the field is absent or
    /// cannot be deserialized as `T`.
    pub fn field<T: DeserializeOwned>(&self, path: &str) -> Result<T, WebhookError> {
        self.optional_field(path)?
            .ok_or_else(|| WebhookError::invalid_event_data(path, "missing"))
    }

    /// Reads an optional field from `data`; absent or `null` yields `None`.
    pub fn optional_field<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, WebhookError> {
        match self.lookup(path) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => T::deserialize(value)
                .map(Some)
                .map_err(|e| WebhookError::invalid_event_data(path, e.to_string())),
        }
    }

    fn lookup(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = self.data.get(segments.next()?)?;
        segments.try_fold(first, |current, segment| current.get(segment))
    }
}

/// `event_id` only feeds log correlation, so an odd type is dropped rather
/// than failing a delivery that is otherwise valid.
fn correlation_id(value: Value) -> Option<String> {
    match value {
        Value::String(id) if !id.trim().is_empty() => Some(id),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Decodes a test envelope without going through signature verification.
#[cfg(test)]
pub fn test_envelope(body: &Value) -> WebhookEnvelope {
    let bytes = serde_json::to_vec(body).unwrap();
    WebhookEnvelope::decode(VerifiedBody::new(&bytes)).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode_json(body: &str) -> Result<WebhookEnvelope, WebhookError> {
        WebhookEnvelope::decode(VerifiedBody::new(body.as_bytes()))
    }

    // ══════════════════════════════════════════════════════════════
    // Decode Success Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn decodes_minimal_envelope() {
        let envelope = decode_json(r#"{"type":"payment.created","data":{}}"#).unwrap();

        assert_eq!(envelope.event_type(), "payment.created");
        assert!(envelope.data().is_empty());
        assert!(envelope.created_at().is_none());
        assert!(envelope.event_id().is_none());
    }

    #[test]
    fn decodes_created_at_and_event_id() {
        let envelope = decode_json(
            r#"{"type":"subscription.updated","event_id":"evt_1","created_at":"2024-03-01T12:30:00Z","data":{"subscription":{}}}"#,
        )
        .unwrap();

        assert_eq!(envelope.event_id(), Some("evt_1"));
        assert_eq!(
            envelope.created_at().unwrap().to_rfc3339(),
            "2024-03-01T12:30:00+00:00"
        );
    }

    #[test]
    fn ignores_unknown_top_level_fields() {
        let envelope =
            decode_json(r#"{"type":"payment.created","merchant_id":"M1","data":{}}"#).unwrap();
        assert_eq!(envelope.event_type(), "payment.created");
    }

    #[test]
    fn numeric_event_id_is_kept_as_text() {
        let envelope =
            decode_json(r#"{"type":"unknown.event","event_id":42,"data":{}}"#).unwrap();
        assert_eq!(envelope.event_id(), Some("42"));
    }

    #[test]
    fn odd_event_id_is_dropped_not_rejected() {
        for event_id in [r#"{"id":"evt_1"}"#, "[1,2]", "true", "null", r#""  ""#] {
            let body = format!(r#"{{"type":"payment.created","event_id":{event_id},"data":{{}}}}"#);
            let envelope = decode_json(&body).unwrap();
            assert!(envelope.event_id().is_none(), "event_id {event_id} should be dropped");
        }
    }

    #[test]
    fn occurred_at_falls_back_to_received_time() {
        let envelope = decode_json(r#"{"type":"payment.created","data":{}}"#).unwrap();
        let received = Utc::now();

        assert_eq!(envelope.occurred_at(received), received);
    }

    #[test]
    fn occurred_at_prefers_provider_time() {
        let envelope = decode_json(
            r#"{"type":"payment.created","created_at":"2024-01-01T00:00:00Z","data":{}}"#,
        )
        .unwrap();

        assert_eq!(
            envelope.occurred_at(Utc::now()),
            envelope.created_at().unwrap()
        );
    }

    // ══════════════════════════════════════════════════════════════
    // Decode Rejection Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn rejects_invalid_json() {
        let result = decode_json("not json");
        assert!(matches!(result, Err(WebhookError::MalformedPayload(_))));
    }

    #[test]
    fn rejects_non_object_body() {
        let result = decode_json(r#"["payment.created"]"#);
        assert!(matches!(result, Err(WebhookError::MalformedPayload(_))));
    }

    #[test]
    fn rejects_missing_type() {
        let result = decode_json(r#"{"data":{}}"#);
        assert!(matches!(result, Err(WebhookError::MalformedPayload(_))));
    }

    #[test]
    fn rejects_empty_type() {
        let result = decode_json(r#"{"type":"","data":{}}"#);
        assert!(matches!(result, Err(WebhookError::MalformedPayload(_))));
    }

    #[test]
    fn rejects_blank_type() {
        let result = decode_json(r#"{"type":"   ","data":{}}"#);
        assert!(matches!(result, Err(WebhookError::MalformedPayload(_))));
    }

    #[test]
    fn rejects_non_string_type() {
        let result = decode_json(r#"{"type":42,"data":{}}"#);
        assert!(matches!(result, Err(WebhookError::MalformedPayload(_))));
    }

    #[test]
    fn rejects_missing_data() {
        let result = decode_json(r#"{"type":"payment.created"}"#);
        assert!(matches!(result, Err(WebhookError::MalformedPayload(_))));
    }

    #[test]
    fn rejects_non_object_data() {
        for data in [r#""text""#, "[]", "12", "null"] {
            let body = format!(r#"{{"type":"payment.created","data":{}}}"#, data);
            let result = decode_json(&body);
            assert!(
                matches!(result, Err(WebhookError::MalformedPayload(_))),
                "data {} should be rejected",
                data
            );
        }
    }

    #[test]
    fn rejects_unparseable_created_at() {
        let result = decode_json(r#"{"type":"payment.created","created_at":"yesterday","data":{}}"#);
        assert!(matches!(result, Err(WebhookError::MalformedPayload(_))));
    }

    #[test]
    fn decode_errors_are_validation_kind() {
        let err = decode_json(r#"{"type":""}"#).unwrap_err();
        assert_eq!(err.kind(), crate::domain::foundation::ErrorKind::Validation);
    }

    // ══════════════════════════════════════════════════════════════
    // Field Access Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn field_reads_nested_values() {
        let envelope = test_envelope(&json!({
            "type": "payment.created",
            "data": {"payment": {"amount_money": {"amount": 500, "currency": "USD"}}}
        }));

        let amount: i64 = envelope.field("payment.amount_money.amount").unwrap();
        let currency: String = envelope.field("payment.amount_money.currency").unwrap();

        assert_eq!(amount, 500);
        assert_eq!(currency, "USD");
    }

    #[test]
    fn field_reports_missing_path() {
        let envelope = test_envelope(&json!({"type": "payment.created", "data": {"payment": {}}}));

        let result: Result<i64, _> = envelope.field("payment.amount_money.amount");

        assert_eq!(
            result.unwrap_err(),
            WebhookError::invalid_event_data("payment.amount_money.amount", "missing")
        );
    }

    #[test]
    fn field_reports_wrong_type() {
        let envelope = test_envelope(&json!({
            "type": "payment.created",
            "data": {"payment": {"amount_money": {"amount": "five hundred"}}}
        }));

        let result: Result<i64, _> = envelope.field("payment.amount_money.amount");

        assert!(matches!(
            result,
            Err(WebhookError::InvalidEventData { ref field, .. }) if field == "payment.amount_money.amount"
        ));
    }

    #[test]
    fn optional_field_treats_null_as_absent() {
        let envelope = test_envelope(&json!({
            "type": "payment.created",
            "data": {"payment": {"id": null}}
        }));

        let id: Option<String> = envelope.optional_field("payment.id").unwrap();
        let status: Option<String> = envelope.optional_field("payment.status").unwrap();

        assert!(id.is_none());
        assert!(status.is_none());
    }
}
