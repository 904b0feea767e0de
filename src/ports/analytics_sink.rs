//! AnalyticsSink port - Interface for forwarding derived analytics events.
//!
//! Delivery is best-effort: callers wrap every call as an advisory side
//! effect, so a failing sink never fails webhook ingestion.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::SinkError;

/// Analytics event in the `{event, properties}` shape the sink accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    /// Event name (e.g. `payment_created`).
    pub event: String,
    /// Arbitrary event properties.
    pub properties: Map<String, Value>,
}

impl AnalyticsEvent {
    /// Creates an event with no properties.
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            properties: Map::new(),
        }
    }

    /// Adds a property, skipping values that are `null`.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let value = value.into();
        if !value.is_null() {
            self.properties.insert(key.into(), value);
        }
        self
    }
}

/// Port for forwarding analytics events.
#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    /// Sends one event.
    async fn track(&self, event: &AnalyticsEvent) -> Result<(), SinkError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // Compile-time check that trait is object-safe
    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn AnalyticsSink) {}

    #[test]
    fn serializes_to_event_properties_shape() {
        let event = AnalyticsEvent::new("payment_created")
            .with_property("amount", 500)
            .with_property("currency", "USD");

        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(
            value,
            json!({"event": "payment_created", "properties": {"amount": 500, "currency": "USD"}})
        );
    }

    #[test]
    fn null_properties_are_skipped() {
        let event = AnalyticsEvent::new("payment_created").with_property("payment_id", Value::Null);
        assert!(event.properties.is_empty());
    }
}
