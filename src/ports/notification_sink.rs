//! NotificationSink port - Interface for CRM / sales notifications.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::SinkError;

/// What the receiving team is expected to do with a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A new paying customer for the sales pipeline.
    SalesLead,
    /// Something needs a human follow-up (failed payment, churn).
    FollowUp,
}

/// Notification sent to the CRM / notification sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub subject: String,
    pub fields: Map<String, Value>,
}

impl Notification {
    pub fn new(kind: NotificationKind, subject: impl Into<String>) -> Self {
        Self {
            kind,
            subject: subject.into(),
            fields: Map::new(),
        }
    }

    /// Adds a field, skipping values that are `null`.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let value = value.into();
        if !value.is_null() {
            self.fields.insert(key.into(), value);
        }
        self
    }
}

/// Port for CRM / sales notifications.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<(), SinkError>;
}
