//! Payment event handlers (`payment.created`, `payment.updated`).

use async_trait::async_trait;
use chrono::Utc;

use crate::application::webhook::{SideEffects, WebhookEventHandler};
use crate::domain::webhook::{WebhookEnvelope, WebhookError};
use crate::ports::{AnalyticsEvent, Notification, NotificationKind};

/// Records new payments in analytics.
pub struct PaymentCreatedHandler {
    effects: SideEffects,
}

impl PaymentCreatedHandler {
    pub fn new(effects: SideEffects) -> Self {
        Self { effects }
    }
}

#[async_trait]
impl WebhookEventHandler for PaymentCreatedHandler {
    fn event_types(&self) -> Vec<&'static str> {
        vec!["payment.created"]
    }

    async fn handle(&self, envelope: &WebhookEnvelope) -> Result<(), WebhookError> {
        let amount: i64 = envelope.field("payment.amount_money.amount")?;
        let currency: String = envelope.field("payment.amount_money.currency")?;
        let payment_id: Option<String> = envelope.optional_field("payment.id")?;
        let status: Option<String> = envelope.optional_field("payment.status")?;

        let event = AnalyticsEvent::new("payment_created")
            .with_property("amount", amount)
            .with_property("currency", currency)
            .with_property("payment_id", payment_id)
            .with_property("status", status)
            .with_property("occurred_at", envelope.occurred_at(Utc::now()).to_rfc3339());

        self.effects.track(event).await;
        Ok(())
    }
}

/// Reacts to payment status changes.
///
/// Failed and canceled payments also raise a follow-up notification.
pub struct PaymentUpdatedHandler {
    effects: SideEffects,
}

impl PaymentUpdatedHandler {
    pub fn new(effects: SideEffects) -> Self {
        Self { effects }
    }
}

#[async_trait]
impl WebhookEventHandler for PaymentUpdatedHandler {
    fn event_types(&self) -> Vec<&'static str> {
        vec!["payment.updated"]
    }

    async fn handle(&self, envelope: &WebhookEnvelope) -> Result<(), WebhookError> {
        let status: String = envelope.field("payment.status")?;
        let payment_id: Option<String> = envelope.optional_field("payment.id")?;
        let amount: Option<i64> = envelope.optional_field("payment.amount_money.amount")?;

        match status.as_str() {
            "COMPLETED" => {
                let event = AnalyticsEvent::new("payment_completed")
                    .with_property("payment_id", payment_id)
                    .with_property("amount", amount);
                self.effects.track(event).await;
            }
            "FAILED" | "CANCELED" => {
                let event = AnalyticsEvent::new("payment_failed")
                    .with_property("payment_id", payment_id.clone())
                    .with_property("status", status.as_str());
                let notification = Notification::new(NotificationKind::FollowUp, "Payment failed")
                    .with_field("payment_id", payment_id)
                    .with_field("status", status.as_str())
                    .with_field("amount", amount);

                futures::join!(self.effects.track(event), self.effects.notify(notification));
            }
            _ => {
                let event = AnalyticsEvent::new("payment_updated")
                    .with_property("payment_id", payment_id)
                    .with_property("status", status.as_str());
                self.effects.track(event).await;
            }
        }

        Ok(())
    }
}
