//! Subscription event handlers (`subscription.created`, `subscription.updated`).

use async_trait::async_trait;

use crate::application::webhook::{SideEffects, WebhookEventHandler};
use crate::domain::webhook::{WebhookEnvelope, WebhookError};
use crate::ports::{AnalyticsEvent, Notification, NotificationKind};

/// Statuses that mean the customer is gone.
const ENDED_STATUSES: [&str; 2] = ["CANCELED", "DEACTIVATED"];

/// New subscriptions: analytics plus a sales lead.
pub struct SubscriptionCreatedHandler {
    effects: SideEffects,
}

impl SubscriptionCreatedHandler {
    pub fn new(effects: SideEffects) -> Self {
        Self { effects }
    }
}

#[async_trait]
impl WebhookEventHandler for SubscriptionCreatedHandler {
    fn event_types(&self) -> Vec<&'static str> {
        vec!["subscription.created"]
    }

    async fn handle(&self, envelope: &WebhookEnvelope) -> Result<(), WebhookError> {
        let subscription_id: String = envelope.field("subscription.id")?;
        let customer_id: Option<String> = envelope.optional_field("subscription.customer_id")?;
        let plan_id: Option<String> = envelope.optional_field("subscription.plan_id")?;

        let event = AnalyticsEvent::new("subscription_started")
            .with_property("subscription_id", subscription_id.as_str())
            .with_property("customer_id", customer_id.clone())
            .with_property("plan_id", plan_id.clone());
        let lead = Notification::new(NotificationKind::SalesLead, "New subscription")
            .with_field("subscription_id", subscription_id)
            .with_field("customer_id", customer_id)
            .with_field("plan_id", plan_id);

        futures::join!(self.effects.track(event), self.effects.notify(lead));
        Ok(())
    }
}

/// Subscription changes; cancellations also raise a follow-up.
pub struct SubscriptionUpdatedHandler {
    effects: SideEffects,
}

impl SubscriptionUpdatedHandler {
    pub fn new(effects: SideEffects) -> Self {
        Self { effects }
    }
}

#[async_trait]
impl WebhookEventHandler for SubscriptionUpdatedHandler {
    fn event_types(&self) -> Vec<&'static str> {
        vec!["subscription.updated"]
    }

    async fn handle(&self, envelope: &WebhookEnvelope) -> Result<(), WebhookError> {
        let status: String = envelope.field("subscription.status")?;
        let subscription_id: Option<String> = envelope.optional_field("subscription.id")?;

        if ENDED_STATUSES.contains(&status.as_str()) {
            let event = AnalyticsEvent::new("subscription_canceled")
                .with_property("subscription_id", subscription_id.clone())
                .with_property("status", status.as_str());
            let follow_up = Notification::new(NotificationKind::FollowUp, "Subscription canceled")
                .with_field("subscription_id", subscription_id)
                .with_field("status", status.as_str());

            futures::join!(self.effects.track(event), self.effects.notify(follow_up));
        } else {
            let event = AnalyticsEvent::new("subscription_updated")
                .with_property("subscription_id", subscription_id)
                .with_property("status", status);
            self.effects.track(event).await;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::Harness;
    use crate::domain::webhook::test_envelope;
    use serde_json::json;

    #[tokio::test(start_paused = true)]
    async fn created_tracks_and_raises_sales_lead() {
        let harness = Harness::new();
        let handler = SubscriptionCreatedHandler::new(harness.effects());
        let envelope = test_envelope(&json!({
            "type": "subscription.created",
            "data": {"subscription": {"id": "sub_1", "customer_id": "cus_7", "plan_id": "pro"}}
        }));

        handler.handle(&envelope).await.unwrap();

        assert_eq!(harness.analytics.event_names(), vec!["subscription_started"]);
        let notifications = harness.notifications.notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].kind, NotificationKind::SalesLead);
        assert_eq!(notifications[0].fields["customer_id"], json!("cus_7"));
    }

    #[tokio::test(start_paused = true)]
    async fn created_requires_subscription_id() {
        let harness = Harness::new();
        let handler = SubscriptionCreatedHandler::new(harness.effects());
        let envelope = test_envelope(&json!({
            "type": "subscription.created",
            "data": {"subscription": {"customer_id": "cus_7"}}
        }));

        let result = handler.handle(&envelope).await;

        assert_eq!(
            result.unwrap_err(),
            WebhookError::invalid_event_data("subscription.id", "missing")
        );
        assert!(harness.notifications.notifications().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_raises_follow_up() {
        for status in ["CANCELED", "DEACTIVATED"] {
            let harness = Harness::new();
            let handler = SubscriptionUpdatedHandler::new(harness.effects());
            let envelope = test_envelope(&json!({
                "type": "subscription.updated",
                "data": {"subscription": {"id": "sub_1", "status": status}}
            }));

            handler.handle(&envelope).await.unwrap();

            assert_eq!(harness.analytics.event_names(), vec!["subscription_canceled"]);
            assert_eq!(
                harness.notifications.notifications()[0].kind,
                NotificationKind::FollowUp
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn other_status_tracks_update_only() {
        let harness = Harness::new();
        let handler = SubscriptionUpdatedHandler::new(harness.effects());
        let envelope = test_envelope(&json!({
            "type": "subscription.updated",
            "data": {"subscription": {"id": "sub_1", "status": "ACTIVE"}}
        }));

        handler.handle(&envelope).await.unwrap();

        assert_eq!(harness.analytics.event_names(), vec!["subscription_updated"]);
        assert!(harness.notifications.notifications().is_empty());
    }
}
