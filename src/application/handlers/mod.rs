//! Webhook event handlers.
//!
//! Every handler narrows `data` itself and performs only advisory side
//! effects, so a valid envelope is always acknowledged.

mod invoice;
mod payment;
mod subscription;

use std::sync::Arc;

use crate::application::webhook::{EventRouter, RouterError, SideEffects};

pub use invoice::InvoicePaymentMadeHandler;
pub use payment::{PaymentCreatedHandler, PaymentUpdatedHandler};
pub use subscription::{SubscriptionCreatedHandler, SubscriptionUpdatedHandler};

/// Builds the router with every built-in handler registered.
pub fn default_router(effects: SideEffects) -> Result<EventRouter, RouterError> {
    EventRouter::builder()
        .register(Arc::new(PaymentCreatedHandler::new(effects.clone())))
        .register(Arc::new(PaymentUpdatedHandler::new(effects.clone())))
        .register(Arc::new(SubscriptionCreatedHandler::new(effects.clone())))
        .register(Arc::new(SubscriptionUpdatedHandler::new(effects.clone())))
        .register(Arc::new(InvoicePaymentMadeHandler::new(effects)))
        .build()
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;
    use std::time::Duration;

    use crate::adapters::analytics::InMemoryAnalyticsSink;
    use crate::adapters::notification::InMemoryNotificationSink;
    use crate::application::webhook::SideEffects;
    use crate::domain::foundation::RetryPolicy;
    use crate::ports::SinkError;

    /// In-memory sinks plus the side effects wired to them.
    pub struct Harness {
        pub analytics: Arc<InMemoryAnalyticsSink>,
        pub notifications: Arc<InMemoryNotificationSink>,
    }

    impl Harness {
        pub fn new() -> Self {
            Self::from_sinks(InMemoryAnalyticsSink::new(), InMemoryNotificationSink::new())
        }

        pub fn with_analytics_failure(error: SinkError) -> Self {
            Self::from_sinks(
                InMemoryAnalyticsSink::always_failing(error),
                InMemoryNotificationSink::new(),
            )
        }

        pub fn with_notification_failure(error: SinkError) -> Self {
            Self::from_sinks(
                InMemoryAnalyticsSink::new(),
                InMemoryNotificationSink::always_failing(error),
            )
        }

        fn from_sinks(analytics: InMemoryAnalyticsSink, notifications: InMemoryNotificationSink) -> Self {
            Self {
                analytics: Arc::new(analytics),
                notifications: Arc::new(notifications),
            }
        }

        pub fn effects(&self) -> SideEffects {
            SideEffects::new(
                self.analytics.clone(),
                self.notifications.clone(),
                RetryPolicy::new(3, Duration::from_millis(10)).unwrap(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::Harness;
    use super::*;
    use crate::domain::webhook::test_envelope;
    use serde_json::json;

    #[test]
    fn default_router_registers_all_built_in_types() {
        let router = default_router(Harness::new().effects()).unwrap();

        assert_eq!(
            router.event_types(),
            vec![
                "invoice.payment_made",
                "payment.created",
                "payment.updated",
                "subscription.created",
                "subscription.updated",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn default_router_routes_to_payment_handler() {
        let harness = Harness::new();
        let router = default_router(harness.effects()).unwrap();
        let envelope = test_envelope(&json!({
            "type": "payment.created",
            "data": {"payment": {"amount_money": {"amount": 1, "currency": "USD"}}}
        }));

        let outcome = router.dispatch(&envelope).await.unwrap();

        assert!(outcome.is_handled());
        assert_eq!(harness.analytics.event_names(), vec!["payment_created"]);
    }
}
