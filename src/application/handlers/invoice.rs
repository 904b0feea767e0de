//! Invoice event handler (`invoice.payment_made`).

use async_trait::async_trait;

use crate::application::webhook::{SideEffects, WebhookEventHandler};
use crate::domain::webhook::{WebhookEnvelope, WebhookError};
use crate::ports::AnalyticsEvent;

pub struct InvoicePaymentMadeHandler {
    effects: SideEffects,
}

impl InvoicePaymentMadeHandler {
    pub fn new(effects: SideEffects) -> Self {
        Self { effects }
    }
}

#[async_trait]
impl WebhookEventHandler for InvoicePaymentMadeHandler {
    fn event_types(&self) -> Vec<&'static str> {
        vec!["invoice.payment_made"]
    }

    async fn handle(&self, envelope: &WebhookEnvelope) -> Result<(), WebhookError> {
        let invoice_id: String = envelope.field("invoice.id")?;
        let subscription_id: Option<String> = envelope.optional_field("invoice.subscription_id")?;
        let status: Option<String> = envelope.optional_field("invoice.status")?;

        let event = AnalyticsEvent::new("invoice_paid")
            .with_property("invoice_id", invoice_id)
            .with_property("subscription_id", subscription_id)
            .with_property("status", status);

        self.effects.track(event).await;
        Ok(())
    }
}
