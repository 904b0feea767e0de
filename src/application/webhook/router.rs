//! Event routing by envelope type.
//!
//! The routing table is built once at startup and is immutable afterwards,
//! so concurrent dispatches share it without locking.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::webhook::{WebhookEnvelope, WebhookError};

/// Handles one or more webhook event types.
#[async_trait]
pub trait WebhookEventHandler: Send + Sync {
    /// Event types this handler accepts (e.g. `"payment.created"`).
    fn event_types(&self) -> Vec<&'static str>;

    /// Performs the handler's work for one envelope.
    async fn handle(&self, envelope: &WebhookEnvelope) -> Result<(), WebhookError>;
}

/// Errors building a router.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    #[error("Duplicate handler registered for event type '{0}'")]
    DuplicateEventType(String),
}

/// What happened to a dispatched envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A registered handler ran and completed.
    Handled { event_type: String },
    /// No handler is registered; the event was logged and acknowledged.
    Unhandled { event_type: String },
}

impl DispatchOutcome {
    pub fn event_type(&self) -> &str {
        match self {
            DispatchOutcome::Handled { event_type } | DispatchOutcome::Unhandled { event_type } => {
                event_type
            }
        }
    }

    pub fn is_handled(&self) -> bool {
        matches!(self, DispatchOutcome::Handled { .. })
    }
}

/// Immutable event-type → handler table.
pub struct EventRouter {
    handlers: HashMap<String, Arc<dyn WebhookEventHandler>>,
}

impl EventRouter {
    pub fn builder() -> EventRouterBuilder {
        EventRouterBuilder::default()
    }

    /// Returns true if a handler is registered for `event_type`.
    pub fn handles(&self, event_type: &str) -> bool {
        self.handlers.contains_key(event_type)
    }

    /// Registered event types, sorted.
    pub fn event_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    /// Routes an envelope to its handler.
    ///
    /// Unknown event types are not errors: they produce exactly one info
    /// log entry and [`DispatchOutcome::Unhandled`].
    ///
    /// # Errors
    ///
    /// Propagates the handler's error unchanged.
    pub async fn dispatch(&self, envelope: &WebhookEnvelope) -> Result<DispatchOutcome, WebhookError> {
        let event_type = envelope.event_type();

        let Some(handler) = self.handlers.get(event_type) else {
            tracing::info!(
                event_type,
                event_id = envelope.event_id(),
                "No handler registered for webhook event type; acknowledging"
            );
            return Ok(DispatchOutcome::Unhandled {
                event_type: event_type.to_string(),
            });
        };

        handler.handle(envelope).await?;

        Ok(DispatchOutcome::Handled {
            event_type: event_type.to_string(),
        })
    }
}

impl std::fmt::Debug for EventRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRouter")
            .field("event_types", &self.event_types())
            .finish()
    }
}

/// Collects handlers and rejects duplicate registrations.
#[derive(Default)]
pub struct EventRouterBuilder {
    handlers: Vec<Arc<dyn WebhookEventHandler>>,
}

impl EventRouterBuilder {
    pub fn register(mut self, handler: Arc<dyn WebhookEventHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Builds the router.
    ///
    /// # Errors
    ///
    /// Returns `RouterError::DuplicateEventType` if two registrations claim
    /// the same event type.
    pub fn build(self) -> Result<EventRouter, RouterError> {
        let mut table: HashMap<String, Arc<dyn WebhookEventHandler>> = HashMap::new();

        for handler in self.handlers {
            for event_type in handler.event_types() {
                if table.contains_key(event_type) {
                    return Err(RouterError::DuplicateEventType(event_type.to_string()));
                }
                table.insert(event_type.to_string(), Arc::clone(&handler));
            }
        }

        Ok(EventRouter { handlers: table })
    }
}
