//! Downstream side effects invoked by event handlers.
//!
//! Calls come in two flavours:
//!
//! - **advisory**: retried, then logged and swallowed. Returns an
//!   [`AdvisoryOutcome`], which is not a `Result` and cannot be `?`-ed into
//!   a request failure.
//! - **required**: retried, then propagated as
//!   `WebhookError::ExternalService`.
//!
//! An optional deadline caps one call, retries included, so that a hanging
//! collector cannot hold the request past the server's own timeout. Handlers
//! issue at most one round of calls (joined when concurrent), so the deadline
//! also bounds the handler.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::foundation::RetryPolicy;
use crate::domain::webhook::WebhookError;
use crate::ports::{AnalyticsEvent, AnalyticsSink, Notification, NotificationSink, SinkError};

use super::retry::with_retry_if;

/// Result of an advisory call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvisoryOutcome {
    /// The call succeeded (possibly after retries).
    Delivered,
    /// The call failed for good; the failure was logged and absorbed.
    Absorbed { reason: String },
}

impl AdvisoryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, AdvisoryOutcome::Delivered)
    }
}

/// Downstream collaborators plus the retry policy wrapping every call.
#[derive(Clone)]
pub struct SideEffects {
    analytics: Arc<dyn AnalyticsSink>,
    notifications: Arc<dyn NotificationSink>,
    retry_policy: RetryPolicy,
    deadline: Option<Duration>,
}

impl SideEffects {
    pub fn new(
        analytics: Arc<dyn AnalyticsSink>,
        notifications: Arc<dyn NotificationSink>,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            analytics,
            notifications,
            retry_policy,
            deadline: None,
        }
    }

    /// Caps every call, retries included, at `deadline`.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Forwards an analytics event (advisory).
    pub async fn track(&self, event: AnalyticsEvent) -> AdvisoryOutcome {
        let label = format!("analytics:{}", event.event);
        self.advisory(&label, || self.analytics.track(&event)).await
    }

    /// Sends a CRM notification (advisory).
    pub async fn notify(&self, notification: Notification) -> AdvisoryOutcome {
        let label = format!("notification:{}", notification.subject);
        self.advisory(&label, || self.notifications.notify(&notification))
            .await
    }

    /// Runs a best-effort call; failures are logged and absorbed.
    pub async fn advisory<F, Fut>(&self, label: &str, operation: F) -> AdvisoryOutcome
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<(), SinkError>>,
    {
        match self.run(operation).await {
            Ok(()) => {
                tracing::debug!(side_effect = label, "Advisory side effect delivered");
                AdvisoryOutcome::Delivered
            }
            Err(err) => {
                tracing::warn!(
                    side_effect = label,
                    error = %err,
                    "Advisory side effect failed; continuing"
                );
                AdvisoryOutcome::Absorbed {
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Runs a call whose success the caller depends on.
    pub async fn required<T, F, Fut>(&self, label: &str, operation: F) -> Result<T, WebhookError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, SinkError>>,
    {
        self.run(operation).await.map_err(|err| {
            tracing::error!(side_effect = label, error = %err, "Required side effect failed");
            err
        })
    }

    async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, WebhookError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, SinkError>>,
    {
        let Some(deadline) = self.deadline else {
            return with_retry_if(&self.retry_policy, operation, SinkError::is_retryable).await;
        };

        let attempts = AtomicU32::new(0);
        let counted = || {
            attempts.fetch_add(1, Ordering::Relaxed);
            operation()
        };
        let result = tokio::time::timeout(
            deadline,
            with_retry_if(&self.retry_policy, counted, SinkError::is_retryable),
        )
        .await;

        match result {
            Ok(outcome) => outcome,
            Err(_) => Err(WebhookError::ExternalService {
                attempts: attempts.load(Ordering::Relaxed),
                message: format!("deadline of {}ms exceeded", deadline.as_millis()),
            }),
        }
    }
}
