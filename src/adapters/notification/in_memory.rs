//! In-memory notification sink for tests.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::adapters::scripted::FailureScript;
use crate::ports::{Notification, NotificationSink, SinkError};

/// In-memory notification sink.
#[derive(Debug)]
pub struct InMemoryNotificationSink {
    sent: Mutex<Vec<Notification>>,
    script: FailureScript,
}

impl InMemoryNotificationSink {
    pub fn new() -> Self {
        Self::with_script(FailureScript::succeeding())
    }

    /// Fails the first `times` attempts with `error`, then accepts.
    pub fn failing_times(times: u32, error: SinkError) -> Self {
        Self::with_script(FailureScript::failing_times(times, error))
    }

    /// Fails every attempt with `error`.
    pub fn always_failing(error: SinkError) -> Self {
        Self::with_script(FailureScript::always_failing(error))
    }

    fn with_script(script: FailureScript) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            script,
        }
    }

    /// Notifications that were delivered successfully.
    pub fn notifications(&self) -> Vec<Notification> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn attempt_count(&self) -> u32 {
        self.script.attempts()
    }
}

impl Default for InMemoryNotificationSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationSink for InMemoryNotificationSink {
    async fn notify(&self, notification: &Notification) -> Result<(), SinkError> {
        self.script.next_attempt()?;
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification.clone());
        Ok(())
    }
}
