//! In-memory analytics sink for tests.
//!
//! Records every delivered event and every attempt, and can be scripted to
//! fail a number of attempts (or all of them).

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::adapters::scripted::FailureScript;
use crate::ports::{AnalyticsEvent, AnalyticsSink, SinkError};

/// In-memory analytics sink.
#[derive(Debug)]
pub struct InMemoryAnalyticsSink {
    events: Mutex<Vec<AnalyticsEvent>>,
    script: FailureScript,
}

impl InMemoryAnalyticsSink {
    /// Creates a sink that accepts every event.
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
            events: Mutex::new(Vec::new()),
            script,
        }
    }

    // === Test Helpers ===

    /// Events that were delivered successfully.
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Names of delivered events, in delivery order.
    pub fn event_names(&self) -> Vec<String> {
        self.events().into_iter().map(|e| e.event).collect()
    }

    /// Number of `track` calls, failed ones included.
    pub fn attempt_count(&self) -> u32 {
        self.script.attempts()
    }
}

impl Default for InMemoryAnalyticsSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnalyticsSink for InMemoryAnalyticsSink {
    async fn track(&self, event: &AnalyticsEvent) -> Result<(), SinkError> {
        self.script.next_attempt()?;
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
        Ok(())
    }
}
