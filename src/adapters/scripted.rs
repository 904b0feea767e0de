//! Failure scripting shared by the in-memory sinks.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::ports::SinkError;

/// Decides, per attempt, whether an in-memory sink should fail.
#[derive(Debug)]
pub(crate) struct FailureScript {
    error: Option<SinkError>,
    /// `None` means fail forever.
    failures_left: Option<AtomicU32>,
    attempts: AtomicU32,
}

impl FailureScript {
    pub(crate) fn succeeding() -> Self {
        Self {
            error: None,
            failures_left: Some(AtomicU32::new(0)),
            attempts: AtomicU32::new(0),
        }
    }

    pub(crate) fn failing_times(times: u32, error: SinkError) -> Self {
        Self {
            error: Some(error),
            failures_left: Some(AtomicU32::new(times)),
            attempts: AtomicU32::new(0),
        }
    }

    pub(crate) fn always_failing(error: SinkError) -> Self {
        Self {
            error: Some(error),
            failures_left: None,
            attempts: AtomicU32::new(0),
        }
    }

    /// Records an attempt and returns the scripted error, if any.
    pub(crate) fn next_attempt(&self) -> Result<(), SinkError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        let Some(error) = &self.error else {
            return Ok(());
        };

        match &self.failures_left {
            None => Err(error.clone()),
            Some(left) => {
                let previous = left.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
                match previous {
                    Ok(_) => Err(error.clone()),
                    Err(_) => Ok(()),
                }
            }
        }
    }

    pub(crate) fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}
