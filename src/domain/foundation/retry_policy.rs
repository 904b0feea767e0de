//! Retry policy value object.

use std::time::Duration;

use thiserror::Error;

/// Errors from constructing a [`RetryPolicy`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetryPolicyError {
    #[error("max_attempts must be at least 1")]
    ZeroAttempts,

    #[error("base_delay must be greater than zero")]
    ZeroDelay,
}

/// Bounded exponential backoff configuration.
///
/// `max_attempts` counts every invocation including the first. The delay
/// before attempt `n` (n >= 1) is `base_delay * 2^(n-1)`; attempt 0 runs
/// immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// Creates a validated policy.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Result<Self, RetryPolicyError> {
        if max_attempts == 0 {
            return Err(RetryPolicyError::ZeroAttempts);
        }
        if base_delay.is_zero() {
            return Err(RetryPolicyError::ZeroDelay);
        }
        Ok(Self {
            max_attempts,
            base_delay,
        })
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Delay to wait before the given zero-based attempt.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let factor = 1u32.checked_shl(attempt - 1).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    /// Longest time a full retry run can take when each attempt is capped
    /// at `per_attempt`: every attempt plus every backoff delay.
    pub fn worst_case(&self, per_attempt: Duration) -> Duration {
        (0..self.max_attempts).fold(Duration::ZERO, |total, attempt| {
            total
                .saturating_add(self.delay_before(attempt))
                .saturating_add(per_attempt)
        })
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}
