//! Retry configuration for downstream side effects

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::foundation::{RetryPolicy, RetryPolicyError};

/// Retry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per call, first one included
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the second attempt; doubles after each failure
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

impl RetryConfig {
    /// Builds the policy used by the side-effect wrappers.
    pub fn policy(&self) -> Result<RetryPolicy, ValidationError> {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.base_delay_ms)).map_err(
            |err| match err {
                RetryPolicyError::ZeroAttempts => ValidationError::InvalidRetryAttempts,
                RetryPolicyError::ZeroDelay => ValidationError::InvalidRetryDelay,
            },
        )
    }

    /// Validate retry configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.policy().map(|_| ())
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    500
}
