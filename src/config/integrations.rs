//! Downstream integration configuration (analytics, CRM notifications)

use reqwest::Url;
use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Downstream integration configuration
///
/// Each sink is disabled when its URL is absent.
#[derive(Debug, Clone, Deserialize)]
pub struct IntegrationsConfig {
    /// Analytics collector endpoint
    pub analytics_url: Option<String>,

    /// Bearer key for the analytics collector
    pub analytics_api_key: Option<SecretString>,

    /// CRM / notification webhook endpoint
    pub notification_url: Option<String>,

    /// Per-request timeout for downstream calls, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl IntegrationsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate integration configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_url(self.analytics_url.as_deref(), "analytics_url")?;
        validate_url(self.notification_url.as_deref(), "notification_url")?;
        if self.timeout_secs == 0 || self.timeout_secs > 120 {
            return Err(ValidationError::InvalidIntegrationTimeout);
        }
        Ok(())
    }
}

fn validate_url(url: Option<&str>, name: &'static str) -> Result<(), ValidationError> {
    let Some(url) = url else {
        return Ok(());
    };
    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(ValidationError::InvalidIntegrationUrl(name)),
    }
}

impl Default for IntegrationsConfig {
    fn default() -> Self {
        Self {
            analytics_url: None,
            analytics_api_key: None,
            notification_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    5
}
