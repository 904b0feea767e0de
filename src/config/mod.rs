//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `WEBHOOK_INGEST` prefix and nested values are separated by `__`.
//!
//! # Example
//!
//! ```no_run
//! use webhook_ingest::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod error;
mod integrations;
mod retry;
mod server;
mod webhook;

pub use error::{ConfigError, ValidationError};
pub use integrations::IntegrationsConfig;
pub use retry::RetryConfig;
pub use server::{Environment, ServerConfig};
pub use webhook::WebhookConfig;

use serde::Deserialize;
use std::time::Duration;

/// Time kept free at the end of the request timeout for building and
/// writing the response after side effects give up.
pub const RESPONSE_MARGIN: Duration = Duration::from_secs(2);

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a runnable
/// (if unconfigured) service. Load using [`AppConfig::load()`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Signature verification (secret, header)
    #[serde(default)]
    pub webhook: WebhookConfig,

    /// Retry policy for downstream side effects
    #[serde(default)]
    pub retry: RetryConfig,

    /// Analytics and notification sinks
    #[serde(default)]
    pub integrations: IntegrationsConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `WEBHOOK_INGEST` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `WEBHOOK_INGEST__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `WEBHOOK_INGEST__WEBHOOK__SIGNING_SECRET=...` -> `webhook.signing_secret = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("WEBHOOK_INGEST")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// A missing signing secret is not a validation error; see
    /// [`WebhookConfig::signing_secret`].
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.webhook.validate()?;
        self.retry.validate()?;
        self.integrations.validate()?;
        self.validate_side_effect_budget()?;
        Ok(())
    }

    /// Deadline for one side effect, retries included.
    ///
    /// Anything still running at this point is abandoned so that the
    /// request is answered before the server-side timeout fires.
    pub fn side_effect_deadline(&self) -> Duration {
        self.request_timeout().saturating_sub(RESPONSE_MARGIN)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    /// A side effect that uses its whole retry budget against a collector
    /// that keeps timing out must still finish inside the deadline.
    fn validate_side_effect_budget(&self) -> Result<(), ValidationError> {
        let worst_case = self.retry.policy()?.worst_case(self.integrations.timeout());
        if worst_case > self.side_effect_deadline() {
            return Err(ValidationError::SideEffectBudgetExceeded {
                worst_case_ms: worst_case.as_millis(),
                request_timeout_secs: self.server.request_timeout_secs,
            });
        }
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 7] = [
        "WEBHOOK_INGEST__SERVER__PORT",
        "WEBHOOK_INGEST__SERVER__ENVIRONMENT",
        "WEBHOOK_INGEST__WEBHOOK__SIGNING_SECRET",
        "WEBHOOK_INGEST__WEBHOOK__SIGNATURE_HEADER",
        "WEBHOOK_INGEST__RETRY__MAX_ATTEMPTS",
        "WEBHOOK_INGEST__RETRY__BASE_DELAY_MS",
        "WEBHOOK_INGEST__INTEGRATIONS__ANALYTICS_URL",
    ];

    /// Helper to clear environment variables after testing
    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_with_empty_environment_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();

        let config = AppConfig::load().unwrap();

        assert_eq!(config.server.port, 8080);
        assert!(config.webhook.signing_secret.is_none());
        assert_eq!(config.retry.max_attempts, 3);
        assert!(config.integrations.analytics_url.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("WEBHOOK_INGEST__SERVER__PORT", "9090");
        env::set_var("WEBHOOK_INGEST__SERVER__ENVIRONMENT", "production");
        env::set_var("WEBHOOK_INGEST__WEBHOOK__SIGNING_SECRET", "sq-test-secret");
        env::set_var("WEBHOOK_INGEST__RETRY__MAX_ATTEMPTS", "5");
        env::set_var("WEBHOOK_INGEST__RETRY__BASE_DELAY_MS", "250");
        env::set_var(
            "WEBHOOK_INGEST__INTEGRATIONS__ANALYTICS_URL",
            "https://analytics.example.com/track",
        );
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 9090);
        assert!(config.is_production());
        assert_eq!(
            config
                .webhook
                .signing_secret
                .as_ref()
                .map(|s| s.expose_secret().as_str()),
            Some("sq-test-secret")
        );
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.base_delay_ms, 250);
        assert_eq!(
            config.integrations.analytics_url.as_deref(),
            Some("https://analytics.example.com/track")
        );
    }

    #[test]
    fn test_validate_catches_bad_retry_policy() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("WEBHOOK_INGEST__RETRY__MAX_ATTEMPTS", "0");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.validate(), Err(ValidationError::InvalidRetryAttempts));
    }

    #[test]
    fn test_default_side_effect_budget_fits_request_timeout() {
        let config = AppConfig::default();
        let worst_case = config
            .retry
            .policy()
            .unwrap()
            .worst_case(config.integrations.timeout());

        assert!(config.validate().is_ok());
        assert_eq!(config.side_effect_deadline(), Duration::from_secs(28));
        assert!(worst_case + RESPONSE_MARGIN < config.request_timeout());
    }

    #[test]
    fn test_retry_budget_longer_than_request_timeout_rejected() {
        let mut config = AppConfig::default();
        config.integrations.timeout_secs = 10;

        // 3 x 10s + 0.5s + 1s of backoff
        assert_eq!(
            config.validate(),
            Err(ValidationError::SideEffectBudgetExceeded {
                worst_case_ms: 31_500,
                request_timeout_secs: 30,
            })
        );
    }

    #[test]
    fn test_retry_budget_without_response_margin_rejected() {
        let mut config = AppConfig::default();
        config.server.request_timeout_secs = 16;

        // 16.5s worst case fits neither 16s nor the 14s left after the margin
        assert!(matches!(
            config.validate(),
            Err(ValidationError::SideEffectBudgetExceeded { .. })
        ));

        config.server.request_timeout_secs = 19;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_never_prints_secrets() {
        let mut config = AppConfig::default();
        config.webhook.signing_secret = Some(secrecy::SecretString::new("whsec-hidden".to_string()));
        config.integrations.analytics_api_key = Some(secrecy::SecretString::new("ak-hidden".to_string()));

        let debug = format!("{:?}", config);
        assert!(!debug.contains("whsec-hidden"));
        assert!(!debug.contains("ak-hidden"));
    }
}
