//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid socket address: {0}")]
    InvalidSocketAddress(String),

    #[error("Invalid signature header name: {0}")]
    InvalidSignatureHeader(String),

    #[error("Retry max_attempts must be at least 1")]
    InvalidRetryAttempts,

    #[error("Retry base_delay_ms must be greater than zero")]
    InvalidRetryDelay,

    #[error("Invalid URL for {0}: must be an http(s) URL")]
    InvalidIntegrationUrl(&'static str),

    #[error("Integration timeout must be between 1 and 120 seconds")]
    InvalidIntegrationTimeout,

    #[error(
        "Side effects can run for {worst_case_ms}ms, which does not leave a response margin \
         inside the {request_timeout_secs}s request timeout"
    )]
    SideEffectBudgetExceeded {
        worst_case_ms: u128,
        request_timeout_secs: u64,
    },
}
