//! Process wiring: tracing, dependency graph, shutdown.

use std::sync::Arc;

use axum::Router;
use thiserror::Error;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::adapters::analytics::HttpAnalyticsSink;
use crate::adapters::http::{app_router, WebhookAppState};
use crate::adapters::notification::HttpNotificationSink;
use crate::application::handlers::default_router;
use crate::application::webhook::{IngestWebhookHandler, RouterError, SideEffects};
use crate::config::{AppConfig, ConfigError, ServerConfig, ValidationError};
use crate::domain::webhook::HmacSha256Verifier;

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Failed to build event router: {0}")]
    Router(#[from] RouterError),

    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Initializes the global subscriber.
///
/// `RUST_LOG` wins over `server.log_level`. Production logs are JSON.
pub fn init_tracing(server: &ServerConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    if server.is_production() {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Builds the shared request state from configuration.
pub fn build_state(config: &AppConfig) -> Result<WebhookAppState, StartupError> {
    let integrations = &config.integrations;

    let analytics = HttpAnalyticsSink::new(
        integrations.analytics_url.clone(),
        integrations.analytics_api_key.clone(),
        integrations.timeout(),
    )?;
    let notifications =
        HttpNotificationSink::new(integrations.notification_url.clone(), integrations.timeout())?;

    if !analytics.is_enabled() {
        tracing::info!("Analytics sink disabled (no analytics_url configured)");
    }
    if !notifications.is_enabled() {
        tracing::info!("Notification sink disabled (no notification_url configured)");
    }

    let effects = SideEffects::new(
        Arc::new(analytics),
        Arc::new(notifications),
        config.retry.policy()?,
    )
    .with_deadline(config.side_effect_deadline());
    let router = default_router(effects)?;

    let verifier = HmacSha256Verifier::from_optional(config.webhook.signing_secret.clone());
    if !verifier.is_configured() {
        tracing::error!(
            "Webhook signing secret is not configured; every webhook will be rejected with 401"
        );
    }

    tracing::debug!(event_types = ?router.event_types(), "Event router ready");

    Ok(WebhookAppState {
        ingest: Arc::new(IngestWebhookHandler::new(
            Arc::new(verifier),
            Arc::new(router),
        )),
        signature_header: config.webhook.header_name()?,
        disclosure: config.server.error_disclosure(),
    })
}

/// Builds the complete HTTP application.
pub fn build_app(config: &AppConfig) -> Result<Router, StartupError> {
    let state = build_state(config)?;
    Ok(app_router(state, config.request_timeout()))
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal, starting graceful shutdown");
        },
    }
}
