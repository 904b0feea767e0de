//! HTTP analytics sink.
//!
//! Posts `{event, properties}` as JSON to the configured collector URL,
//! with a bearer API key when one is configured. Without a URL the sink is
//! disabled and drops events after a debug log.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};

use crate::adapters::outbound::{build_client, check_status, map_request_error};
use crate::ports::{AnalyticsEvent, AnalyticsSink, SinkError};

/// Analytics sink backed by an HTTP collector.
pub struct HttpAnalyticsSink {
    url: Option<String>,
    api_key: Option<SecretString>,
    client: Client,
}

impl HttpAnalyticsSink {
    /// Creates a sink; `url = None` disables delivery.
    pub fn new(
        url: Option<String>,
        api_key: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            url,
            api_key,
            client: build_client(timeout)?,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.url.is_some()
    }
}

#[async_trait]
impl AnalyticsSink for HttpAnalyticsSink {
    async fn track(&self, event: &AnalyticsEvent) -> Result<(), SinkError> {
        let Some(url) = &self.url else {
            tracing::debug!(event = %event.event, "Analytics sink disabled; dropping event");
            return Ok(());
        };

        let mut request = self.client.post(url).json(event);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        let response = request.send().await.map_err(map_request_error)?;
        check_status(response).await
    }
}

impl std::fmt::Debug for HttpAnalyticsSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAnalyticsSink")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
