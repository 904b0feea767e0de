//! HTTP notification sink.
//!
//! Posts `{kind, subject, fields}` to a CRM webhook URL. Without a URL the
//! sink is disabled.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::adapters::outbound::{build_client, check_status, map_request_error};
use crate::ports::{Notification, NotificationSink, SinkError};

#[derive(Debug)]
pub struct HttpNotificationSink {
    url: Option<String>,
    client: Client,
}

impl HttpNotificationSink {
    /// Creates a sink; `url = None` disables delivery.
    pub fn new(url: Option<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            url,
            client: build_client(timeout)?,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.url.is_some()
    }
}

#[async_trait]
impl NotificationSink for HttpNotificationSink {
    async fn notify(&self, notification: &Notification) -> Result<(), SinkError> {
        let Some(url) = &self.url else {
            tracing::debug!(
                subject = %notification.subject,
                "Notification sink disabled; dropping notification"
            );
            return Ok(());
        };

        let response = self
            .client
            .post(url)
            .json(notification)
            .send()
            .await
            .map_err(map_request_error)?;

        check_status(response).await
    }
}
