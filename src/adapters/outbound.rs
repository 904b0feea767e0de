//! Shared plumbing for the outbound HTTP sinks.

use std::time::Duration;

use reqwest::{Client, Response};

use crate::ports::SinkError;

/// Builds the client used by an outbound sink.
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(timeout).build()
}

/// Maps a transport failure to a sink error.
pub fn map_request_error(err: reqwest::Error) -> SinkError {
    if err.is_timeout() {
        SinkError::timeout(err.to_string())
    } else if err.is_connect() {
        SinkError::network(format!("Connection failed: {}", err))
    } else if err.is_builder() {
        SinkError::serialization(err.to_string())
    } else {
        SinkError::network(err.to_string())
    }
}

/// Turns a non-success response into a sink error.
pub async fn check_status(response: Response) -> Result<(), SinkError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    let body = response.text().await.unwrap_or_default();
    Err(SinkError::from_status(status.as_u16(), truncate(&body, 256)))
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}
