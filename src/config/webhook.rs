//! Webhook verification configuration

use http::HeaderName;
use secrecy::SecretString;
use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::webhook::DEFAULT_SIGNATURE_HEADER;

/// Webhook verification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    /// Shared HMAC signing secret. When absent the service still starts but
    /// rejects every webhook.
    pub signing_secret: Option<SecretString>,

    /// Header carrying the base64 body signature
    #[serde(default = "default_signature_header")]
    pub signature_header: String,
}

impl WebhookConfig {
    /// Parsed signature header name.
    pub fn header_name(&self) -> Result<HeaderName, ValidationError> {
        HeaderName::from_bytes(self.signature_header.trim().as_bytes())
            .map_err(|_| ValidationError::InvalidSignatureHeader(self.signature_header.clone()))
    }

    pub fn has_signing_secret(&self) -> bool {
        use secrecy::ExposeSecret;
        self.signing_secret
            .as_ref()
            .is_some_and(|s| !s.expose_secret().is_empty())
    }

    /// Validate webhook configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.header_name()?;
        Ok(())
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            signing_secret: None,
            signature_header: default_signature_header(),
        }
    }
}

fn default_signature_header() -> String {
    DEFAULT_SIGNATURE_HEADER.to_string()
}
