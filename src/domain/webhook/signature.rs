//! Webhook signature verification.
//!
//! The provider signs the raw request body with HMAC-SHA256 keyed by the
//! shared signing secret and sends the base64 digest in a header. We
//! recompute the digest over the exact bytes received and compare in
//! constant time.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Header the provider uses for the body signature.
pub const DEFAULT_SIGNATURE_HEADER: &str = "x-square-hmacsha256-signature";

/// Request bytes that passed signature verification.
///
/// Only [`SignatureVerifier::authenticate`] can produce one, so anything
/// decoded from a `VerifiedBody` is known to be authentic.
#[derive(Debug, Clone, Copy)]
pub struct VerifiedBody<'a> {
    bytes: &'a [u8],
}

impl<'a> VerifiedBody<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

/// Verifies `signature_header` against `raw_body` using `secret`.
///
/// Returns `false` for an empty secret, a header that is not base64, a
/// digest of the wrong length, or a digest mismatch.
pub fn verify(raw_body: &[u8], signature_header: &str, secret: &[u8]) -> bool {
    if secret.is_empty() {
        return false;
    }

    let provided = match STANDARD.decode(signature_header.trim()) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };

    match compute_signature(secret, raw_body) {
        Some(expected) => constant_time_compare(&expected, &provided),
        None => false,
    }
}

/// Produces the base64 signature the provider would send for `payload`.
pub fn sign_payload(secret: &[u8], payload: &[u8]) -> Option<String> {
    compute_signature(secret, payload).map(|digest| STANDARD.encode(digest))
}

fn compute_signature(secret: &[u8], payload: &[u8]) -> Option<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(payload);
    Some(mac.finalize().into_bytes().to_vec())
}

/// Performs constant-time comparison of two byte slices.
///
/// Length is not secret; only the content comparison must not leak where
/// the first differing byte is.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Authenticates raw webhook bodies.
pub trait SignatureVerifier: Send + Sync {
    /// Returns true if `signature` is valid for `payload`.
    fn verify(&self, payload: &[u8], signature: &str) -> bool;

    /// Verifies and, on success, hands back the body as a [`VerifiedBody`].
    fn authenticate<'a>(&self, payload: &'a [u8], signature: &str) -> Option<VerifiedBody<'a>> {
        self.verify(payload, signature)
            .then(|| VerifiedBody::new(payload))
    }
}

/// HMAC-SHA256 verifier for base64-encoded signatures.
///
/// A verifier without a secret rejects every request and logs a
/// configuration diagnostic each time.
#[derive(Debug, Clone)]
pub struct HmacSha256Verifier {
    secret: Option<SecretString>,
}

impl HmacSha256Verifier {
    /// Creates a verifier with the given signing secret.
    ///
    /// An empty secret is treated as missing.
    pub fn new(secret: impl Into<String>) -> Self {
        let secret = secret.into();
        Self {
            secret: (!secret.is_empty()).then(|| SecretString::new(secret)),
        }
    }

    /// Creates a verifier from an optional secret (as read from config).
    pub fn from_optional(secret: Option<SecretString>) -> Self {
        Self {
            secret: secret.filter(|s| !s.expose_secret().is_empty()),
        }
    }

    /// Creates a verifier with no secret.
    pub fn unconfigured() -> Self {
        Self { secret: None }
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }
}

impl SignatureVerifier for HmacSha256Verifier {
    fn verify(&self, payload: &[u8], signature: &str) -> bool {
        let Some(secret) = &self.secret else {
            tracing::error!("Webhook signing secret is not configured; rejecting webhook");
            return false;
        };

        let valid = verify(payload, signature, secret.expose_secret().as_bytes());
        if !valid {
            tracing::debug!(payload_len = payload.len(), "Webhook signature verification failed");
        }
        valid
    }
}
