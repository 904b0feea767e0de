//! Webhook domain module.
//!
//! # Module Structure
//!
//! - `signature` - HMAC-SHA256 verification of raw request bodies
//! - `envelope` - Decoding authenticated bodies into typed envelopes
//! - `errors` - Pipeline error type mapped onto the shared taxonomy

mod envelope;
mod errors;
mod signature;

pub use envelope::WebhookEnvelope;
pub use errors::WebhookError;
pub use signature::{
    sign_payload, verify, HmacSha256Verifier, SignatureVerifier, VerifiedBody,
    DEFAULT_SIGNATURE_HEADER,
};

#[cfg(test)]
pub(crate) use envelope::test_envelope;
