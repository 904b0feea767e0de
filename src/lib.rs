//! Webhook Ingest - Signed webhook ingestion with resilient downstream dispatch
//!
//! Authenticates provider webhooks (HMAC-SHA256 over the raw body), decodes
//! the envelope, routes it by event type, and forwards derived events to
//! analytics and CRM sinks with bounded retries.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod startup;
