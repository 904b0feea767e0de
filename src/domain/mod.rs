//! Domain layer containing the pipeline's core types.
//!
//! # Module Organization
//!
//! - `foundation` - Error taxonomy and retry policy
//! - `webhook` - Signature verification, envelope decoding, pipeline errors

pub mod foundation;
pub mod webhook;
