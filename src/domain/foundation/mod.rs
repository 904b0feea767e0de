//! Foundation module - Shared domain primitives.
//!
//! Contains the error taxonomy and the retry policy value object used
//! across the ingestion pipeline.

mod errors;
mod retry_policy;

pub use errors::{
    classify, ClassifiedError, Disclosure, ErrorKind, GENERIC_INTERNAL_MESSAGE,
};
pub use retry_policy::{RetryPolicy, RetryPolicyError};
