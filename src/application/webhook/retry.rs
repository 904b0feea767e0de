//! Retry executor with bounded exponential backoff.
//!
//! Delays are `tokio::time::sleep`, so a retrying request only suspends
//! its own task.

use std::fmt::Display;
use std::future::Future;

use tokio::time::sleep;

use crate::domain::foundation::RetryPolicy;
use crate::domain::webhook::WebhookError;

/// Runs `operation` until it succeeds or `policy.max_attempts()` is reached.
///
/// Every error is treated as transient. On exhaustion the last error's
/// message is returned as `WebhookError::ExternalService`.
pub async fn with_retry<T, E, F, Fut>(policy: &RetryPolicy, operation: F) -> Result<T, WebhookError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    with_retry_if(policy, operation, |_| true).await
}

/// Like [`with_retry`], but stops at the first error `is_retryable` rejects.
pub async fn with_retry_if<T, E, F, Fut, P>(
    policy: &RetryPolicy,
    mut operation: F,
    is_retryable: P,
) -> Result<T, WebhookError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    P: Fn(&E) -> bool,
{
    let mut attempt = 0;

    loop {
        let delay = policy.delay_before(attempt);
        if !delay.is_zero() {
            sleep(delay).await;
        }

        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                attempt += 1;
                let retryable = is_retryable(&err);

                tracing::warn!(
                    attempt,
                    max_attempts = policy.max_attempts(),
                    retryable,
                    error = %err,
                    "Downstream attempt failed"
                );

                if !retryable || attempt >= policy.max_attempts() {
                    return Err(WebhookError::ExternalService {
                        attempts: attempt,
                        message: err.to_string(),
                    });
                }
            }
        }
    }
}
