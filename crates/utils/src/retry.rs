//! Bounded-retry driver with exponential backoff.
//!
//! Used in exactly two places: transparent HTTP 429 retries in the
//! transport, and the test-run poll loop in the submission pipeline. Both
//! share the semantics "a pending result is normal, an exhausted budget is
//! a normal negative outcome, an error is an error".

use kata_core::{Result, RetryConfig};
use std::future::Future;
use tokio::time::sleep;

/// One attempt's outcome: either the value is ready or the caller should
/// wait and try again.
#[derive(Debug)]
pub enum Attempt<T> {
    Ready(T),
    Pending,
}

/// Run `operation` up to `config.max_attempts` times, sleeping
/// `config.delay(attempt)` between attempts. Returns `Ok(None)` when every
/// attempt came back [`Attempt::Pending`]; errors propagate immediately.
pub async fn retry<F, Fut, T>(config: &RetryConfig, operation: F) -> Result<Option<T>>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Attempt<T>>>,
{
    for attempt in 0..config.max_attempts {
        match operation().await? {
            Attempt::Ready(value) => {
                if attempt > 0 {
                    tracing::debug!(attempt = attempt + 1, "operation ready after retries");
                }
                return Ok(Some(value));
            }
            Attempt::Pending => {
                if attempt + 1 < config.max_attempts {
                    let delay = config.delay(attempt);
                    tracing::debug!(
                        attempt = attempt + 1,
                        max_attempts = config.max_attempts,
                        ?delay,
                        "operation pending, waiting before next attempt"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
    Ok(None)
}
