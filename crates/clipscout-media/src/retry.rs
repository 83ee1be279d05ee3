//! Bounded sequential retry with a fixed inter-attempt delay.
//!
//! Deliberately sequential, not concurrent fan-out: the upstream is likely
//! already rate-limiting, and parallel attempts would amplify load.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

/// Retry policy for one provider.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts (including the first)
    pub attempts: u32,
    /// Fixed delay between attempts
    pub delay: Duration,
}

impl RetryPolicy {
    /// One attempt, no retry.
    pub fn single() -> Self {
        Self {
            attempts: 1,
            delay: Duration::ZERO,
        }
    }

    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }
}

/// Run an operation under a retry policy.
///
/// The operation receives the zero-based attempt number so it can vary
/// per-attempt state (e.g. rotate a client identity). First success
/// short-circuits remaining attempts.
pub async fn retry_with_policy<F, Fut, T, E>(policy: &RetryPolicy, operation: F) -> Result<T, E>
where
    F: Fn(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0u32;
    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if attempt + 1 < policy.attempts => {
                attempt += 1;
                debug!(
                    attempt,
                    delay_ms = policy.delay.as_millis() as u64,
                    "Attempt failed, retrying: {}",
                    e
                );
                tokio::time::sleep(policy.delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
