//! Sequential retry with exponential backoff.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::{info, warn};

pub const DEFAULT_RETRIES: u32 = 2;
pub const DEFAULT_BASE_DELAY_MS: u64 = 600;
pub const DEFAULT_BACKOFF_FACTOR: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Additional attempts after the first one.
    pub retries: u32,
    pub base_delay: Duration,
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: DEFAULT_RETRIES,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
        }
    }
}

impl RetryPolicy {
    /// Delay after `delay`, rounded up to whole milliseconds.
    pub fn next_delay(&self, delay: Duration) -> Duration {
        let factor = if self.backoff_factor.is_finite() && self.backoff_factor > 0.0 {
            self.backoff_factor
        } else {
            1.0
        };
        let next_ms = (delay.as_millis() as f64 * factor).ceil();
        Duration::from_millis(next_ms as u64)
    }

    /// The delays slept between attempts, in order.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        std::iter::successors(Some(self.base_delay), move |delay| Some(self.next_delay(*delay)))
            .take(self.retries as usize)
    }

    /// Upper bound on wall-clock time: every attempt times out and every delay is slept.
    /// Saturates at `Duration::MAX`.
    pub fn worst_case(&self, attempt_timeout: Duration) -> Duration {
        let mut total = attempt_timeout.saturating_mul(self.retries.saturating_add(1));
        for delay in self.delays() {
            total = total.saturating_add(delay);
            if total == Duration::MAX {
                break;
            }
        }
        total
    }
}

/// Runs `operation` until it succeeds, fails with an error `should_retry` rejects, or the
/// policy's retries are used up. `operation` receives the zero-based attempt number.
pub async fn retry_with_backoff<T, E, F, Fut, P>(
    policy: &RetryPolicy,
    should_retry: P,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: Display,
{
    let mut attempt = 0;
    let mut delay = policy.base_delay;

    loop {
        match operation(attempt).await {
            Ok(value) => {
                if attempt > 0 {
                    info!(attempt, "LLM call succeeded after retry");
                }
                return Ok(value);
            }
            Err(error) => {
                if !should_retry(&error) {
                    warn!("LLM call failed with non-retryable error: {error}");
                    return Err(error);
                }
                if attempt >= policy.retries {
                    warn!("LLM call failed after {} attempts: {error}", attempt + 1);
                    return Err(error);
                }

                warn!(
                    "LLM call attempt {} failed ({error}), retrying after {}ms...",
                    attempt + 1,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
                delay = policy.next_delay(delay);
                attempt += 1;
            }
        }
    }
}
