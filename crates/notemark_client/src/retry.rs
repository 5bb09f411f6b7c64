//! Retry with exponential backoff.

use crate::error::{ApiError, ApiResult};
use std::future::Future;
use std::time::{Duration, Instant};

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,
    /// Initial delay between retries.
    pub min_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Multiplier for exponential backoff.
    pub factor: f64,
    /// Whether to multiply delays by a uniform jitter in `[0.5, 1.5)`.
    pub jitter: bool,
    /// Total elapsed budget; once exceeded, the original error is raised.
    pub max_elapsed: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 4,
            min_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(10),
            factor: 2.0,
            jitter: true,
            max_elapsed: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with no retries.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Sets the maximum retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the initial delay.
    pub fn with_min_delay(mut self, delay: Duration) -> Self {
        self.min_delay = delay;
        self
    }

    /// Sets the maximum delay.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Enables or disables jitter.
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Sets the total elapsed budget.
    pub fn with_max_elapsed(mut self, budget: Duration) -> Self {
        self.max_elapsed = budget;
        self
    }
}

/// Runs an operation, retrying on retryable errors with exponential
/// backoff.
///
/// A server-specified retry delay, when the error carries one, overrides
/// the computed delay for that attempt. Every wait is jittered (when
/// enabled) and then capped at `max_delay`. Exhaustion of the attempt
/// count or the elapsed budget re-raises the original error.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> ApiResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ApiResult<T>>,
{
    let start = Instant::now();
    let mut attempt = 0u32;
    let mut delay = policy.min_delay;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                attempt += 1;
                if !err.is_retryable()
                    || attempt > policy.max_retries
                    || start.elapsed() > policy.max_elapsed
                {
                    return Err(err);
                }
                let mut wait = err.retry_after().unwrap_or(delay);
                if policy.jitter {
                    wait = wait.mul_f64(0.5 + rand::random::<f64>());
                }
                if wait > policy.max_delay {
                    wait = policy.max_delay;
                }
                tracing::debug!(attempt, wait_ms = wait.as_millis() as u64, "retrying after error");
                tokio::time::sleep(wait).await;
                delay = std::cmp::min(policy.max_delay, delay.mul_f64(policy.factor));
            }
        }
    }
}
