//! Retry logic.
//!
//! # Responsibilities
//! - Run an attempt function up to `max_retries + 1` times
//! - Sleep `base × 2^index` between attempts
//! - Return the last failure unchanged once attempts are exhausted
//!
//! # Design Decisions
//! - Retries are unconditional on failure kind (timeout, network, non-2xx)
//! - No jitter and no retry budget
//! - Attempts are strictly sequential; the next one starts only after the
//!   previous outcome is resolved and its delay has elapsed
//! - Non-2xx replies are retried even for POST, so a partially processed
//!   order can be sent twice

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use crate::config::UpstreamConfig;
use crate::resilience::backoff::backoff_delay;
use crate::resilience::timeouts::CallAttempt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    /// Deadline handed to every `CallAttempt`.
    pub attempt_timeout: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration, attempt_timeout: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            attempt_timeout,
        }
    }

    pub fn from_config(config: &UpstreamConfig) -> Self {
        Self::new(config.retries, config.base_delay(), config.timeout())
    }

    pub fn total_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    pub async fn run<T, E, F, Fut>(&self, mut attempt_fn: F) -> Result<T, E>
    where
        F: FnMut(CallAttempt) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut index = 0;
        loop {
            let attempt = CallAttempt::new(index, self.attempt_timeout);
            match attempt_fn(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) if index >= self.max_retries => {
                    tracing::warn!(
                        attempts = index + 1,
                        error = %err,
                        "Retries exhausted"
                    );
                    return Err(err);
                }
                Err(err) => {
                    let delay = backoff_delay(self.base_delay, index);
                    tracing::info!(
                        attempt = index,
                        delay = ?delay,
                        error = %err,
                        "Attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    index += 1;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&UpstreamConfig::default())
    }
}
