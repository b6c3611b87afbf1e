//! Retry loop with per-attempt timeout and exponential backoff.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::classify::{classify, describe_failure, RemoteError};
use crate::config::Config;
use crate::error::{CallError, FailureKind};

// == Retry Policy ==
/// Timing knobs of the executor.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Hard limit on a single attempt
    pub timeout: Duration,
    /// Attempts after the first one
    pub max_retries: u32,
    /// Sleep before the first retry
    pub initial_delay: Duration,
    /// Factor applied to the sleep after every retry
    pub backoff_multiplier: f64,
    /// Wait hint shown on quota failures
    pub quota_wait: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            timeout: config.api_timeout,
            max_retries: config.api_max_retries,
            initial_delay: config.api_retry_delay,
            backoff_multiplier: config.api_retry_backoff,
            quota_wait: config.quota_wait,
        }
    }

    /// Sleep before retry number `attempt + 1`: `initial_delay * backoff_multiplier^attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self.backoff_multiplier.powi(attempt.min(i32::MAX as u32) as i32);
        Duration::try_from_secs_f64(self.initial_delay.as_secs_f64() * factor)
            .unwrap_or(Duration::MAX)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

// == Retry Executor ==
/// Runs remote operations under a [`RetryPolicy`].
#[derive(Debug, Clone)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    // == Execute ==
    /// Runs `operation` until it succeeds, fails terminally, or attempts run out.
    ///
    /// Timeouts and transient network failures are retried with backoff and,
    /// once attempts are exhausted, surface as [`FailureKind::Network`]. Every
    /// other failure is returned after the attempt that produced it. A timed
    /// out attempt is dropped, not awaited.
    ///
    /// # Arguments
    /// * `name` - Label used in logs and in the returned error
    /// * `operation` - Produces a fresh future per attempt
    pub async fn execute<T, F, Fut>(&self, name: &str, mut operation: F) -> Result<T, CallError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, RemoteError>>,
    {
        let max_retries = self.policy.max_retries;
        let attempts = max_retries.saturating_add(1);
        let mut last_cause = String::new();

        for attempt in 0..=max_retries {
            debug!("Executing {} (attempt {}/{})", name, attempt + 1, attempts);

            let (kind, cause) = match tokio::time::timeout(self.policy.timeout, operation()).await {
                Ok(Ok(value)) => {
                    if attempt > 0 {
                        info!("{} succeeded after {} attempts", name, attempt + 1);
                    }
                    return Ok(value);
                }
                Ok(Err(err)) => {
                    let kind = classify(&err);
                    (kind, describe_failure(kind, &err, self.policy.quota_wait))
                }
                Err(_) => (
                    FailureKind::Timeout,
                    format!("timed out after {:.1}s", self.policy.timeout.as_secs_f64()),
                ),
            };

            if !kind.is_retryable() {
                error!("{} failed ({}): {}", name, kind, cause);
                return Err(CallError::new(kind, name, cause));
            }

            warn!(
                "{} failed ({}) on attempt {}: {}",
                name,
                kind,
                attempt + 1,
                cause
            );
            last_cause = cause;

            if attempt < max_retries {
                let delay = self.policy.delay_for(attempt);
                info!("Retrying {} in {:.1}s...", name, delay.as_secs_f64());
                tokio::time::sleep(delay).await;
            }
        }

        error!("{} failed after {} attempts", name, attempts);
        Err(CallError::new(FailureKind::Network, name, last_cause))
    }
}
