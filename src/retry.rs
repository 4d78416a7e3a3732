//! Retry logic with exponential backoff
//!
//! Both fetch paths (JSON pages and binary payloads) share one bounded retry
//! policy: transient failures are retried up to [`RetryConfig::max_attempts`]
//! times, sleeping `initial_delay * backoff_multiplier^attempt` after each
//! failed attempt, including the last. With the defaults (3 attempts, 1s,
//! multiplier 2) that is the 1s/2s/4s ladder. Jitter is available but off by
//! default.

use crate::error::Error;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// Retry behavior for fetch operations
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first (default: 3)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay after the first failed attempt (default: 1 second)
    #[serde(default = "default_initial_delay")]
    pub initial_delay: Duration,

    /// Upper bound on any single backoff delay (default: 60 seconds)
    #[serde(default = "default_max_delay")]
    pub max_delay: Duration,

    /// Multiplier for exponential backoff (default: 2.0)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Add random jitter to delays (default: false)
    #[serde(default)]
    pub jitter: bool,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay() -> Duration {
    Duration::from_secs(1)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(60)
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay: default_initial_delay(),
            max_delay: default_max_delay(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: false,
        }
    }
}

impl RetryConfig {
    /// Backoff delay for a zero-based failed attempt number
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self.backoff_multiplier.powi(attempt as i32);
        let delay = Duration::from_secs_f64(self.initial_delay.as_secs_f64() * factor);
        let delay = delay.min(self.max_delay);
        if self.jitter { add_jitter(delay) } else { delay }
    }
}

/// Trait for errors that can be classified as retryable or not
///
/// Transient failures (connection trouble, unexpected statuses) return
/// `true`; permanent failures (database errors, bad configuration) return
/// `false` and abort the operation immediately.
pub trait IsRetryable {
    /// Returns true if the error is transient and the operation should be retried
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for Error {
    fn is_retryable(&self) -> bool {
        match self {
            Error::Network(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            // Any non-success status is treated as transient; the attempt
            // bound keeps a persistent 4xx from looping.
            Error::Status { .. } => true,
            Error::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut
                    | std::io::ErrorKind::ConnectionRefused
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::BrokenPipe
                    | std::io::ErrorKind::Interrupted
            ),
            Error::Config(_)
            | Error::Database(_)
            | Error::Duplicate(_)
            | Error::Serialization(_)
            | Error::Tagging(_) => false,
        }
    }
}

/// Execute an async operation with bounded exponential-backoff retries
///
/// Returns the first success, or the last error once `max_attempts` have been
/// made. Non-retryable errors are returned immediately. A backoff sleep
/// follows every failed retryable attempt, the final one included.
pub async fn with_backoff<F, Fut, T, E>(config: &RetryConfig, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: IsRetryable + std::fmt::Display,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    tracing::info!(attempts = attempt + 1, "operation succeeded after retry");
                }
                return Ok(result);
            }
            Err(e) if e.is_retryable() => {
                let delay = config.delay_for(attempt);
                tracing::warn!(
                    error = %e,
                    attempt = attempt,
                    max_attempts = config.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "operation failed, backing off"
                );
                tokio::time::sleep(delay).await;

                attempt += 1;
                if attempt >= config.max_attempts {
                    tracing::error!(
                        error = %e,
                        attempts = attempt,
                        "operation failed after all retry attempts exhausted"
                    );
                    return Err(e);
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "operation failed with non-retryable error");
                return Err(e);
            }
        }
    }
}

/// Add uniform random jitter between 0% and 100% of the delay
fn add_jitter(delay: Duration) -> Duration {
    let jitter_ms = rand::thread_rng().gen_range(0..=delay.as_millis() as u64);
    delay + Duration::from_millis(jitter_ms)
}
