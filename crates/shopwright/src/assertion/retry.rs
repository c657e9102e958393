//! Retry assertions with polling.
//!
//! Auto-retrying checks for eventually-consistent UI state: the check is
//! re-run until it passes or the bound elapses, and the last failure message
//! is reported.

use crate::config::Timeouts;
use crate::result::{ShopError, ShopResult};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::{Duration, Instant};

/// Result of a single check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssertionCheckResult {
    /// Assertion passed
    Pass,
    /// Assertion failed with message
    Fail(String),
}

impl AssertionCheckResult {
    /// Pass when `condition` holds, otherwise fail with `message`
    pub fn from_bool(condition: bool, message: impl FnOnce() -> String) -> Self {
        if condition {
            Self::Pass
        } else {
            Self::Fail(message())
        }
    }

    /// Check if the result is a pass
    #[must_use]
    pub const fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// Configuration for retry behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total timeout duration
    pub timeout: Duration,
    /// Interval between retry attempts
    pub poll_interval: Duration,
    /// Maximum number of attempts (0 = unlimited within timeout)
    pub max_retries: usize,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(100),
            max_retries: 0,
        }
    }
}

impl From<&Timeouts> for RetryConfig {
    fn from(timeouts: &Timeouts) -> Self {
        Self {
            timeout: Duration::from_millis(timeouts.expect_ms),
            poll_interval: Duration::from_millis(timeouts.poll_ms),
            max_retries: 0,
        }
    }
}

impl RetryConfig {
    /// Create a new retry config with timeout
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll_interval: Duration::from_millis(100),
            max_retries: 0,
        }
    }

    /// Set the timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the poll interval
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set maximum attempts
    #[must_use]
    pub const fn with_max_retries(mut self, max: usize) -> Self {
        self.max_retries = max;
        self
    }
}

/// Result of a successful retry
#[derive(Debug, Clone, Copy)]
pub struct RetryResult {
    /// Number of attempts before success
    pub attempts: usize,
    /// Total duration of all attempts
    pub duration: Duration,
}

/// Re-run `check` until it passes.
///
/// On expiry the error is a [`ShopError::Timeout`] whose expectation reads
/// `"{description}: {last failure}"`. Errors returned by `check` itself
/// propagate without retry.
pub async fn retry_until<F, Fut>(
    description: &str,
    config: RetryConfig,
    mut check: F,
) -> ShopResult<RetryResult>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ShopResult<AssertionCheckResult>>,
{
    let start = Instant::now();
    let mut attempts = 0;
    loop {
        attempts += 1;
        let message = match check().await? {
            AssertionCheckResult::Pass => {
                return Ok(RetryResult {
                    attempts,
                    duration: start.elapsed(),
                })
            }
            AssertionCheckResult::Fail(message) => message,
        };

        let out_of_time = start.elapsed() >= config.timeout;
        let out_of_attempts = config.max_retries > 0 && attempts >= config.max_retries;
        if out_of_time || out_of_attempts {
            return Err(ShopError::timeout(
                format!("{description}: {message}"),
                config.timeout.as_millis() as u64,
            ));
        }
        tokio::time::sleep(config.poll_interval).await;
    }
}
