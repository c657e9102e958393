//! Wait mechanisms.
//!
//! Async polling primitives shared by locators, expectations, the loader and
//! page navigation barriers.
//!
//! - **Load states**: `load`, `DOMContentLoaded` and network idle
//! - **URL patterns**: glob matching for navigation barriers (`**/login**`)
//! - **Polling**: [`poll_until`] re-evaluates an async condition until it
//!   holds or the bound elapses

use crate::result::{ShopError, ShopResult};
use regex::Regex;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::debug;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for expectations (5 seconds)
pub const DEFAULT_EXPECT_TIMEOUT_MS: u64 = 5_000;

/// Default polling interval (100ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Default navigation timeout (30 seconds)
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 30_000;

/// Network idle threshold (500ms without requests)
pub const NETWORK_IDLE_THRESHOLD_MS: u64 = 500;

// =============================================================================
// LOAD STATE
// =============================================================================

/// Page load states
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LoadState {
    /// Wait for the `load` event to fire
    #[default]
    Load,
    /// Wait for `DOMContentLoaded` event
    DomContentLoaded,
    /// Wait for network to be idle (no requests for 500ms)
    NetworkIdle,
}

impl LoadState {
    /// Get the JavaScript event name for this load state
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::DomContentLoaded => "DOMContentLoaded",
            Self::NetworkIdle => "networkidle",
        }
    }
}

impl std::fmt::Display for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.event_name())
    }
}

// =============================================================================
// URL PATTERN
// =============================================================================

/// URL pattern used by navigation barriers
#[derive(Debug, Clone)]
pub enum UrlPattern {
    /// Exact match
    Exact(String),
    /// Prefix match
    Prefix(String),
    /// Contains substring
    Contains(String),
    /// Regex match
    Regex(Regex),
    /// Glob pattern, `*` and `**` match any run of characters
    Glob(String),
    /// Match any URL
    Any,
}

impl UrlPattern {
    /// Glob pattern such as `**/login**`
    #[must_use]
    pub fn glob(pattern: impl Into<String>) -> Self {
        Self::Glob(pattern.into())
    }

    /// Compile a regex pattern
    pub fn regex(pattern: &str) -> ShopResult<Self> {
        Regex::new(pattern)
            .map(Self::Regex)
            .map_err(|e| ShopError::config(format!("invalid URL regex {pattern}: {e}")))
    }

    /// Check if a URL matches this pattern
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        match self {
            Self::Exact(s) => url == s,
            Self::Prefix(s) => url.starts_with(s.as_str()),
            Self::Contains(s) => url.contains(s.as_str()),
            Self::Regex(re) => re.is_match(url),
            Self::Glob(pattern) => glob_matches(pattern, url),
            Self::Any => true,
        }
    }
}

impl std::fmt::Display for UrlPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact(s) | Self::Prefix(s) | Self::Contains(s) | Self::Glob(s) => {
                write!(f, "{s}")
            }
            Self::Regex(re) => write!(f, "/{}/", re.as_str()),
            Self::Any => write!(f, "*"),
        }
    }
}

fn glob_matches(pattern: &str, url: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();
    let (first, rest) = match parts.split_first() {
        Some((first, rest)) if !rest.is_empty() => (*first, rest),
        _ => return pattern == url,
    };
    let Some(tail) = url.strip_prefix(first) else {
        return false;
    };
    let Some((last, middle)) = rest.split_last() else {
        return false;
    };
    let mut remaining = tail;
    for part in middle.iter().filter(|p| !p.is_empty()) {
        match remaining.find(part) {
            Some(found) => remaining = &remaining[found + part.len()..],
            None => return false,
        }
    }
    // The final literal anchors at the end, not at its first occurrence
    remaining.ends_with(last)
}

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Bound and cadence of a polling wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_EXPECT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// =============================================================================
// WAIT RESULT
// =============================================================================

/// Result of a successful wait
#[derive(Debug, Clone)]
pub struct WaitResult {
    /// Time spent waiting
    pub elapsed: Duration,
    /// Number of times the condition was evaluated
    pub attempts: u32,
    /// Description of what was waited for
    pub waited_for: String,
}

// =============================================================================
// POLLING
// =============================================================================

/// Evaluate `check` until it returns `true` or `options.timeout_ms` elapses.
///
/// The condition is always evaluated at least once. Errors from `check`
/// propagate immediately; only the bound expiring produces
/// [`ShopError::Timeout`] carrying `waited_for`.
pub async fn poll_until<F, Fut>(
    waited_for: &str,
    options: WaitOptions,
    mut check: F,
) -> ShopResult<WaitResult>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ShopResult<bool>>,
{
    let start = Instant::now();
    let mut attempts = 0;
    loop {
        attempts += 1;
        if check().await? {
            debug!(waited_for, attempts, elapsed_ms = start.elapsed().as_millis() as u64, "wait satisfied");
            return Ok(WaitResult {
                elapsed: start.elapsed(),
                attempts,
                waited_for: waited_for.to_string(),
            });
        }
        if start.elapsed() >= options.timeout() {
            debug!(waited_for, attempts, "wait timed out");
            return Err(ShopError::timeout(waited_for, options.timeout_ms));
        }
        tokio::time::sleep(options.poll_interval()).await;
    }
}
