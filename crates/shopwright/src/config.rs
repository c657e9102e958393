//! Suite configuration.
//!
//! One [`SuiteConfig`] is shared by every page object in a test. It is
//! plain serde data so it can be loaded from YAML, overridden from the
//! environment and printed back by the CLI.

use crate::result::{ShopError, ShopResult};
use crate::wait::WaitOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Storefront every relative page URL resolves against by default
pub const DEFAULT_BASE_URL: &str = "https://bearstore-testsite.smartbear.com";

/// Environment variable overriding `base_url`
pub const ENV_BASE_URL: &str = "SHOPWRIGHT_BASE_URL";

/// Environment variable overriding `headless`
pub const ENV_HEADLESS: &str = "SHOPWRIGHT_HEADLESS";

/// Browser viewport size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in CSS pixels
    pub width: u32,
    /// Height in CSS pixels
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Wait bounds, all in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Bound for polling expectations and actionability waits
    pub expect_ms: u64,
    /// Interval between polls
    pub poll_ms: u64,
    /// Bound for page loads and URL barriers
    pub navigation_ms: u64,
    /// Window in which the loader is given a chance to appear
    pub loader_appear_ms: u64,
    /// Bound for the loader to disappear
    pub loader_settle_ms: u64,
    /// Quiet period that counts as network idle
    pub network_idle_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            expect_ms: 5_000,
            poll_ms: 100,
            navigation_ms: 30_000,
            loader_appear_ms: 2_000,
            loader_settle_ms: 10_000,
            network_idle_ms: 500,
        }
    }
}

impl Timeouts {
    /// Options for expectation polling
    #[must_use]
    pub const fn expect(&self) -> WaitOptions {
        WaitOptions {
            timeout_ms: self.expect_ms,
            poll_interval_ms: self.poll_ms,
        }
    }

    /// Options for URL barriers
    #[must_use]
    pub const fn navigation(&self) -> WaitOptions {
        WaitOptions {
            timeout_ms: self.navigation_ms,
            poll_interval_ms: self.poll_ms,
        }
    }

    /// Navigation bound as a Duration
    #[must_use]
    pub const fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_ms)
    }
}

/// Configuration shared by a test's page objects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Storefront origin, joined with each page's relative URL
    pub base_url: String,
    /// Run the browser without a window
    pub headless: bool,
    /// Browser viewport
    pub viewport: Viewport,
    /// Wait bounds
    pub timeouts: Timeouts,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            headless: true,
            viewport: Viewport::default(),
            timeouts: Timeouts::default(),
        }
    }
}

impl SuiteConfig {
    /// Create a configuration with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the storefront origin
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set the viewport
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = Viewport { width, height };
        self
    }

    /// Replace all wait bounds
    #[must_use]
    pub const fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Parse YAML. Missing keys fall back to defaults.
    pub fn from_yaml_str(yaml: &str) -> ShopResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML file
    pub fn load(path: impl AsRef<Path>) -> ShopResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&text)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> ShopResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Apply `SHOPWRIGHT_BASE_URL` / `SHOPWRIGHT_HEADLESS` from the process environment
    pub fn with_env_overrides(self) -> ShopResult<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn with_overrides_from<F>(mut self, lookup: F) -> ShopResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(raw) = lookup(ENV_HEADLESS) {
            self.headless = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ShopError::config(format!(
                        "{ENV_HEADLESS} must be a boolean, got {raw:?}"
                    )))
                }
            };
        }
        self.validate()?;
        Ok(self)
    }

    /// Join a root-relative path onto `base_url`
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.is_empty() {
            return base.to_string();
        }
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }

    fn validate(&self) -> ShopResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ShopError::config(format!(
                "base_url must be an http(s) origin, got {:?}",
                self.base_url
            )));
        }
        if self.timeouts.poll_ms == 0 {
            return Err(ShopError::config("timeouts.poll_ms must be positive"));
        }
        Ok(())
    }
}
