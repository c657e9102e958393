//! Polling expectations on locators.
//!
//! `expect(&locator)` re-reads the document until the expectation holds or
//! the configured bound elapses:
//!
//! ```ignore
//! expect(cart.items()).to_have_count(1).await?;
//! expect(cart.subtotal()).to_have_text("$2.10 excl tax").await?;
//! expect(&loader).with_message("Loader should disappear").to_be_hidden().await?;
//! ```

use super::retry::{retry_until, AssertionCheckResult, RetryConfig};
use crate::locator::Locator;
use crate::result::{ShopError, ShopResult};
use regex::Regex;
use std::time::Duration;

/// Start an expectation on `locator`, bounded by the suite's `expect_ms`
#[must_use]
pub fn expect(locator: &Locator) -> Expect {
    Expect {
        config: RetryConfig::from(&locator.page().config().timeouts),
        locator: locator.clone(),
        message: None,
    }
}

/// Pending expectation on a locator
#[derive(Debug, Clone)]
pub struct Expect {
    locator: Locator,
    config: RetryConfig,
    message: Option<String>,
}

impl Expect {
    /// Replace the failure description
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Override the bound
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.config.timeout = Duration::from_millis(timeout_ms);
        self
    }

    fn description(&self, default: String) -> String {
        self.message.clone().unwrap_or(default)
    }

    async fn poll_bool<F, Fut>(&self, default: String, check: F) -> ShopResult<()>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = ShopResult<AssertionCheckResult>>,
    {
        let description = self.description(default);
        let _ = retry_until(&description, self.config, check).await?;
        Ok(())
    }

    /// The first match is visible
    pub async fn to_be_visible(&self) -> ShopResult<()> {
        let loc = &self.locator;
        self.poll_bool(format!("expected {loc} to be visible"), || async move {
            Ok(AssertionCheckResult::from_bool(loc.is_visible().await?, || {
                "not visible".to_string()
            }))
        })
        .await
    }

    /// Nothing visible matches
    pub async fn to_be_hidden(&self) -> ShopResult<()> {
        let loc = &self.locator;
        self.poll_bool(format!("expected {loc} to be hidden"), || async move {
            Ok(AssertionCheckResult::from_bool(!loc.is_visible().await?, || {
                "still visible".to_string()
            }))
        })
        .await
    }

    /// The first match is checked
    pub async fn to_be_checked(&self) -> ShopResult<()> {
        self.checked_state(true).await
    }

    /// The first match is not checked
    pub async fn not_to_be_checked(&self) -> ShopResult<()> {
        self.checked_state(false).await
    }

    async fn checked_state(&self, expected: bool) -> ShopResult<()> {
        let loc = &self.locator;
        let word = if expected { "checked" } else { "unchecked" };
        self.poll_bool(format!("expected {loc} to be {word}"), || async move {
            let driver = loc.page().driver();
            if driver.count(loc.chain()).await? == 0 {
                return Ok(AssertionCheckResult::Fail("no element".to_string()));
            }
            let actual = driver.is_checked(loc.chain()).await?;
            Ok(AssertionCheckResult::from_bool(actual == expected, || {
                format!("checked = {actual}")
            }))
        })
        .await
    }

    /// Exactly `expected` elements match
    pub async fn to_have_count(&self, expected: usize) -> ShopResult<()> {
        let loc = &self.locator;
        self.poll_bool(format!("expected {loc} to have count {expected}"), || async move {
            let actual = loc.count().await?;
            Ok(AssertionCheckResult::from_bool(actual == expected, || {
                format!("count = {actual}")
            }))
        })
        .await
    }

    /// The first match's trimmed text equals `expected`
    pub async fn to_have_text(&self, expected: &str) -> ShopResult<()> {
        self.text_matches(format!("expected text {expected:?}"), |text| text == expected)
            .await
    }

    /// The first match's text contains `expected`
    pub async fn to_contain_text(&self, expected: &str) -> ShopResult<()> {
        self.text_matches(format!("expected text to contain {expected:?}"), |text| {
            text.contains(expected)
        })
        .await
    }

    async fn text_matches<P>(&self, what: String, predicate: P) -> ShopResult<()>
    where
        P: Fn(&str) -> bool,
    {
        let loc = &self.locator;
        let predicate = &predicate;
        self.poll_bool(format!("{what} in {loc}"), || async move {
            let Some(text) = loc.page().driver().text_content(loc.chain()).await? else {
                return Ok(AssertionCheckResult::Fail("no element".to_string()));
            };
            let text = text.trim().to_string();
            Ok(AssertionCheckResult::from_bool(predicate(&text), || {
                format!("text = {text:?}")
            }))
        })
        .await
    }

    /// The first input's value equals `expected`
    pub async fn to_have_value(&self, expected: &str) -> ShopResult<()> {
        let loc = &self.locator;
        self.poll_bool(format!("expected {loc} to have value {expected:?}"), || async move {
            let driver = loc.page().driver();
            if driver.count(loc.chain()).await? == 0 {
                return Ok(AssertionCheckResult::Fail("no element".to_string()));
            }
            let actual = driver.input_value(loc.chain()).await?;
            Ok(AssertionCheckResult::from_bool(actual == expected, || {
                format!("value = {actual:?}")
            }))
        })
        .await
    }

    /// The first match's `class` attribute matches `pattern`
    pub async fn to_have_class(&self, pattern: &str) -> ShopResult<()> {
        self.class_matches(pattern, true).await
    }

    /// The first match's `class` attribute does not match `pattern`
    pub async fn not_to_have_class(&self, pattern: &str) -> ShopResult<()> {
        self.class_matches(pattern, false).await
    }

    async fn class_matches(&self, pattern: &str, expected: bool) -> ShopResult<()> {
        let re = Regex::new(pattern)
            .map_err(|e| ShopError::assertion(format!("invalid class pattern {pattern}: {e}")))?;
        let re = &re;
        let loc = &self.locator;
        let verb = if expected { "to have" } else { "not to have" };
        self.poll_bool(format!("expected {loc} {verb} class /{pattern}/"), || async move {
            let driver = loc.page().driver();
            if driver.count(loc.chain()).await? == 0 {
                return Ok(AssertionCheckResult::Fail("no element".to_string()));
            }
            let class = driver.attribute(loc.chain(), "class").await?.unwrap_or_default();
            Ok(AssertionCheckResult::from_bool(re.is_match(&class) == expected, || {
                format!("class = {class:?}")
            }))
        })
        .await
    }
}
