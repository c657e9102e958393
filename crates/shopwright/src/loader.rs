//! Busy-indicator synchronization.
//!
//! Cart mutations are posted in the background and the storefront shows a
//! spinner while the request is in flight. Asserting on totals before the
//! spinner has come and gone reads stale values, so every mutating page
//! object operation ends with [`Loader::wait_for_load`].
//!
//! The wait has two stages:
//!
//! 1. give the spinner a short window to appear. Fast responses may finish
//!    before it is ever rendered, so running out of time here is fine.
//! 2. wait for it to be hidden. Running out of time here is an error.

use crate::element::{Component, ElementHandle};
use crate::page::Page;
use crate::result::ShopResult;
use crate::wait::{poll_until, WaitOptions};
use async_trait::async_trait;
use tracing::{debug, warn};

/// Selector of the storefront's active spinner
pub const LOADER_SELECTOR: &str = ".spinner.active";

/// Expectation text for stage 1
pub const LOADER_APPEAR_MESSAGE: &str = "Loader should appear";

/// Expectation text for stage 2
pub const LOADER_DISAPPEAR_MESSAGE: &str = "Loader should disappear";

/// The storefront's asynchronous busy indicator
#[derive(Debug, Clone)]
pub struct Loader {
    element: ElementHandle,
}

impl Loader {
    /// Loader rooted at `.spinner.active`
    #[must_use]
    pub fn new(page: &Page) -> Self {
        Self::with_selector(page, LOADER_SELECTOR)
    }

    /// Loader rooted at a custom selector
    #[must_use]
    pub fn with_selector(page: &Page, selector: &str) -> Self {
        Self {
            element: ElementHandle::from_selector(page, selector),
        }
    }

    fn options(&self, timeout_ms: u64) -> WaitOptions {
        WaitOptions::new()
            .with_timeout(timeout_ms)
            .with_poll_interval(self.element.page().config().timeouts.poll_ms)
    }

    /// Wait for a background request to finish.
    ///
    /// With `expect_appearance`, first allow the configured appear window
    /// for the spinner to show up; only a timeout of that stage is
    /// tolerated. Then wait up to `timeout_ms` for it to be hidden.
    pub async fn wait_for_settle(&self, expect_appearance: bool, timeout_ms: u64) -> ShopResult<()> {
        if expect_appearance {
            let appear_ms = self.element.page().config().timeouts.loader_appear_ms;
            match self.wait_for_visible(appear_ms).await {
                Ok(()) => debug!(selector = %self.root(), "loader appeared"),
                Err(err) if err.is_timeout() => {
                    debug!(selector = %self.root(), appear_ms, "loader never appeared");
                }
                Err(err) => return Err(err),
            }
        }
        self.wait_for_hidden(timeout_ms).await
    }

    /// Settle with appearance expected and the configured bound
    pub async fn wait_for_load(&self) -> ShopResult<()> {
        let settle_ms = self.element.page().config().timeouts.loader_settle_ms;
        self.wait_for_settle(true, settle_ms).await
    }

    /// Wait for the spinner to be visible
    pub async fn wait_for_visible(&self, timeout_ms: u64) -> ShopResult<()> {
        let _ = poll_until(LOADER_APPEAR_MESSAGE, self.options(timeout_ms), || self.visible_now()).await?;
        Ok(())
    }

    /// Wait for the spinner to be hidden
    pub async fn wait_for_hidden(&self, timeout_ms: u64) -> ShopResult<()> {
        let _ = poll_until(LOADER_DISAPPEAR_MESSAGE, self.options(timeout_ms), || async {
            Ok(!self.visible_now().await?)
        })
        .await?;
        Ok(())
    }

    async fn visible_now(&self) -> ShopResult<bool> {
        self.element.root().is_visible().await
    }

    /// Current visibility. Driver errors read as not visible.
    pub async fn is_visible(&self) -> bool {
        match self.visible_now().await {
            Ok(visible) => visible,
            Err(err) => {
                warn!(selector = %self.root(), error = %err, "loader visibility unknown");
                false
            }
        }
    }
}

#[async_trait]
impl Component for Loader {
    fn element(&self) -> &ElementHandle {
        &self.element
    }

    async fn is_visible(&self) -> ShopResult<bool> {
        Ok(Loader::is_visible(self).await)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::{SuiteConfig, Timeouts};
    use crate::mock::{MockDriver, MockElement};
    use crate::result::ShopError;
    use std::sync::Arc;

    fn setup() -> (Arc<MockDriver>, Loader) {
        let mock = Arc::new(MockDriver::new());
        let timeouts = Timeouts {
            poll_ms: 2,
            loader_appear_ms: 20,
            loader_settle_ms: 200,
            ..Timeouts::default()
        };
        let page = Page::new(mock.clone(), SuiteConfig::new().with_timeouts(timeouts));
        (mock, Loader::new(&page))
    }

    mod settle_tests {
        use super::*;

        #[tokio::test]
        async fn test_never_appearing_loader_is_tolerated() {
            let (mock, loader) = setup();
            loader.wait_for_load().await.unwrap();
            assert!(mock.call_history().is_empty());
        }

        #[tokio::test]
        async fn test_loader_that_spins_then_hides() {
            let (mock, loader) = setup();
            mock.set(LOADER_SELECTOR, MockElement::new().visible_for(3));
            loader.wait_for_load().await.unwrap();
            assert!(!loader.is_visible().await);
        }

        #[tokio::test]
        async fn test_stuck_loader_fails_with_disappear_message() {
            let (mock, loader) = setup();
            mock.set(LOADER_SELECTOR, MockElement::new());
            let err = loader.wait_for_settle(true, 20).await.unwrap_err();
            assert!(err.is_timeout());
            assert!(err.to_string().starts_with(LOADER_DISAPPEAR_MESSAGE));
        }

        #[tokio::test]
        async fn test_driver_error_in_appear_stage_propagates() {
            let (mock, loader) = setup();
            mock.fail(LOADER_SELECTOR, "target closed");
            let err = loader.wait_for_load().await.unwrap_err();
            assert!(matches!(err, ShopError::Driver { .. }));
        }

        #[tokio::test]
        async fn test_skip_appearance_goes_straight_to_hidden() {
            let (_mock, loader) = setup();
            loader.wait_for_settle(false, 10).await.unwrap();
        }
    }

    mod visibility_tests {
        use super::*;

        #[tokio::test]
        async fn test_wait_for_visible_times_out_with_appear_message() {
            let (_mock, loader) = setup();
            let err = loader.wait_for_visible(10).await.unwrap_err();
            assert!(err.to_string().starts_with(LOADER_APPEAR_MESSAGE));
        }

        #[tokio::test]
        async fn test_is_visible_swallows_driver_errors() {
            let (mock, loader) = setup();
            mock.fail(LOADER_SELECTOR, "target closed");
            assert!(!loader.is_visible().await);
        }

        #[test]
        fn test_default_selector() {
            let (_mock, loader) = setup();
            assert_eq!(loader.root().selector(), LOADER_SELECTOR);
        }
    }
}
