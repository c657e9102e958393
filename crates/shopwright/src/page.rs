//! The live document a test drives.

use crate::config::SuiteConfig;
use crate::driver::Driver;
use crate::locator::{Locator, SelectorChain};
use crate::result::ShopResult;
use crate::wait::{poll_until, LoadState, UrlPattern};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// One browser tab: a shared driver plus the suite configuration.
///
/// Cloning is cheap; every page object and component built for a test holds
/// a clone of the same `Page`.
#[derive(Debug, Clone)]
pub struct Page {
    id: Uuid,
    driver: Arc<dyn Driver>,
    config: Arc<SuiteConfig>,
}

impl Page {
    /// Wrap a driver
    #[must_use]
    pub fn new(driver: Arc<dyn Driver>, config: SuiteConfig) -> Self {
        Self::with_shared_config(driver, Arc::new(config))
    }

    /// Wrap a driver, sharing an existing configuration
    #[must_use]
    pub fn with_shared_config(driver: Arc<dyn Driver>, config: Arc<SuiteConfig>) -> Self {
        Self {
            id: Uuid::new_v4(),
            driver,
            config,
        }
    }

    /// Unique identifier of this tab
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// The engine behind this tab
    #[must_use]
    pub fn driver(&self) -> &dyn Driver {
        self.driver.as_ref()
    }

    /// Suite configuration
    #[must_use]
    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Elements matching a CSS selector
    #[must_use]
    pub fn locator(&self, selector: &str) -> Locator {
        Locator::new(self.clone(), SelectorChain::css(selector))
    }

    /// Elements with an ARIA role and optional accessible name
    #[must_use]
    pub fn get_by_role(&self, role: &str, name: Option<&str>) -> Locator {
        Locator::new(self.clone(), SelectorChain::role(role, name))
    }

    /// Elements with a `data-testid`
    #[must_use]
    pub fn get_by_test_id(&self, id: &str) -> Locator {
        Locator::new(
            self.clone(),
            SelectorChain::default().then(crate::locator::Selector::test_id(id)),
        )
    }

    /// Load `base_url + path` and wait for network idle
    pub async fn goto(&self, path: &str) -> ShopResult<()> {
        let url = self.config.url_for(path);
        info!(%url, tab = %self.id, "navigate");
        self.driver
            .goto(&url, LoadState::NetworkIdle, self.config.timeouts.navigation_timeout())
            .await
    }

    /// Wait for the current document to reach `state`
    pub async fn wait_for_load_state(&self, state: LoadState) -> ShopResult<()> {
        debug!(%state, tab = %self.id, "wait for load state");
        self.driver
            .wait_for_load_state(state, self.config.timeouts.navigation_timeout())
            .await
    }

    /// Wait until the URL matches `pattern`, then for the `load` event
    pub async fn wait_for_url(&self, pattern: &UrlPattern) -> ShopResult<()> {
        let driver = self.driver.as_ref();
        let waited_for = format!("URL should match {pattern}");
        let _ = poll_until(&waited_for, self.config.timeouts.navigation(), || async move {
            Ok(pattern.matches(&driver.current_url().await?))
        })
        .await?;
        self.wait_for_load_state(LoadState::Load).await
    }

    /// Current URL
    pub async fn url(&self) -> ShopResult<String> {
        self.driver.current_url().await
    }

    /// Document title
    pub async fn title(&self) -> ShopResult<String> {
        self.driver.title().await
    }

    /// Press a key on the page keyboard
    pub async fn press_key(&self, key: &str) -> ShopResult<()> {
        debug!(key, tab = %self.id, "press");
        self.driver.press_key(key).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::Timeouts;
    use crate::mock::MockDriver;

    fn page_with(mock: &Arc<MockDriver>, navigation_ms: u64) -> Page {
        let timeouts = Timeouts {
            navigation_ms,
            poll_ms: 5,
            ..Timeouts::default()
        };
        let config = SuiteConfig::new()
            .with_base_url("https://shop.test")
            .with_timeouts(timeouts);
        Page::new(mock.clone(), config)
    }

    #[tokio::test]
    async fn test_goto_joins_base_url() {
        let mock = Arc::new(MockDriver::new());
        let page = page_with(&mock, 100);
        page.goto("/cart").await.unwrap();
        assert_eq!(page.url().await.unwrap(), "https://shop.test/cart");
        assert!(mock.was_called("goto:https://shop.test/cart"));
    }

    #[tokio::test]
    async fn test_wait_for_url_matches_glob() {
        let mock = Arc::new(MockDriver::new());
        mock.set_url("https://shop.test/login?returnUrl=%2Fcart");
        let page = page_with(&mock, 100);
        page.wait_for_url(&UrlPattern::glob("**/login**")).await.unwrap();
        assert!(mock.was_called("wait_for_load_state:load"));
    }

    #[tokio::test]
    async fn test_wait_for_url_times_out() {
        let mock = Arc::new(MockDriver::new());
        mock.set_url("https://shop.test/cart");
        let page = page_with(&mock, 30);
        let err = page
            .wait_for_url(&UrlPattern::glob("**/login**"))
            .await
            .unwrap_err();
        assert!(err.is_timeout());
        assert!(err.to_string().contains("**/login**"));
    }

    #[test]
    fn test_clones_share_identity() {
        let mock = Arc::new(MockDriver::new());
        let page = page_with(&mock, 100);
        assert_eq!(page.clone().id(), page.id());
        assert_ne!(page_with(&mock, 100).id(), page.id());
    }

    #[test]
    fn test_test_id_locator() {
        let mock = Arc::new(MockDriver::new());
        let page = page_with(&mock, 100);
        assert_eq!(
            page.get_by_test_id("buy").selector(),
            "[data-testid=\"buy\"]"
        );
    }
}
