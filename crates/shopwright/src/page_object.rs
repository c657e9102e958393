//! Page Object Model support.
//!
//! A page object wraps a [`PageHandle`]: the tab plus the root-relative URL
//! the page lives at. Implementors get navigation and ready-state waiting
//! for free through the [`PageObject`] trait.
//!
//! ```ignore
//! #[derive(Debug, Clone)]
//! struct AccountPage {
//!     handle: PageHandle,
//!     orders: Locator,
//! }
//!
//! impl PageObject for AccountPage {
//!     fn handle(&self) -> &PageHandle {
//!         &self.handle
//!     }
//! }
//!
//! impl AccountPage {
//!     pub fn new(page: &Page) -> Self {
//!         let handle = PageHandle::new(page, "/customer/orders");
//!         let orders = handle.locator(".order-list");
//!         Self { handle, orders }
//!     }
//! }
//! ```

use crate::locator::Locator;
use crate::page::Page;
use crate::result::ShopResult;
use crate::wait::{LoadState, UrlPattern};
use async_trait::async_trait;

/// A navigable document at a root-relative URL
#[derive(Debug, Clone)]
pub struct PageHandle {
    page: Page,
    url: String,
}

impl PageHandle {
    /// Bind `url` (relative to the configured base URL) to a tab
    #[must_use]
    pub fn new(page: &Page, url: impl Into<String>) -> Self {
        Self {
            page: page.clone(),
            url: url.into(),
        }
    }

    /// The tab
    #[must_use]
    pub const fn page(&self) -> &Page {
        &self.page
    }

    /// Root-relative URL
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Load the page and wait until the network is idle
    pub async fn navigate(&self) -> ShopResult<()> {
        self.page.goto(&self.url).await
    }

    /// Wait until the network is idle without starting a navigation
    pub async fn wait_for_navigation(&self) -> ShopResult<()> {
        self.page.wait_for_load_state(LoadState::NetworkIdle).await
    }

    /// Navigation barrier: wait until the URL matches `pattern`
    pub async fn wait_for_url(&self, pattern: &UrlPattern) -> ShopResult<()> {
        self.page.wait_for_url(pattern).await
    }

    /// Elements matching a CSS selector anywhere in the document
    #[must_use]
    pub fn locator(&self, selector: &str) -> Locator {
        self.page.locator(selector)
    }

    /// Elements with a `data-testid`
    #[must_use]
    pub fn test_id(&self, id: &str) -> Locator {
        self.page.get_by_test_id(id)
    }

    /// Elements with an ARIA role and optional accessible name
    #[must_use]
    pub fn get_by_role(&self, role: &str, name: Option<&str>) -> Locator {
        self.page.get_by_role(role, name)
    }

    /// Document title
    pub async fn title(&self) -> ShopResult<String> {
        self.page.title().await
    }
}

/// Trait for page objects representing one page of the storefront
#[async_trait]
pub trait PageObject: Send + Sync {
    /// The underlying handle
    fn handle(&self) -> &PageHandle;

    /// Get the page name for logging/debugging
    fn page_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Load the page
    async fn navigate(&self) -> ShopResult<()> {
        tracing::info!(page = self.page_name(), url = self.handle().url(), "open page");
        self.handle().navigate().await
    }

    /// Wait for in-flight navigation to settle
    async fn wait_for_navigation(&self) -> ShopResult<()> {
        self.handle().wait_for_navigation().await
    }

    /// Whether the tab's current URL is this page's URL
    async fn is_current(&self) -> ShopResult<bool> {
        let handle = self.handle();
        let expected = handle.page().config().url_for(handle.url());
        let current = handle.page().url().await?;
        let current = current.split(['?', '#']).next().unwrap_or_default();
        Ok(current.trim_end_matches('/') == expected.trim_end_matches('/'))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::SuiteConfig;
    use crate::mock::MockDriver;
    use std::sync::Arc;

    #[derive(Debug)]
    struct OrdersPage {
        handle: PageHandle,
    }

    impl PageObject for OrdersPage {
        fn handle(&self) -> &PageHandle {
            &self.handle
        }

        fn page_name(&self) -> &str {
            "OrdersPage"
        }
    }

    fn setup() -> (Arc<MockDriver>, OrdersPage) {
        let mock = Arc::new(MockDriver::new());
        let page = Page::new(
            mock.clone(),
            SuiteConfig::new().with_base_url("https://shop.test"),
        );
        let orders = OrdersPage {
            handle: PageHandle::new(&page, "/customer/orders"),
        };
        (mock, orders)
    }

    mod page_handle_tests {
        use super::*;

        #[test]
        fn test_locators_are_document_scoped() {
            let (_mock, orders) = setup();
            assert_eq!(orders.handle().locator(".order").selector(), ".order");
            assert_eq!(
                orders.handle().get_by_role("link", Some("Details")).selector(),
                "role=link[name=\"Details\"]"
            );
        }

        #[tokio::test]
        async fn test_wait_for_navigation_waits_for_network_idle() {
            let (mock, orders) = setup();
            orders.wait_for_navigation().await.unwrap();
            assert!(mock.was_called("wait_for_load_state:networkidle"));
            assert!(!mock.was_called("goto"));
        }
    }

    mod page_object_trait_tests {
        use super::*;

        #[tokio::test]
        async fn test_navigate_and_is_current() {
            let (mock, orders) = setup();
            assert!(!orders.is_current().await.unwrap());
            orders.navigate().await.unwrap();
            assert!(mock.was_called("goto:https://shop.test/customer/orders"));
            assert!(orders.is_current().await.unwrap());
        }

        #[tokio::test]
        async fn test_is_current_ignores_query() {
            let (mock, orders) = setup();
            mock.set_url("https://shop.test/customer/orders?page=2");
            assert!(orders.is_current().await.unwrap());
        }

        #[test]
        fn test_page_name() {
            let (_mock, orders) = setup();
            assert_eq!(orders.page_name(), "OrdersPage");
        }
    }
}
