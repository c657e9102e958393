//! Per-test fixtures.
//!
//! A [`Fixtures`] value bundles every page object and shared component for
//! one tab. Build one per test from that test's [`Page`]; nothing is
//! registered globally, so independent tests never share state through
//! their fixtures.
//!
//! ```ignore
//! let fx = Fixtures::new(&page);
//! fx.landing_page.navigate().await?;
//! fx.menu.navigate_to(MainMenuItem::Sports).await?;
//! fx.filter.select_price_range(PriceRange::UpTo50).await?;
//! ```

use crate::components::{Cart, Filter, Menu, Searchbar};
use crate::loader::Loader;
use crate::page::Page;
use crate::page_object::PageObject;
use crate::pages::{CartPage, LandingPage, LoginPage, SportsPage};
use crate::result::ShopResult;
use tracing::info;

/// Page objects and components for one tab
#[derive(Debug, Clone)]
pub struct Fixtures {
    page: Page,
    /// `/`
    pub landing_page: LandingPage,
    /// `/sports`
    pub sports_page: SportsPage,
    /// `/cart`
    pub cart_page: CartPage,
    /// `/login`
    pub login_page: LoginPage,
    /// Site header
    pub menu: Menu,
    /// Shopbar search
    pub searchbar: Searchbar,
    /// Faceted search sidebar
    pub filter: Filter,
    /// Offcanvas cart
    pub cart: Cart,
    /// Busy indicator
    pub loader: Loader,
}

impl Fixtures {
    /// Build every fixture against `page`
    #[must_use]
    pub fn new(page: &Page) -> Self {
        Self {
            page: page.clone(),
            landing_page: LandingPage::new(page),
            sports_page: SportsPage::new(page),
            cart_page: CartPage::new(page),
            login_page: LoginPage::new(page),
            menu: Menu::new(page),
            searchbar: Searchbar::new(page),
            filter: Filter::new(page),
            cart: Cart::new(page),
            loader: Loader::new(page),
        }
    }

    /// The tab the fixtures drive
    #[must_use]
    pub const fn page(&self) -> &Page {
        &self.page
    }

    /// Empty the server-side cart, then open the sports listing.
    ///
    /// The cart lives in the server session, so scenarios that touch it
    /// start from here. Returns how many rows were removed.
    pub async fn start_with_empty_cart(&self) -> ShopResult<usize> {
        self.cart_page.navigate().await?;
        let removed = if self.cart_page.is_empty().await? {
            0
        } else {
            self.cart_page.clear_all_items().await?
        };
        info!(removed, "starting from an empty cart");
        self.sports_page.navigate().await?;
        Ok(removed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::{SuiteConfig, Timeouts};
    use crate::mock::{MockDriver, MockElement};
    use std::sync::Arc;

    fn setup() -> (Arc<MockDriver>, Fixtures) {
        let mock = Arc::new(MockDriver::new());
        let timeouts = Timeouts {
            expect_ms: 40,
            poll_ms: 2,
            loader_appear_ms: 5,
            loader_settle_ms: 50,
            ..Timeouts::default()
        };
        let config = SuiteConfig::new()
            .with_base_url("https://shop.test")
            .with_timeouts(timeouts);
        let page = Page::new(mock.clone(), config);
        (mock, Fixtures::new(&page))
    }

    #[test]
    fn test_fixtures_share_one_tab() {
        let (_mock, fx) = setup();
        let id = fx.page().id();
        assert_eq!(fx.cart_page.handle().page().id(), id);
        assert_eq!(fx.login_page.handle().page().id(), id);
    }

    #[test]
    fn test_separate_pages_get_separate_fixtures() {
        let (_mock, a) = setup();
        let (_mock, b) = setup();
        assert_ne!(a.page().id(), b.page().id());
    }

    #[tokio::test]
    async fn test_start_with_empty_cart_skips_clear() {
        let (mock, fx) = setup();
        assert_eq!(fx.start_with_empty_cart().await.unwrap(), 0);
        let history = mock.call_history();
        assert_eq!(history[0], "goto:https://shop.test/cart");
        assert!(history.iter().any(|c| c == "goto:https://shop.test/sports"));
        assert!(!mock.was_called("click"));
    }

    #[tokio::test]
    async fn test_start_with_empty_cart_clears_rows() {
        let (mock, fx) = setup();
        let rows = fx.cart_page.cart_rows.selector();
        let remove = fx.cart_page.row(0).remove_button;
        mock.set(&rows, MockElement::new().with_count(2));
        mock.set(&remove, MockElement::new());
        mock.on_action(&remove, move |dom| {
            let left = dom.get(&rows).map_or(0, |e| e.count.saturating_sub(1));
            dom.set(&rows, MockElement::new().with_count(left));
        });
        assert_eq!(fx.start_with_empty_cart().await.unwrap(), 2);
    }
}
