//! Site header: menubar, shopbar and main navigation.

use crate::assertion::expect;
use crate::element::{Component, ElementHandle};
use crate::locator::{Locator, SelectorChain};
use crate::page::Page;
use crate::price::parse_count;
use crate::result::ShopResult;
use std::fmt;
use tracing::info;

/// Root of the site header
pub const MENU_SELECTOR: &str = "#header";

/// Top-level categories in the main navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MainMenuItem {
    /// Books
    Books,
    /// Furniture
    Furniture,
    /// Sports
    Sports,
    /// Gaming
    Gaming,
    /// Watches
    Watches,
    /// Gift Cards
    GiftCards,
}

impl MainMenuItem {
    /// Link text
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Books => "Books",
            Self::Furniture => "Furniture",
            Self::Sports => "Sports",
            Self::Gaming => "Gaming",
            Self::Watches => "Watches",
            Self::GiftCards => "Gift Cards",
        }
    }
}

impl fmt::Display for MainMenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The dropdown owned by one main navigation entry
#[derive(Debug, Clone)]
pub struct Dropdown {
    element: ElementHandle,
}

impl Dropdown {
    /// Link in this dropdown whose accessible name contains `text`
    #[must_use]
    pub fn link(&self, text: &str) -> Locator {
        self.element.root().get_by_role("link", Some(text))
    }

    /// Click a link in this dropdown
    pub async fn click(&self, text: &str) -> ShopResult<()> {
        self.link(text).click().await
    }
}

impl Component for Dropdown {
    fn element(&self) -> &ElementHandle {
        &self.element
    }
}

/// The site header
#[derive(Debug, Clone)]
pub struct Menu {
    element: ElementHandle,
    /// Currency selector
    pub currency_selector: Locator,
    /// Currency toggle
    pub currency_button: Locator,
    /// Currency list
    pub currency_dropdown: Locator,
    /// "Contact us" link
    pub contact_us_link: Locator,
    /// Help & service dropdown
    pub service_dropdown: Locator,
    /// Help & service toggle
    pub service_button: Locator,
    /// "Log in" link
    pub login_link: Locator,
    /// Shopbar menu button
    pub menu_button: Locator,
    /// Shopbar account button
    pub user_button: Locator,
    /// Shopbar compare button
    pub compare_button: Locator,
    /// Compare badge
    pub compare_items_count: Locator,
    /// Shopbar wishlist button
    pub wishlist_button: Locator,
    /// Wishlist badge
    pub wishlist_items_count: Locator,
    /// Shopbar cart button
    pub cart_button: Locator,
    /// Cart badge
    pub cart_items_count: Locator,
    /// Main navigation bar
    pub menu_main: Locator,
}

impl Menu {
    /// Header rooted at `#header`
    #[must_use]
    pub fn new(page: &Page) -> Self {
        Self::with_root(page, MENU_SELECTOR)
    }

    /// Header rooted at a custom selector
    #[must_use]
    pub fn with_root(page: &Page, selector: &str) -> Self {
        let element = ElementHandle::from_selector(page, selector);
        let currency_selector = element.locator(".currency-selector");
        let service_dropdown =
            element.locator(".cms-menu-dropdown[data-menu-name=\"helpandservice\"]");
        Self {
            currency_button: currency_selector.locator("a.menubar-link"),
            currency_dropdown: currency_selector.locator(".dropdown-menu"),
            currency_selector,
            contact_us_link: element.root().get_by_role("link", Some("Contact us")),
            service_button: service_dropdown.locator("a.menubar-link"),
            service_dropdown,
            login_link: element
                .locator("#menubar-my-account")
                .get_by_role("link", Some("Log in")),
            menu_button: element.locator("#shopbar-menu a.shopbar-button"),
            user_button: element.locator("#shopbar-user a.shopbar-button"),
            compare_button: element.locator("#shopbar-compare a.shopbar-button"),
            compare_items_count: element
                .locator("#shopbar-compare [data-bind-to=\"CompareItemsCount\"]"),
            wishlist_button: element.locator("#shopbar-wishlist a.shopbar-button"),
            wishlist_items_count: element
                .locator("#shopbar-wishlist [data-bind-to=\"WishlistItemsCount\"]"),
            cart_button: element.locator("#shopbar-cart a.shopbar-button"),
            cart_items_count: element.locator("#shopbar-cart [data-bind-to=\"CartItemsCount\"]"),
            menu_main: element.locator("#menu-main"),
            element,
        }
    }

    /// Currency entry by its title, e.g. "Euro"
    #[must_use]
    pub fn currency_option(&self, currency: &str) -> Locator {
        self.currency_dropdown
            .locator(&format!("a[title=\"{}\"]", currency.replace('"', "\\\"")))
    }

    /// Header link by its `href`, e.g. "/aboutus"
    #[must_use]
    pub fn link_to(&self, href: &str) -> Locator {
        self.element.locator(&format!("a[href=\"{href}\"]"))
    }

    /// Top-level navigation link
    #[must_use]
    pub fn main_nav_item(&self, item: MainMenuItem) -> Locator {
        self.menu_main.get_by_role("link", Some(item.label()))
    }

    /// The `li.nav-item` that owns the link for `item`
    #[must_use]
    pub fn nav_entry(&self, item: MainMenuItem) -> Locator {
        self.menu_main
            .locator("li.nav-item")
            .filter_has(SelectorChain::role("link", Some(item.label())))
    }

    /// The dropdown belonging to `item`, without opening it
    #[must_use]
    pub fn dropdown(&self, item: MainMenuItem) -> Dropdown {
        Dropdown {
            element: ElementHandle::from_locator(self.nav_entry(item).locator(".dropdown-menu")),
        }
    }

    /// Hover `item` and wait for its own dropdown to appear
    pub async fn open_dropdown(&self, item: MainMenuItem) -> ShopResult<Dropdown> {
        self.main_nav_item(item).hover().await?;
        let dropdown = self.dropdown(item);
        expect(dropdown.root())
            .with_message(format!("{item} dropdown menu should appear"))
            .to_be_visible()
            .await?;
        Ok(dropdown)
    }

    /// Open `item`'s dropdown and click the entry named `text`
    pub async fn click_submenu_item(&self, item: MainMenuItem, text: &str) -> ShopResult<()> {
        info!(menu = %item, entry = text, "open submenu entry");
        self.open_dropdown(item).await?.click(text).await
    }

    /// Click a top-level category
    pub async fn navigate_to(&self, item: MainMenuItem) -> ShopResult<()> {
        info!(menu = %item, "open category");
        self.main_nav_item(item).click().await
    }

    /// Pick a currency from the currency selector
    pub async fn select_currency(&self, currency: &str) -> ShopResult<()> {
        self.currency_button.click().await?;
        self.currency_option(currency).click().await
    }

    /// Open the login page
    pub async fn open_login(&self) -> ShopResult<()> {
        self.login_link.click().await
    }

    /// Open the offcanvas cart
    pub async fn open_cart(&self) -> ShopResult<()> {
        self.cart_button.click().await
    }

    /// Cart badge value
    pub async fn cart_count(&self) -> ShopResult<u32> {
        parse_count("cart badge", &self.cart_items_count.text_content().await?)
    }

    /// Wishlist badge value
    pub async fn wishlist_count(&self) -> ShopResult<u32> {
        parse_count("wishlist badge", &self.wishlist_items_count.text_content().await?)
    }

    /// Compare badge value
    pub async fn compare_count(&self) -> ShopResult<u32> {
        parse_count("compare badge", &self.compare_items_count.text_content().await?)
    }
}

impl Component for Menu {
    fn element(&self) -> &ElementHandle {
        &self.element
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::{SuiteConfig, Timeouts};
    use crate::mock::{MockDriver, MockElement};
    use std::sync::Arc;

    fn setup() -> (Arc<MockDriver>, Menu) {
        let mock = Arc::new(MockDriver::new());
        let timeouts = Timeouts {
            expect_ms: 40,
            poll_ms: 2,
            ..Timeouts::default()
        };
        let page = Page::new(mock.clone(), SuiteConfig::new().with_timeouts(timeouts));
        (mock, Menu::new(&page))
    }

    mod dropdowns {
        use super::*;

        #[test]
        fn test_dropdown_is_scoped_to_its_entry() {
            let (_mock, menu) = setup();
            assert_eq!(
                menu.dropdown(MainMenuItem::Sports).root().selector(),
                "#header >> #menu-main >> li.nav-item >> has=(role=link[name=\"Sports\"]) >> .dropdown-menu"
            );
        }

        #[tokio::test]
        async fn test_other_open_dropdown_does_not_satisfy_wait() {
            let (mock, menu) = setup();
            mock.set(menu.main_nav_item(MainMenuItem::Sports), MockElement::new());
            mock.set(menu.dropdown(MainMenuItem::Books).root(), MockElement::new());
            let err = menu.open_dropdown(MainMenuItem::Sports).await.unwrap_err();
            assert!(err.to_string().starts_with("Sports dropdown menu should appear"));
        }

        #[tokio::test]
        async fn test_click_submenu_item() {
            let (mock, menu) = setup();
            let trigger = menu.main_nav_item(MainMenuItem::Sports);
            let dropdown = menu.dropdown(MainMenuItem::Sports);
            mock.set(&trigger, MockElement::new());
            mock.set(dropdown.root(), MockElement::new().hidden());
            let key = dropdown.root().selector();
            mock.on_action(&trigger, move |dom| {
                dom.set(&key, MockElement::new());
            });
            let entry = dropdown.link("Golf");
            mock.set(&entry, MockElement::new());
            menu.click_submenu_item(MainMenuItem::Sports, "Golf")
                .await
                .unwrap();
            assert!(mock.was_performed(&trigger, "hover"));
            assert!(mock.was_performed(&entry, "click"));
        }
    }

    mod shopbar {
        use super::*;

        #[tokio::test]
        async fn test_badges() {
            let (mock, menu) = setup();
            mock.set(&menu.cart_items_count, MockElement::with_text("3"));
            mock.set(&menu.wishlist_items_count, MockElement::with_text("0"));
            assert_eq!(menu.cart_count().await.unwrap(), 3);
            assert_eq!(menu.wishlist_count().await.unwrap(), 0);
            assert!(menu.compare_count().await.is_err());
        }

        #[test]
        fn test_link_helpers() {
            let (_mock, menu) = setup();
            assert_eq!(menu.link_to("/aboutus").selector(), "#header >> a[href=\"/aboutus\"]");
            assert_eq!(
                menu.currency_option("Euro").selector(),
                "#header >> .currency-selector >> .dropdown-menu >> a[title=\"Euro\"]"
            );
            assert_eq!(
                menu.login_link.selector(),
                "#header >> #menubar-my-account >> role=link[name=\"Log in\"]"
            );
        }
    }
}
