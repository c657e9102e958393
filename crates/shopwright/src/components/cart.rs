//! Offcanvas shopping cart panel.

use crate::assertion::expect;
use crate::element::{Component, ElementHandle};
use crate::locator::{Locator, SelectorChain};
use crate::loader::Loader;
use crate::page::Page;
use crate::price::{parse_count, parse_price};
use crate::result::{ShopError, ShopResult};
use crate::wait::UrlPattern;
use tracing::info;

/// Root of the offcanvas cart
pub const CART_SELECTOR: &str = "#offcanvas-cart";

/// The cart side panel that opens after adding a product
#[derive(Debug, Clone)]
pub struct Cart {
    element: ElementHandle,
    loader: Loader,
    /// Cart tab
    pub cart_tab: Locator,
    /// Wishlist tab
    pub wishlist_tab: Locator,
    /// Compare tab
    pub compare_tab: Locator,
    /// Cart items badge
    pub cart_count_badge: Locator,
    /// Wishlist items badge
    pub wishlist_count_badge: Locator,
    /// Compare items badge
    pub compare_count_badge: Locator,
    /// Item list container
    pub items_container: Locator,
    /// One match per cart row
    pub items: Locator,
    /// Subtotal caption
    pub subtotal_caption: Locator,
    /// Subtotal amount
    pub subtotal: Locator,
    /// Link to the cart page
    pub go_to_cart_button: Locator,
    /// Checkout button
    pub checkout_button: Locator,
    /// Confirmation after adding a product
    pub success_alert: Locator,
}

impl Cart {
    /// Cart rooted at `#offcanvas-cart`
    #[must_use]
    pub fn new(page: &Page) -> Self {
        Self::with_root(page, CART_SELECTOR)
    }

    /// Cart rooted at a custom selector
    #[must_use]
    pub fn with_root(page: &Page, selector: &str) -> Self {
        let element = ElementHandle::from_selector(page, selector);
        let items_container = element.locator(".offcanvas-cart-items");
        let items = items_container.locator(".offcanvas-cart-item");
        Self {
            loader: Loader::new(page),
            cart_tab: element.locator("#cart-tab"),
            wishlist_tab: element.locator("#wishlist-tab"),
            compare_tab: element.locator("#compare-tab"),
            cart_count_badge: element.locator("[data-bind-to=\"CartItemsCount\"]"),
            wishlist_count_badge: element.locator("[data-bind-to=\"WishlistItemsCount\"]"),
            compare_count_badge: element.locator("[data-bind-to=\"CompareItemsCount\"]"),
            subtotal_caption: element.locator(".sub-total-caption"),
            subtotal: element.locator(".sub-total.price"),
            go_to_cart_button: element.locator("a[href=\"/cart\"]"),
            checkout_button: element.locator(".btn-action").filter_has_text("Checkout"),
            success_alert: element.locator(".alert-success"),
            items_container,
            items,
            element,
        }
    }

    /// The nth cart row
    #[must_use]
    pub fn item(&self, index: usize) -> CartItem {
        CartItem::new(self.items.nth(index), self.loader.clone())
    }

    /// The cart row whose product name contains `name`
    #[must_use]
    pub fn item_by_name(&self, name: &str) -> CartItem {
        let row = self
            .items
            .filter_has(SelectorChain::css(CartItem::NAME_SELECTOR).with_text(name));
        CartItem::new(row, self.loader.clone())
    }

    /// Remove the row for `name` and wait for the cart to update
    pub async fn remove_item_by_name(&self, name: &str) -> ShopResult<()> {
        info!(product = name, "remove from cart");
        self.item_by_name(name).remove().await
    }

    /// Number of rows
    pub async fn item_count(&self) -> ShopResult<usize> {
        self.items.count().await
    }

    /// Whether the cart has no rows
    pub async fn is_empty(&self) -> ShopResult<bool> {
        Ok(self.item_count().await? == 0)
    }

    /// Value of the cart badge
    pub async fn badge_count(&self) -> ShopResult<u32> {
        let text = self.cart_count_badge.text_content().await?;
        parse_count("cart badge", &text)
    }

    /// Trimmed subtotal text, e.g. `"$2.10 excl tax"`
    pub async fn subtotal_text(&self) -> ShopResult<String> {
        let text = self.subtotal.text_content().await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(ShopError::NotFound {
                selector: self.subtotal.selector(),
            });
        }
        Ok(text.to_string())
    }

    /// Subtotal as a number
    pub async fn subtotal_value(&self) -> ShopResult<f64> {
        parse_price("subtotal", &self.subtotal_text().await?)
    }

    /// Subtotal text contains `expected`
    pub async fn assert_subtotal(&self, expected: &str) -> ShopResult<()> {
        let actual = self.subtotal_text().await?;
        if actual.contains(expected) {
            Ok(())
        } else {
            Err(ShopError::assertion(format!(
                "Expected subtotal to be {expected}, got {actual}"
            )))
        }
    }

    /// Subtotal equals `expected` to the cent
    pub async fn assert_subtotal_value(&self, expected: f64) -> ShopResult<()> {
        let actual = self.subtotal_value().await?;
        if (actual - expected).abs() < 0.005 {
            Ok(())
        } else {
            Err(ShopError::assertion(format!(
                "Expected subtotal value to be {expected}, got {actual}"
            )))
        }
    }

    /// Open the cart page and wait for the URL to change
    pub async fn go_to_cart(&self) -> ShopResult<()> {
        self.go_to_cart_button.click().await?;
        self.element
            .page()
            .wait_for_url(&UrlPattern::glob("**/cart"))
            .await
    }

    /// Click the checkout button
    pub async fn go_to_checkout(&self) -> ShopResult<()> {
        self.checkout_button.click().await
    }

    /// Dismiss the panel
    pub async fn close(&self) -> ShopResult<()> {
        self.element.page().press_key("Escape").await
    }

    /// Wait for the panel to open
    pub async fn wait_for_visible(&self) -> ShopResult<()> {
        expect(self.root())
            .with_message("Cart panel should be visible")
            .to_be_visible()
            .await
    }

    /// Wait for the panel to close
    pub async fn wait_for_hidden(&self) -> ShopResult<()> {
        expect(self.root())
            .with_message("Cart panel should be hidden")
            .to_be_hidden()
            .await
    }

    /// Show the cart tab
    pub async fn switch_to_cart(&self) -> ShopResult<()> {
        self.cart_tab.click().await
    }

    /// Show the wishlist tab
    pub async fn switch_to_wishlist(&self) -> ShopResult<()> {
        self.wishlist_tab.click().await
    }

    /// Show the compare tab
    pub async fn switch_to_compare(&self) -> ShopResult<()> {
        self.compare_tab.click().await
    }
}

impl Component for Cart {
    fn element(&self) -> &ElementHandle {
        &self.element
    }
}

/// One row of the offcanvas cart
#[derive(Debug, Clone)]
pub struct CartItem {
    element: ElementHandle,
    loader: Loader,
    /// Product thumbnail
    pub image: Locator,
    /// Product name link
    pub name: Locator,
    /// Short description
    pub short_description: Locator,
    /// Quantity input
    pub quantity_input: Locator,
    /// Quantity spinner down
    pub decrease_button: Locator,
    /// Quantity spinner up
    pub increase_button: Locator,
    /// Unit price
    pub unit_price: Locator,
    /// Move to wishlist link
    pub move_to_wishlist_button: Locator,
    /// Remove link
    pub remove_button: Locator,
}

impl CartItem {
    const NAME_SELECTOR: &'static str = "a.name";

    /// Row rooted at `row`, settling on `loader` after mutations
    #[must_use]
    pub fn new(row: Locator, loader: Loader) -> Self {
        let element = ElementHandle::from_locator(row);
        Self {
            loader,
            image: element.locator(".img-center-container img"),
            name: element.locator(Self::NAME_SELECTOR),
            short_description: element.locator(".short-desc"),
            quantity_input: element
                .locator("#item_EnteredQuantity, input[name=\"item.EnteredQuantity\"]"),
            decrease_button: element.locator(".bootstrap-touchspin-down"),
            increase_button: element.locator(".bootstrap-touchspin-up"),
            unit_price: element.locator(".unit-price"),
            move_to_wishlist_button: element.locator("a[data-action=\"addfromcart\"]"),
            remove_button: element.locator("a.remove[data-action=\"remove\"]"),
            element,
        }
    }

    /// Trimmed product name
    pub async fn name(&self) -> ShopResult<String> {
        Ok(self.name.text_content().await?.trim().to_string())
    }

    /// Current quantity
    pub async fn quantity(&self) -> ShopResult<u32> {
        let value = self.quantity_input.input_value().await?;
        parse_count("quantity", &value)
    }

    /// Type a quantity, commit it and wait for the cart to update
    pub async fn set_quantity(&self, quantity: u32) -> ShopResult<()> {
        self.quantity_input.fill(&quantity.to_string()).await?;
        self.quantity_input.blur().await?;
        self.loader.wait_for_load().await
    }

    /// Press the up spinner `times` times, settling after each press
    pub async fn increase_quantity(&self, times: u32) -> ShopResult<()> {
        for _ in 0..times {
            self.increase_button.click().await?;
            self.loader.wait_for_load().await?;
        }
        Ok(())
    }

    /// Press the down spinner `times` times, settling after each press
    pub async fn decrease_quantity(&self, times: u32) -> ShopResult<()> {
        for _ in 0..times {
            self.decrease_button.click().await?;
            self.loader.wait_for_load().await?;
        }
        Ok(())
    }

    /// Trimmed unit price text
    pub async fn unit_price_text(&self) -> ShopResult<String> {
        Ok(self.unit_price.text_content().await?.trim().to_string())
    }

    /// Unit price as a number
    pub async fn unit_price_value(&self) -> ShopResult<f64> {
        parse_price("unit price", &self.unit_price_text().await?)
    }

    /// Remove this row and wait for the cart to update
    pub async fn remove(&self) -> ShopResult<()> {
        self.remove_button.click().await?;
        self.loader.wait_for_load().await
    }

    /// Move this row to the wishlist and wait for the cart to update
    pub async fn move_to_wishlist(&self) -> ShopResult<()> {
        self.move_to_wishlist_button.click().await?;
        self.loader.wait_for_load().await
    }

    /// Open the product page
    pub async fn view_details(&self) -> ShopResult<()> {
        self.name.click().await
    }
}

impl Component for CartItem {
    fn element(&self) -> &ElementHandle {
        &self.element
    }
}
