use crate::element::{Component, ElementHandle};
use crate::loader::Loader;
use crate::locator::{Locator, SelectorChain};
use crate::page::Page;
use crate::page_object::{PageHandle, PageObject};
use crate::price::{parse_count, parse_price};
use crate::result::{ShopError, ShopResult};
use crate::wait::UrlPattern;
use tracing::{debug, info};

/// The shopping cart page (`/cart`)
#[derive(Debug, Clone)]
pub struct CartPage {
    handle: PageHandle,
    loader: Loader,
    /// Page content
    pub cart_content: Locator,
    /// Cart form
    pub cart_form: Locator,
    /// Item table
    pub cart_items_container: Locator,
    /// One match per item row
    pub cart_rows: Locator,
    /// Order totals box
    pub order_totals: Locator,
    /// Subtotal amount
    pub subtotal_value: Locator,
    /// Shipping amount
    pub shipping_value: Locator,
    /// Tax amount
    pub tax_value: Locator,
    /// Order total amount
    pub total_value: Locator,
    /// "Continue shopping"
    pub continue_shopping_button: Locator,
    /// "Checkout"
    pub checkout_button: Locator,
    /// Discount code section
    pub discount_code_section: Locator,
    /// Discount code input
    pub discount_code_input: Locator,
    /// Discount code submit
    pub apply_discount_button: Locator,
    /// Gift card section
    pub gift_card_section: Locator,
    /// Gift card input
    pub gift_card_input: Locator,
    /// Gift card submit
    pub apply_gift_card_button: Locator,
    /// Shipping estimate section
    pub shipping_estimate_section: Locator,
}

impl CartPage {
    /// Route of the cart
    pub const URL: &'static str = "/cart";

    /// Cart page bound to `page`
    #[must_use]
    pub fn new(page: &Page) -> Self {
        let handle = PageHandle::new(page, Self::URL);
        let cart_items_container = handle.locator("#cart-items.cart");
        let cart_rows = cart_items_container.locator(".cart-body").locator(".cart-row");
        let order_totals = handle.locator("#order-totals");
        let summary = order_totals.locator(".cart-summary");
        let summary_value =
            |row: &str| summary.locator(row).locator(".cart-summary-value");
        Self {
            loader: Loader::new(page),
            cart_content: handle.locator(".order-summary-content.cart-content"),
            cart_form: handle.locator("form[action=\"/cart\"]"),
            subtotal_value: summary_value(".cart-summary-subtotal"),
            shipping_value: summary_value(".cart-summary-shipping"),
            tax_value: summary_value(".cart-summary-tax"),
            total_value: summary_value(".cart-summary-total"),
            continue_shopping_button: handle.locator("button[name=\"continueshopping\"]"),
            checkout_button: handle.locator("button#checkout"),
            discount_code_section: handle.locator(".cart-action-coupon"),
            discount_code_input: handle.locator("input[name=\"discountcouponcode\"]"),
            apply_discount_button: handle.locator("button[name=\"applydiscountcouponcode\"]"),
            gift_card_section: handle.locator(".cart-action-giftcard"),
            gift_card_input: handle.locator("input[name=\"giftcardcouponcode\"]"),
            apply_gift_card_button: handle.locator("button[name=\"applygiftcardcouponcode\"]"),
            shipping_estimate_section: handle.locator(".cart-action-shipping"),
            cart_items_container,
            cart_rows,
            order_totals,
            handle,
        }
    }

    /// The busy indicator this page settles on
    #[must_use]
    pub const fn loader(&self) -> &Loader {
        &self.loader
    }

    /// The nth item row
    #[must_use]
    pub fn row(&self, index: usize) -> CartRow {
        CartRow::new(self.cart_rows.nth(index), self.loader.clone())
    }

    /// The row whose product link contains `name`
    #[must_use]
    pub fn row_by_name(&self, name: &str) -> CartRow {
        let row = self
            .cart_rows
            .filter_has(SelectorChain::css(CartRow::LINK_SELECTOR).with_text(name));
        CartRow::new(row, self.loader.clone())
    }

    /// Number of item rows
    pub async fn item_count(&self) -> ShopResult<usize> {
        self.cart_rows.count().await
    }

    /// Whether the cart has no rows
    pub async fn is_empty(&self) -> ShopResult<bool> {
        Ok(self.item_count().await? == 0)
    }

    async fn trimmed(locator: &Locator) -> ShopResult<String> {
        Ok(locator.text_content().await?.trim().to_string())
    }

    /// Order subtotal text, e.g. `"$4.20 excl tax"`
    pub async fn subtotal_text(&self) -> ShopResult<String> {
        Self::trimmed(&self.subtotal_value).await
    }

    /// Order subtotal as a number
    pub async fn subtotal(&self) -> ShopResult<f64> {
        parse_price("subtotal", &self.subtotal_text().await?)
    }

    /// Shipping text
    pub async fn shipping_text(&self) -> ShopResult<String> {
        Self::trimmed(&self.shipping_value).await
    }

    /// Shipping as a number
    pub async fn shipping(&self) -> ShopResult<f64> {
        parse_price("shipping", &self.shipping_text().await?)
    }

    /// Tax text
    pub async fn tax_text(&self) -> ShopResult<String> {
        Self::trimmed(&self.tax_value).await
    }

    /// Tax as a number
    pub async fn tax(&self) -> ShopResult<f64> {
        parse_price("tax", &self.tax_text().await?)
    }

    /// Order total text
    pub async fn total_text(&self) -> ShopResult<String> {
        Self::trimmed(&self.total_value).await
    }

    /// Order total as a number
    pub async fn total(&self) -> ShopResult<f64> {
        parse_price("total", &self.total_text().await?)
    }

    async fn apply_code(
        &self,
        section: &Locator,
        input: &Locator,
        button: &Locator,
        code: &str,
    ) -> ShopResult<()> {
        if !section.locator(".cart-action-body").is_visible().await? {
            debug!(section = %section, "expand cart action");
            section.locator(".cart-action-title").click().await?;
        }
        input.fill(code).await?;
        button.click().await?;
        self.loader.wait_for_load().await
    }

    /// Apply a discount code, expanding its section if collapsed
    pub async fn apply_discount_code(&self, code: &str) -> ShopResult<()> {
        info!("apply discount code");
        self.apply_code(
            &self.discount_code_section,
            &self.discount_code_input,
            &self.apply_discount_button,
            code,
        )
        .await
    }

    /// Apply a gift card, expanding its section if collapsed
    pub async fn apply_gift_card(&self, code: &str) -> ShopResult<()> {
        info!("apply gift card");
        self.apply_code(
            &self.gift_card_section,
            &self.gift_card_input,
            &self.apply_gift_card_button,
            code,
        )
        .await
    }

    /// Leave the cart for the catalog
    pub async fn continue_shopping(&self) -> ShopResult<()> {
        self.continue_shopping_button.click().await
    }

    /// Click checkout and wait for the login redirect
    pub async fn proceed_to_checkout(&self) -> ShopResult<()> {
        info!("proceed to checkout");
        self.checkout_button.click().await?;
        self.handle.wait_for_url(&UrlPattern::glob("**/login**")).await
    }

    /// Remove rows one at a time until the cart is empty.
    ///
    /// The row count is re-read after every removal. Returns the number of
    /// removals performed, zero on an empty cart.
    pub async fn clear_all_items(&self) -> ShopResult<usize> {
        let mut removed = 0;
        let mut remaining = self.item_count().await?;
        while remaining > 0 {
            self.row(0).remove().await?;
            removed += 1;
            let now = self.item_count().await?;
            if now >= remaining {
                return Err(ShopError::assertion(format!(
                    "cart still has {now} item(s) after removing one of {remaining}"
                )));
            }
            remaining = now;
        }
        info!(removed, "cart cleared");
        Ok(removed)
    }
}

impl PageObject for CartPage {
    fn handle(&self) -> &PageHandle {
        &self.handle
    }

    fn page_name(&self) -> &str {
        "CartPage"
    }
}

/// One item row on the cart page
#[derive(Debug, Clone)]
pub struct CartRow {
    element: ElementHandle,
    loader: Loader,
    /// Product image
    pub image: Locator,
    /// Product link, also the name
    pub product_link: Locator,
    /// Product description
    pub description: Locator,
    /// Estimated delivery
    pub delivery_date: Locator,
    /// Unit price
    pub unit_price: Locator,
    /// Quantity input
    pub quantity_input: Locator,
    /// Quantity spinner up
    pub increase_button: Locator,
    /// Quantity spinner down
    pub decrease_button: Locator,
    /// Row subtotal
    pub subtotal: Locator,
    /// Remove link
    pub remove_button: Locator,
    /// Move-to-wishlist link
    pub move_to_wishlist_button: Locator,
}

impl CartRow {
    const LINK_SELECTOR: &'static str = ".cart-item-link";

    /// Row rooted at `row`, settling on `loader` after mutations
    #[must_use]
    pub fn new(row: Locator, loader: Loader) -> Self {
        let element = ElementHandle::from_locator(row);
        let quantity_column = element.locator(".cart-col-qty");
        Self {
            loader,
            image: element.locator(".cart-item-img img"),
            product_link: element.locator(Self::LINK_SELECTOR),
            description: element.locator(".cart-item-desc"),
            delivery_date: element.locator(".delivery-date"),
            unit_price: element.locator(".cart-col-price").first().locator(".price"),
            quantity_input: quantity_column.locator(".qty-input input"),
            increase_button: quantity_column.locator(".bootstrap-touchspin-up"),
            decrease_button: quantity_column.locator(".bootstrap-touchspin-down"),
            subtotal: element.locator(".cart-col-subtotal").locator(".price"),
            remove_button: element.locator("a[data-action=\"remove\"]"),
            move_to_wishlist_button: element.locator("a[data-action=\"addfromcart\"]"),
            element,
        }
    }

    /// Trimmed product name
    pub async fn name(&self) -> ShopResult<String> {
        Ok(self.product_link.text_content().await?.trim().to_string())
    }

    /// Trimmed description
    pub async fn description(&self) -> ShopResult<String> {
        Ok(self.description.text_content().await?.trim().to_string())
    }

    /// Trimmed unit price text
    pub async fn unit_price_text(&self) -> ShopResult<String> {
        Ok(self.unit_price.text_content().await?.trim().to_string())
    }

    /// Unit price as a number
    pub async fn unit_price_value(&self) -> ShopResult<f64> {
        parse_price("unit price", &self.unit_price_text().await?)
    }

    /// Trimmed row subtotal text
    pub async fn subtotal_text(&self) -> ShopResult<String> {
        Ok(self.subtotal.text_content().await?.trim().to_string())
    }

    /// Row subtotal as a number
    pub async fn subtotal_value(&self) -> ShopResult<f64> {
        parse_price("item subtotal", &self.subtotal_text().await?)
    }

    /// Current quantity
    pub async fn quantity(&self) -> ShopResult<u32> {
        parse_count("quantity", &self.quantity_input.input_value().await?)
    }

    /// Type a quantity, commit it and wait for the totals to update
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
        self.product_link.click().await
    }
}

impl Component for CartRow {
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

    fn setup() -> (Arc<MockDriver>, CartPage) {
        let mock = Arc::new(MockDriver::new());
        let timeouts = Timeouts {
            expect_ms: 50,
            poll_ms: 2,
            loader_appear_ms: 10,
            loader_settle_ms: 100,
            navigation_ms: 100,
            ..Timeouts::default()
        };
        let config = SuiteConfig::new()
            .with_base_url("https://shop.test")
            .with_timeouts(timeouts);
        let page = Page::new(mock.clone(), config);
        (mock, CartPage::new(&page))
    }

    mod selectors {
        use super::*;

        #[test]
        fn test_rows_and_summary() {
            let (_mock, cart) = setup();
            assert_eq!(
                cart.row(0).quantity_input.selector(),
                "#cart-items.cart >> .cart-body >> .cart-row >> nth=0 >> .cart-col-qty >> .qty-input input"
            );
            assert_eq!(
                cart.total_value.selector(),
                "#order-totals >> .cart-summary >> .cart-summary-total >> .cart-summary-value"
            );
        }

        #[test]
        fn test_row_by_name_filters_on_link() {
            let (_mock, cart) = setup();
            assert_eq!(
                cart.row_by_name("Golf").root().selector(),
                "#cart-items.cart >> .cart-body >> .cart-row >> has=(.cart-item-link >> has-text=\"Golf\")"
            );
        }
    }

    mod totals {
        use super::*;

        #[tokio::test]
        async fn test_summary_values() {
            let (mock, cart) = setup();
            mock.set(&cart.subtotal_value, MockElement::with_text(" $4.20 excl tax "));
            mock.set(&cart.shipping_value, MockElement::with_text("$0.00"));
            mock.set(&cart.tax_value, MockElement::with_text("$0.80"));
            mock.set(&cart.total_value, MockElement::with_text("$5.00"));
            assert_eq!(cart.subtotal_text().await.unwrap(), "$4.20 excl tax");
            assert!((cart.subtotal().await.unwrap() - 4.2).abs() < 1e-9);
            assert!(cart.shipping().await.unwrap().abs() < 1e-9);
            assert!((cart.tax().await.unwrap() - 0.8).abs() < 1e-9);
            assert!((cart.total().await.unwrap() - 5.0).abs() < 1e-9);
        }

        #[tokio::test]
        async fn test_unparseable_total() {
            let (mock, cart) = setup();
            mock.set(&cart.total_value, MockElement::with_text("Calculated at checkout"));
            let err = cart.total().await.unwrap_err();
            assert_eq!(err.to_string(), "Unable to parse total: Calculated at checkout");
        }
    }

    mod actions {
        use super::*;

        #[tokio::test]
        async fn test_clear_all_items_on_empty_cart() {
            let (mock, cart) = setup();
            assert_eq!(cart.clear_all_items().await.unwrap(), 0);
            assert!(!mock.was_called("click"));
        }

        #[tokio::test]
        async fn test_clear_all_items_requeries_rows() {
            let (mock, cart) = setup();
            let first = cart.row(0);
            mock.set(&cart.cart_rows, MockElement::new().with_count(3));
            mock.set(&first.remove_button, MockElement::new());
            let rows = cart.cart_rows.selector();
            mock.on_round_trip(&first.remove_button, 1, move |dom| {
                let left = dom.get(&rows).map_or(0, |e| e.count.saturating_sub(1));
                dom.set(&rows, MockElement::new().with_count(left));
            });
            assert_eq!(cart.clear_all_items().await.unwrap(), 3);
            assert!(cart.is_empty().await.unwrap());
            assert_eq!(mock.performed_count(&first.remove_button, "click"), 3);
        }

        #[tokio::test]
        async fn test_row_increase_updates_totals_after_settle() {
            let (mock, cart) = setup();
            let row = cart.row(0);
            mock.set(&row.increase_button, MockElement::new());
            mock.set(&row.quantity_input, MockElement::with_value("1"));
            mock.set(&row.subtotal, MockElement::with_text("$2.10"));
            mock.set(&cart.total_value, MockElement::with_text("$2.10"));
            let qty = row.quantity_input.selector();
            let line = row.subtotal.selector();
            let total = cart.total_value.selector();
            mock.on_round_trip(&row.increase_button, 2, move |dom| {
                let next = dom
                    .get(&qty)
                    .and_then(|e| e.value.parse::<u32>().ok())
                    .unwrap_or(0)
                    + 1;
                let amount = format!("${:.2}", 2.10 * f64::from(next));
                dom.set(&qty, MockElement::with_value(next.to_string()));
                dom.set(&line, MockElement::with_text(amount.clone()));
                dom.set(&total, MockElement::with_text(amount));
            });

            row.increase_quantity(2).await.unwrap();
            assert_eq!(row.quantity().await.unwrap(), 3);
            assert!((row.subtotal_value().await.unwrap() - 6.30).abs() < 1e-9);
            assert!((cart.total().await.unwrap() - 6.30).abs() < 1e-9);
        }

        #[tokio::test]
        async fn test_row_decrease_settles_after_each_press() {
            let (mock, cart) = setup();
            let row = cart.row(0);
            mock.set(&row.decrease_button, MockElement::new());
            mock.set(&row.quantity_input, MockElement::with_value("4"));
            let qty = row.quantity_input.selector();
            mock.on_round_trip(&row.decrease_button, 1, move |dom| {
                let next = dom
                    .get(&qty)
                    .and_then(|e| e.value.parse::<u32>().ok())
                    .unwrap_or(1)
                    .saturating_sub(1);
                dom.set(&qty, MockElement::with_value(next.to_string()));
            });

            row.decrease_quantity(3).await.unwrap();
            assert_eq!(row.quantity().await.unwrap(), 1);
        }

        #[tokio::test]
        async fn test_row_remove_waits_for_cart_update() {
            let (mock, cart) = setup();
            let row = cart.row_by_name("Golf");
            mock.set(&cart.cart_rows, MockElement::new().with_count(2));
            mock.set(&row.remove_button, MockElement::new());
            let rows = cart.cart_rows.selector();
            mock.on_round_trip(&row.remove_button, 2, move |dom| {
                dom.set(&rows, MockElement::new().with_count(1));
            });

            row.remove().await.unwrap();
            assert_eq!(cart.item_count().await.unwrap(), 1);
        }

        #[tokio::test]
        async fn test_clear_all_items_stops_when_removal_is_ignored() {
            let (mock, cart) = setup();
            mock.set(&cart.cart_rows, MockElement::new().with_count(2));
            mock.set(&cart.row(0).remove_button, MockElement::new());
            let err = cart.clear_all_items().await.unwrap_err();
            assert!(matches!(err, ShopError::Assertion { .. }));
        }

        #[tokio::test]
        async fn test_discount_code_expands_collapsed_section() {
            let (mock, cart) = setup();
            let title = cart.discount_code_section.locator(".cart-action-title");
            let body = cart.discount_code_section.locator(".cart-action-body");
            mock.set(&title, MockElement::new());
            let body_key = body.selector();
            let input_key = cart.discount_code_input.selector();
            let button_key = cart.apply_discount_button.selector();
            mock.on_action(&title, move |dom| {
                dom.set(&body_key, MockElement::new());
                dom.set(&input_key, MockElement::new());
                dom.set(&button_key, MockElement::new());
            });

            cart.apply_discount_code("SPRING10").await.unwrap();

            assert!(mock.was_performed(&title, "click"));
            assert!(mock.was_performed(&cart.apply_discount_button, "click"));
            let code = mock.with_dom(|dom| dom.get(&cart.discount_code_input).map(|e| e.value.clone()));
            assert_eq!(code.as_deref(), Some("SPRING10"));
        }

        #[tokio::test]
        async fn test_gift_card_skips_expand_when_open() {
            let (mock, cart) = setup();
            let title = cart.gift_card_section.locator(".cart-action-title");
            mock.set(cart.gift_card_section.locator(".cart-action-body"), MockElement::new());
            mock.set(&cart.gift_card_input, MockElement::new());
            mock.set(&cart.apply_gift_card_button, MockElement::new());
            cart.apply_gift_card("GIFT-1").await.unwrap();
            assert!(!mock.was_performed(&title, "click"));
        }

        #[tokio::test]
        async fn test_checkout_waits_for_login() {
            let (mock, cart) = setup();
            mock.set(&cart.checkout_button, MockElement::new());
            mock.on_action(&cart.checkout_button, |dom| {
                dom.set_url("https://shop.test/login?returnUrl=%2Fcart");
            });
            cart.proceed_to_checkout().await.unwrap();
            assert!(mock.was_called("wait_for_load_state:load"));
        }

        #[tokio::test]
        async fn test_checkout_without_redirect_times_out() {
            let (mock, cart) = setup();
            mock.set(&cart.checkout_button, MockElement::new());
            let err = cart.proceed_to_checkout().await.unwrap_err();
            assert!(err.is_timeout());
        }
    }
}
