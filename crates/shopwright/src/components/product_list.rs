//! Product grid on category and search pages.

use crate::element::{Component, ElementHandle};
use crate::loader::Loader;
use crate::locator::{Locator, SelectorChain};
use crate::page::Page;
use crate::price::{parse_price, ItemCount};
use crate::result::{ShopError, ShopResult};
use crate::wait::LoadState;
use std::fmt;
use tracing::info;

/// Root of the product grid
pub const PRODUCT_LIST_SELECTOR: &str = ".product-list-container";

/// Sort dropdown options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOption {
    /// Featured
    Featured,
    /// Name: A to Z
    NameAToZ,
    /// Name: Z to A
    NameZToA,
    /// Price: Low to High
    PriceLowToHigh,
    /// Price: High to Low
    PriceHighToLow,
    /// Newest Arrivals
    NewestArrivals,
}

impl SortOption {
    /// Option label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Featured => "Featured",
            Self::NameAToZ => "Name: A to Z",
            Self::NameZToA => "Name: Z to A",
            Self::PriceLowToHigh => "Price: Low to High",
            Self::PriceHighToLow => "Price: High to Low",
            Self::NewestArrivals => "Newest Arrivals",
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Page size dropdown options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageSize {
    /// 12 per page
    Size12,
    /// 24 per page
    Size24,
    /// 36 per page
    Size36,
    /// 48 per page
    Size48,
    /// 72 per page
    Size72,
    /// 120 per page
    Size120,
}

impl PageSize {
    /// Products per page
    #[must_use]
    pub const fn value(self) -> u32 {
        match self {
            Self::Size12 => 12,
            Self::Size24 => 24,
            Self::Size36 => 36,
            Self::Size48 => 48,
            Self::Size72 => 72,
            Self::Size120 => 120,
        }
    }
}

/// The product grid
#[derive(Debug, Clone)]
pub struct ProductList {
    element: ElementHandle,
    loader: Loader,
    /// Paging banner, e.g. "1-12 of 37"
    pub item_count_banner: Locator,
    /// Grid container
    pub grid: Locator,
    /// One match per product card
    pub products: Locator,
    /// Sort `<select>`
    pub sort_dropdown: Locator,
    /// Sort toggle button
    pub sort_button: Locator,
    /// Page size `<select>`
    pub page_size_dropdown: Locator,
    /// Page size toggle button
    pub page_size_button: Locator,
    /// List view switch
    pub list_view_button: Locator,
}

impl ProductList {
    /// Product grid rooted at `.product-list-container`
    #[must_use]
    pub fn new(page: &Page) -> Self {
        Self::with_root(page, PRODUCT_LIST_SELECTOR)
    }

    /// Product grid rooted at a custom selector
    #[must_use]
    pub fn with_root(page: &Page, selector: &str) -> Self {
        let element = ElementHandle::from_selector(page, selector);
        let grid = element.locator(".artlist");
        Self {
            loader: Loader::new(page),
            item_count_banner: element.locator(".search-hitcount"),
            products: grid.locator("article.art"),
            sort_dropdown: element.locator("#artlist-action-sort"),
            sort_button: element.locator(".artlist-action--sort button"),
            page_size_dropdown: element.locator("#artlist-action-pagesize"),
            page_size_button: element.locator(".artlist-action--pagesize button"),
            list_view_button: element.locator(".artlist-action--viewmode a[href*=\"v=list\"]"),
            grid,
            element,
        }
    }

    /// The nth product card
    #[must_use]
    pub fn product(&self, index: usize) -> Product {
        Product::new(self.products.nth(index), self.loader.clone())
    }

    /// The product card whose name contains `name`
    #[must_use]
    pub fn product_by_name(&self, name: &str) -> Product {
        let card = self
            .products
            .filter_has(SelectorChain::css(".art-name").with_text(name));
        Product::new(card, self.loader.clone())
    }

    /// Number of cards currently rendered
    pub async fn product_count(&self) -> ShopResult<usize> {
        self.products.count().await
    }

    /// Parse the paging banner
    pub async fn item_count(&self) -> ShopResult<ItemCount> {
        let text = self.item_count_banner.text_content().await?;
        ItemCount::parse(text.trim())
    }

    /// The banner's total equals `expected`
    pub async fn assert_item_count(&self, expected: u32) -> ShopResult<()> {
        let actual = self.item_count().await?.total;
        if actual == expected {
            Ok(())
        } else {
            Err(ShopError::assertion(format!(
                "Expected {expected} items, got {actual}"
            )))
        }
    }

    /// Change the sort order
    pub async fn sort_by(&self, option: SortOption) -> ShopResult<()> {
        info!(sort = %option, "sort products");
        self.sort_dropdown.select_option(option.label()).await?;
        self.element.page().wait_for_load_state(LoadState::NetworkIdle).await
    }

    /// Change the page size
    pub async fn set_page_size(&self, size: PageSize) -> ShopResult<()> {
        info!(size = size.value(), "set page size");
        self.page_size_dropdown
            .select_option_value(&size.value().to_string())
            .await?;
        self.element.page().wait_for_load_state(LoadState::NetworkIdle).await
    }

    /// Switch the grid to list view
    pub async fn switch_to_list_view(&self) -> ShopResult<()> {
        self.list_view_button.click().await
    }
}

impl Component for ProductList {
    fn element(&self) -> &ElementHandle {
        &self.element
    }
}

/// One product card
#[derive(Debug, Clone)]
pub struct Product {
    element: ElementHandle,
    loader: Loader,
    /// Product name text
    pub name: Locator,
    /// Link to the product page
    pub link: Locator,
    /// Product image
    pub image: Locator,
    /// Brand
    pub brand: Locator,
    /// Short description
    pub description: Locator,
    /// Current price
    pub price: Locator,
    /// Crossed-out price
    pub old_price: Locator,
    /// Discount badge
    pub discount_badge: Locator,
    /// Delivery time
    pub delivery_time: Locator,
    /// Add to cart button
    pub add_to_cart_button: Locator,
    /// Add to wishlist button
    pub add_to_wishlist_button: Locator,
    /// Add to compare button
    pub add_to_compare_button: Locator,
    /// Details button
    pub view_details_button: Locator,
}

impl Product {
    /// Card rooted at `card`
    #[must_use]
    pub fn new(card: Locator, loader: Loader) -> Self {
        let element = ElementHandle::from_locator(card);
        Self {
            loader,
            name: element.locator(".art-name a span"),
            link: element.locator(".art-name a"),
            image: element.locator(".art-picture img"),
            brand: element.locator(".art-brand span"),
            description: element.locator(".art-description"),
            price: element.locator(".art-price"),
            old_price: element.locator(".art-oldprice"),
            discount_badge: element.locator(".art-badges .badge-danger"),
            delivery_time: element.locator(".delivery-time span[dir=\"auto\"]"),
            add_to_cart_button: element.locator("[data-type=\"cart\"]"),
            add_to_wishlist_button: element.locator("[data-type=\"wishlist\"]"),
            add_to_compare_button: element.locator("[data-type=\"compare\"]"),
            view_details_button: element
                .locator(".art-btn-group a[href]:not([data-type])")
                .last(),
            element,
        }
    }

    async fn optional_text(locator: &Locator) -> ShopResult<Option<String>> {
        if !locator.is_visible().await? {
            return Ok(None);
        }
        let text = locator.text_content().await?;
        let text = text.trim();
        Ok((!text.is_empty()).then(|| text.to_string()))
    }

    /// Hover the card to reveal its actions
    pub async fn select(&self) -> ShopResult<()> {
        self.element.root().hover().await
    }

    /// Trimmed product name
    pub async fn name(&self) -> ShopResult<String> {
        Ok(self.name.text_content().await?.trim().to_string())
    }

    /// Trimmed price text, e.g. `"From $20.90 excl tax"`
    pub async fn price_text(&self) -> ShopResult<String> {
        Ok(self.price.text_content().await?.trim().to_string())
    }

    /// Price as a number
    pub async fn price_value(&self) -> ShopResult<f64> {
        parse_price("price", &self.price_text().await?)
    }

    /// Crossed-out price, when shown
    pub async fn old_price_text(&self) -> ShopResult<Option<String>> {
        Self::optional_text(&self.old_price).await
    }

    /// Crossed-out price as a number, when shown
    pub async fn old_price_value(&self) -> ShopResult<Option<f64>> {
        match self.old_price_text().await? {
            Some(text) => parse_price("old price", &text).map(Some),
            None => Ok(None),
        }
    }

    /// Discount badge text, when shown
    pub async fn discount(&self) -> ShopResult<Option<String>> {
        Self::optional_text(&self.discount_badge).await
    }

    /// Whether a discount badge is shown
    pub async fn has_discount(&self) -> ShopResult<bool> {
        self.discount_badge.is_visible().await
    }

    /// Brand, when shown
    pub async fn brand(&self) -> ShopResult<Option<String>> {
        Self::optional_text(&self.brand).await
    }

    /// Trimmed description
    pub async fn description(&self) -> ShopResult<String> {
        Ok(self.description.text_content().await?.trim().to_string())
    }

    /// Trimmed delivery time
    pub async fn delivery_time(&self) -> ShopResult<String> {
        Ok(self.delivery_time.text_content().await?.trim().to_string())
    }

    /// Add to cart and wait for the cart to update
    pub async fn add_to_cart(&self) -> ShopResult<()> {
        info!(product = %self.element.root(), "add to cart");
        self.add_to_cart_button.click().await?;
        self.loader.wait_for_load().await
    }

    /// Add to wishlist and wait for the request to finish
    pub async fn add_to_wishlist(&self) -> ShopResult<()> {
        self.add_to_wishlist_button.click().await?;
        self.loader.wait_for_load().await
    }

    /// Add to the compare list and wait for the request to finish
    pub async fn add_to_compare(&self) -> ShopResult<()> {
        self.add_to_compare_button.click().await?;
        self.loader.wait_for_load().await
    }

    /// Open the product page
    pub async fn view_details(&self) -> ShopResult<()> {
        self.link.click().await
    }

    /// Price text contains `expected`
    pub async fn assert_price(&self, expected: &str) -> ShopResult<()> {
        let actual = self.price_text().await?;
        if actual.contains(expected) {
            Ok(())
        } else {
            Err(ShopError::assertion(format!(
                "Expected price to be {expected}, got {actual}"
            )))
        }
    }

    /// Discount badge reads exactly `expected`
    pub async fn assert_discount(&self, expected: &str) -> ShopResult<()> {
        let actual = self.discount().await?;
        if actual.as_deref() == Some(expected) {
            Ok(())
        } else {
            Err(ShopError::assertion(format!(
                "Expected discount to be {expected}, got {actual:?}"
            )))
        }
    }
}

impl Component for Product {
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

    fn setup() -> (Arc<MockDriver>, ProductList) {
        let mock = Arc::new(MockDriver::new());
        let timeouts = Timeouts {
            expect_ms: 40,
            poll_ms: 2,
            loader_appear_ms: 5,
            ..Timeouts::default()
        };
        let page = Page::new(mock.clone(), SuiteConfig::new().with_timeouts(timeouts));
        (mock, ProductList::new(&page))
    }

    mod list {
        use super::*;

        #[tokio::test]
        async fn test_item_count_banner() {
            let (mock, list) = setup();
            mock.set(&list.item_count_banner, MockElement::with_text(" 1-12 of 37 "));
            let count = list.item_count().await.unwrap();
            assert_eq!(count.displayed, 12);
            assert_eq!(count.total, 37);
            list.assert_item_count(37).await.unwrap();
            assert!(list.assert_item_count(12).await.is_err());
        }

        #[tokio::test]
        async fn test_malformed_banner() {
            let (mock, list) = setup();
            mock.set(&list.item_count_banner, MockElement::with_text("lots"));
            let err = list.item_count().await.unwrap_err();
            assert!(matches!(err, ShopError::Parse { .. }));
        }

        #[tokio::test]
        async fn test_sort_and_page_size() {
            let (mock, list) = setup();
            mock.set(&list.sort_dropdown, MockElement::new());
            mock.set(&list.page_size_dropdown, MockElement::new());
            list.sort_by(SortOption::PriceLowToHigh).await.unwrap();
            list.set_page_size(PageSize::Size48).await.unwrap();
            mock.with_dom(|dom| {
                assert_eq!(dom.get(&list.sort_dropdown).unwrap().value, "Price: Low to High");
                assert_eq!(dom.get(&list.page_size_dropdown).unwrap().value, "48");
            });
        }

        #[test]
        fn test_product_by_name_selector() {
            let (_mock, list) = setup();
            assert_eq!(
                list.product_by_name("Tennis").root().selector(),
                ".product-list-container >> .artlist >> article.art >> has=(.art-name >> has-text=\"Tennis\")"
            );
        }
    }

    mod product {
        use super::*;

        #[tokio::test]
        async fn test_price_and_optional_fields() {
            let (mock, list) = setup();
            let product = list.product(0);
            mock.set(&product.price, MockElement::with_text("From $20.90 excl tax"));
            mock.set(&product.old_price, MockElement::with_text("$25.00"));
            mock.set(&product.discount_badge, MockElement::with_text("-16%").hidden());
            assert_eq!(product.price_value().await.unwrap(), 20.90);
            assert_eq!(product.old_price_value().await.unwrap(), Some(25.0));
            assert_eq!(product.discount().await.unwrap(), None);
            assert!(!product.has_discount().await.unwrap());
            assert_eq!(product.brand().await.unwrap(), None);
            product.assert_price("$20.90").await.unwrap();
        }

        #[tokio::test]
        async fn test_add_to_cart_clicks_and_settles() {
            let (mock, list) = setup();
            let product = list.product(1);
            mock.set(&product.add_to_cart_button, MockElement::new());
            product.add_to_cart().await.unwrap();
            assert!(mock.was_performed(&product.add_to_cart_button, "click"));
        }

        #[tokio::test]
        async fn test_select_hovers_card() {
            let (mock, list) = setup();
            let product = list.product(0);
            mock.set(product.root(), MockElement::new());
            product.select().await.unwrap();
            assert!(mock.was_performed(product.root(), "hover"));
        }
    }
}
