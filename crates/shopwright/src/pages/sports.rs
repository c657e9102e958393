use crate::components::{
    ActiveFilters, Cart, Filter, Menu, PriceRange, Product, ProductList, Searchbar,
};
use crate::page::Page;
use crate::page_object::{PageHandle, PageObject};
use crate::result::ShopResult;
use crate::wait::LoadState;
use tracing::info;

/// The sports category listing (`/sports`)
#[derive(Debug, Clone)]
pub struct SportsPage {
    handle: PageHandle,
    /// Site header
    pub menu: Menu,
    /// Shopbar search
    pub searchbar: Searchbar,
    /// Faceted search sidebar
    pub filter: Filter,
    /// Applied filter chips
    pub active_filters: ActiveFilters,
    /// Product grid
    pub product_list: ProductList,
    /// Offcanvas cart
    pub cart: Cart,
}

impl SportsPage {
    /// Route of the category
    pub const URL: &'static str = "/sports";

    /// Sports listing bound to `page`
    #[must_use]
    pub fn new(page: &Page) -> Self {
        Self {
            handle: PageHandle::new(page, Self::URL),
            menu: Menu::new(page),
            searchbar: Searchbar::new(page),
            filter: Filter::new(page),
            active_filters: ActiveFilters::new(page),
            product_list: ProductList::new(page),
            cart: Cart::new(page),
        }
    }

    /// Narrow the listing to a price range and wait for the grid to reload
    pub async fn filter_by_price(&self, range: PriceRange) -> ShopResult<()> {
        self.filter.select_price_range(range).await?;
        self.handle
            .page()
            .wait_for_load_state(LoadState::NetworkIdle)
            .await
    }

    /// Hover a product, add it to the cart and wait for the cart panel
    pub async fn add_to_cart(&self, product: &Product) -> ShopResult<()> {
        product.select().await?;
        product.add_to_cart().await?;
        self.cart.wait_for_visible().await
    }

    /// Add the nth product of the grid to the cart
    pub async fn add_nth_to_cart(&self, index: usize) -> ShopResult<Product> {
        let product = self.product_list.product(index);
        info!(index, "add product to cart");
        self.add_to_cart(&product).await?;
        Ok(product)
    }

    /// Add the product named `name` to the cart
    pub async fn add_named_to_cart(&self, name: &str) -> ShopResult<Product> {
        let product = self.product_list.product_by_name(name);
        info!(product = name, "add product to cart");
        self.add_to_cart(&product).await?;
        Ok(product)
    }
}

impl PageObject for SportsPage {
    fn handle(&self) -> &PageHandle {
        &self.handle
    }

    fn page_name(&self) -> &str {
        "SportsPage"
    }
}
