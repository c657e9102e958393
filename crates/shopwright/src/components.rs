//! Reusable storefront widgets.
//!
//! Each component is rooted at a default selector (`new`) or a caller-supplied
//! one (`with_root`), and declares its sub-elements as [`Locator`](crate::Locator)
//! fields at construction.

mod active_filters;
mod cart;
mod filter;
mod menu;
mod product_list;
mod searchbar;

pub use active_filters::{ActiveFilters, ACTIVE_FILTERS_SELECTOR};
pub use cart::{Cart, CartItem, CART_SELECTOR};
pub use filter::{DeliveryTime, Filter, PriceRange, Rating, FILTER_SELECTOR};
pub use menu::{Dropdown, MainMenuItem, Menu, MENU_SELECTOR};
pub use product_list::{PageSize, Product, ProductList, SortOption, PRODUCT_LIST_SELECTOR};
pub use searchbar::{Searchbar, SEARCHBAR_SELECTOR};
