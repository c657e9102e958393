//! Shopwright: page objects and cart-state synchronization for storefront
//! end-to-end tests.
//!
//! Tests drive a storefront through typed page objects. Every interaction
//! goes through a [`Driver`], so the same page objects run against Chromium
//! (feature `browser`) or the scriptable [`MockDriver`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    SHOPWRIGHT Architecture                       │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Fixtures   │    │ Pages &    │    │ Locator    │            │
//! │   │ (per test) │───►│ Components │───►│ (lazy      │──► Driver  │
//! │   │            │    │ + Loader   │    │  chain)    │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Operations that change server-side cart state wait on the storefront's
//! busy indicator ([`Loader`]) before returning, so the next read sees the
//! updated totals.
//!
//! ```ignore
//! use shopwright::prelude::*;
//!
//! let fx = Fixtures::new(&page);
//! fx.start_with_empty_cart().await?;
//! fx.sports_page.filter_by_price(PriceRange::UpTo50).await?;
//! fx.sports_page.add_nth_to_cart(0).await?;
//! fx.cart.assert_subtotal("$2.10 excl tax").await?;
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

mod assertion;
#[cfg(feature = "browser")]
mod cdp;
#[allow(clippy::missing_errors_doc, clippy::doc_markdown)]
mod config;
mod driver;
mod element;
mod fixture;
mod loader;
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
mod locator;
mod mock;
mod page;
mod page_object;
mod price;
mod result;
mod wait;

/// Storefront widgets: cart, filter, product list, menu, active filters, search
pub mod components;

/// Page objects for `/`, `/sports`, `/cart` and `/login`
pub mod pages;

pub use assertion::{
    expect, retry_until, AssertionCheckResult, AssertionFailure, AssertionSummary, Expect,
    RetryConfig, RetryResult, SoftAssertions,
};
#[cfg(feature = "browser")]
pub use cdp::CdpDriver;
pub use config::{
    SuiteConfig, Timeouts, Viewport, DEFAULT_BASE_URL, ENV_BASE_URL, ENV_HEADLESS,
};
pub use driver::{Action, Driver, SelectOption};
pub use element::{Component, ElementHandle};
pub use fixture::Fixtures;
pub use loader::{Loader, LOADER_APPEAR_MESSAGE, LOADER_DISAPPEAR_MESSAGE, LOADER_SELECTOR};
pub use locator::{ElementState, Locator, Selector, SelectorChain};
pub use mock::{MockDom, MockDriver, MockElement};
pub use page::Page;
pub use page_object::{PageHandle, PageObject};
pub use price::{parse_count, parse_price, round_cents, ItemCount, ITEM_COUNT_PATTERN, PRICE_PATTERN};
pub use result::{ShopError, ShopResult};
pub use wait::{
    poll_until, LoadState, UrlPattern, WaitOptions, WaitResult, DEFAULT_EXPECT_TIMEOUT_MS,
    DEFAULT_NAVIGATION_TIMEOUT_MS, DEFAULT_POLL_INTERVAL_MS, NETWORK_IDLE_THRESHOLD_MS,
};

/// Everything a test module usually needs
pub mod prelude {
    pub use super::assertion::*;
    #[cfg(feature = "browser")]
    pub use super::cdp::*;
    pub use super::components::*;
    pub use super::config::*;
    pub use super::driver::*;
    pub use super::element::*;
    pub use super::fixture::*;
    pub use super::loader::*;
    pub use super::locator::*;
    pub use super::mock::*;
    pub use super::page::*;
    pub use super::page_object::*;
    pub use super::pages::*;
    pub use super::price::*;
    pub use super::result::*;
    pub use super::wait::*;
}
