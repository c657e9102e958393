//! Faceted search sidebar.

use crate::assertion::expect;
use crate::element::{Component, ElementHandle};
use crate::loader::Loader;
use crate::locator::Locator;
use crate::page::Page;
use crate::result::{ShopError, ShopResult};
use std::fmt;
use tracing::info;

/// Root of the faceted search sidebar
pub const FILTER_SELECTOR: &str = ".faceted-search-container";

/// Price facet options, labelled as on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceRange {
    /// up to $10.00
    UpTo10,
    /// up to $25.00
    UpTo25,
    /// up to $50.00
    UpTo50,
    /// up to $100.00
    UpTo100,
    /// up to $250.00
    UpTo250,
    /// up to $500.00
    UpTo500,
    /// up to $1,000.00
    UpTo1000,
}

impl PriceRange {
    /// Every option in display order
    pub const ALL: [Self; 7] = [
        Self::UpTo10,
        Self::UpTo25,
        Self::UpTo50,
        Self::UpTo100,
        Self::UpTo250,
        Self::UpTo500,
        Self::UpTo1000,
    ];

    /// On-page label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::UpTo10 => "up to $10.00",
            Self::UpTo25 => "up to $25.00",
            Self::UpTo50 => "up to $50.00",
            Self::UpTo100 => "up to $100.00",
            Self::UpTo250 => "up to $250.00",
            Self::UpTo500 => "up to $500.00",
            Self::UpTo1000 => "up to $1,000.00",
        }
    }
}

/// Rating facet options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rating {
    /// 4 stars & more
    FourPlus,
    /// 3 stars & more
    ThreePlus,
    /// 2 stars & more
    TwoPlus,
    /// 1 star & more
    OnePlus,
}

impl Rating {
    /// On-page label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FourPlus => "4 stars & more",
            Self::ThreePlus => "3 stars & more",
            Self::TwoPlus => "2 stars & more",
            Self::OnePlus => "1 star & more",
        }
    }

    /// Position of the radio button in the rating section
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::FourPlus => 0,
            Self::ThreePlus => 1,
            Self::TwoPlus => 2,
            Self::OnePlus => 3,
        }
    }
}

/// Delivery-time facet options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryTime {
    /// available and ready to ship
    Available,
    /// 2-5 working days
    TwoToFiveDays,
    /// 7 working days
    SevenDays,
}

impl DeliveryTime {
    /// On-page label. The storefront spells the middle option "woking".
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Available => "available and ready to ship",
            Self::TwoToFiveDays => "2-5 woking days",
            Self::SevenDays => "7 working days",
        }
    }
}

macro_rules! display_label {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        })*
    };
}

display_label!(PriceRange, Rating, DeliveryTime);

/// The faceted search sidebar on category pages
#[derive(Debug, Clone)]
pub struct Filter {
    element: ElementHandle,
    /// Price facet body
    pub price_section: Locator,
    /// Rating facet body
    pub rating_section: Locator,
    /// Delivery-time facet body
    pub delivery_time_section: Locator,
    /// Availability facet body
    pub availability_section: Locator,
    /// Custom range lower bound
    pub price_min_input: Locator,
    /// Custom range upper bound
    pub price_max_input: Locator,
    /// Custom range submit
    pub price_apply_button: Locator,
    loader: Loader,
}

impl Filter {
    /// Filter rooted at `.faceted-search-container`
    #[must_use]
    pub fn new(page: &Page) -> Self {
        Self::with_root(page, FILTER_SELECTOR)
    }

    /// Filter rooted at a custom selector
    #[must_use]
    pub fn with_root(page: &Page, selector: &str) -> Self {
        let element = ElementHandle::from_selector(page, selector);
        let price_section = element.locator("#facet-body-price");
        let numbers = price_section.locator("input[type=\"number\"]");
        Self {
            rating_section: element.locator("#facet-body-rating"),
            delivery_time_section: element.locator("#facet-body-deliveryid"),
            availability_section: element.locator("#facet-body-available"),
            price_min_input: numbers.first(),
            price_max_input: numbers.last(),
            price_apply_button: price_section.locator("button[type=\"submit\"]"),
            loader: Loader::new(page),
            price_section,
            element,
        }
    }

    /// Radio button for a price range, located by its label
    #[must_use]
    pub fn price_option(&self, range: PriceRange) -> Locator {
        self.price_section.get_by_role("radio", Some(range.label()))
    }

    /// Radio button for a rating, located by position
    #[must_use]
    pub fn rating_option(&self, rating: Rating) -> Locator {
        self.rating_section
            .locator("input[type=\"radio\"]")
            .nth(rating.index())
    }

    /// Checkbox for a delivery time, located by its label
    #[must_use]
    pub fn delivery_time_option(&self, delivery: DeliveryTime) -> Locator {
        self.delivery_time_section
            .get_by_role("checkbox", Some(delivery.label()))
    }

    /// Check `option`, confirm it reads checked, then let the listing reload
    async fn check_and_confirm(&self, option: &Locator, message: String) -> ShopResult<()> {
        option.check().await?;
        expect(option).with_message(message).to_be_checked().await?;
        self.loader.wait_for_load().await
    }

    /// Select a price range; returns once the option reads checked and the
    /// listing has reloaded
    pub async fn select_price_range(&self, range: PriceRange) -> ShopResult<()> {
        info!(range = %range, "filter by price");
        self.check_and_confirm(&self.price_option(range), format!("{range} should be selected"))
            .await
    }

    /// Select a minimum rating; returns once the option reads checked and
    /// the listing has reloaded
    pub async fn select_rating(&self, rating: Rating) -> ShopResult<()> {
        info!(rating = %rating, "filter by rating");
        self.check_and_confirm(&self.rating_option(rating), format!("{rating} should be selected"))
            .await
    }

    /// Tick a delivery time; returns once the box reads checked and the
    /// listing has reloaded
    pub async fn select_delivery_time(&self, delivery: DeliveryTime) -> ShopResult<()> {
        info!(delivery = %delivery, "filter by delivery time");
        self.check_and_confirm(
            &self.delivery_time_option(delivery),
            format!("{delivery} should be checked"),
        )
        .await
    }

    /// Enter a custom price range and apply it
    pub async fn set_custom_price_range(&self, min: u32, max: u32) -> ShopResult<()> {
        if min > max {
            return Err(ShopError::assertion(format!(
                "price range minimum {min} exceeds maximum {max}"
            )));
        }
        self.price_min_input.fill(&min.to_string()).await?;
        self.price_max_input.fill(&max.to_string()).await?;
        self.price_apply_button.click().await?;
        self.loader.wait_for_load().await
    }

    /// Untick every checked delivery-time box. Returns how many were unticked.
    pub async fn clear_filters(&self) -> ShopResult<usize> {
        let checked = self
            .delivery_time_section
            .locator("input[type=\"checkbox\"]:checked");
        let initial = checked.count().await?;
        let mut cleared = 0;
        // `:checked` re-resolves after each uncheck, so always take the first
        while cleared < initial && checked.count().await? > 0 {
            checked.first().uncheck().await?;
            cleared += 1;
        }
        Ok(cleared)
    }
}

impl Component for Filter {
    fn element(&self) -> &ElementHandle {
        &self.element
    }
}
