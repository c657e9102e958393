//! Chips for the filters currently applied to a product listing.

use crate::assertion::expect;
use crate::element::{Component, ElementHandle};
use crate::locator::Locator;
use crate::page::Page;
use crate::result::{ShopError, ShopResult};

/// Root of the active filter bar
pub const ACTIVE_FILTERS_SELECTOR: &str = ".active-filters-container";

/// The active filter bar above the product grid
#[derive(Debug, Clone)]
pub struct ActiveFilters {
    element: ElementHandle,
    /// Chip list
    pub filters_list: Locator,
    /// One match per applied filter, excluding the clear-all chip
    pub filter_items: Locator,
    /// "Remove all" link
    pub remove_all_button: Locator,
}

impl ActiveFilters {
    /// Bar rooted at `.active-filters-container`
    #[must_use]
    pub fn new(page: &Page) -> Self {
        Self::with_root(page, ACTIVE_FILTERS_SELECTOR)
    }

    /// Bar rooted at a custom selector
    #[must_use]
    pub fn with_root(page: &Page, selector: &str) -> Self {
        let element = ElementHandle::from_selector(page, selector);
        let filters_list = element.locator("ul.active-filters");
        Self {
            filter_items: filters_list
                .locator("li.active-filter-item:not(.active-filter-item-clear)"),
            remove_all_button: filters_list.locator(".active-filter-item-clear a"),
            filters_list,
            element,
        }
    }

    /// Number of applied filters
    pub async fn count(&self) -> ShopResult<usize> {
        self.filter_items.count().await
    }

    /// Whether any filter is applied
    pub async fn has_active_filters(&self) -> ShopResult<bool> {
        Ok(self.count().await? > 0)
    }

    /// Trimmed labels of the applied filters, in page order
    pub async fn labels(&self) -> ShopResult<Vec<String>> {
        let mut labels = Vec::new();
        for item in self.filter_items.all().await? {
            let label = item.locator(".active-filter-label").text_content().await?;
            let label = label.trim();
            if !label.is_empty() {
                labels.push(label.to_string());
            }
        }
        Ok(labels)
    }

    /// Click "remove all" and wait until no chip remains
    pub async fn remove_all(&self) -> ShopResult<()> {
        self.remove_all_button.click().await?;
        expect(&self.filter_items)
            .with_message("All filters should be removed")
            .to_have_count(0)
            .await
    }

    /// A chip labelled `label` is present
    pub async fn assert_active(&self, label: &str) -> ShopResult<()> {
        let labels = self.labels().await?;
        if labels.iter().any(|l| l == label) {
            Ok(())
        } else {
            Err(ShopError::assertion(format!(
                "Expected filter \"{label}\" to be active, found {labels:?}"
            )))
        }
    }

    /// Exactly `expected` chips are present
    pub async fn assert_count(&self, expected: usize) -> ShopResult<()> {
        let actual = self.count().await?;
        if actual == expected {
            Ok(())
        } else {
            Err(ShopError::assertion(format!(
                "Expected {expected} active filters, found {actual}"
            )))
        }
    }
}

impl Component for ActiveFilters {
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

    fn setup() -> (Arc<MockDriver>, ActiveFilters) {
        let mock = Arc::new(MockDriver::new());
        let timeouts = Timeouts {
            expect_ms: 40,
            poll_ms: 2,
            ..Timeouts::default()
        };
        let page = Page::new(mock.clone(), SuiteConfig::new().with_timeouts(timeouts));
        (mock, ActiveFilters::new(&page))
    }

    fn chips(mock: &MockDriver, bar: &ActiveFilters, labels: &[&str]) {
        mock.set(&bar.filter_items, MockElement::new().with_count(labels.len()));
        for (i, label) in labels.iter().enumerate() {
            mock.set(
                bar.filter_items.nth(i).locator(".active-filter-label"),
                MockElement::with_text(format!("  {label} ")),
            );
        }
    }

    #[tokio::test]
    async fn test_labels_are_trimmed() {
        let (mock, bar) = setup();
        chips(&mock, &bar, &["up to $50.00", "4 stars & more"]);
        assert_eq!(bar.labels().await.unwrap(), vec!["up to $50.00", "4 stars & more"]);
        assert_eq!(bar.count().await.unwrap(), 2);
        bar.assert_active("4 stars & more").await.unwrap();
        bar.assert_count(2).await.unwrap();
    }

    #[tokio::test]
    async fn test_assertions_fail_with_context() {
        let (mock, bar) = setup();
        chips(&mock, &bar, &["up to $50.00"]);
        let err = bar.assert_active("up to $10.00").await.unwrap_err();
        assert!(err.to_string().contains("up to $10.00"));
        assert!(bar.assert_count(3).await.is_err());
    }

    #[tokio::test]
    async fn test_remove_all_waits_for_empty_bar() {
        let (mock, bar) = setup();
        chips(&mock, &bar, &["up to $50.00"]);
        mock.set(&bar.remove_all_button, MockElement::new());
        let items = bar.filter_items.selector();
        mock.on_action(&bar.remove_all_button, move |dom| {
            let _ = dom.remove(&items);
        });
        bar.remove_all().await.unwrap();
        assert!(!bar.has_active_filters().await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_all_reports_leftover_chips() {
        let (mock, bar) = setup();
        chips(&mock, &bar, &["up to $50.00"]);
        mock.set(&bar.remove_all_button, MockElement::new());
        let err = bar.remove_all().await.unwrap_err();
        assert!(err.to_string().starts_with("All filters should be removed"));
    }
}
