//! Instant-search box in the shopbar.

use crate::element::{Component, ElementHandle};
use crate::locator::Locator;
use crate::page::Page;
use crate::result::ShopResult;
use crate::wait::LoadState;
use tracing::info;

/// Root of the search box
pub const SEARCHBAR_SELECTOR: &str = ".shopbar-search";

/// The shopbar search box
#[derive(Debug, Clone)]
pub struct Searchbar {
    element: ElementHandle,
    /// Query input
    pub search_input: Locator,
    /// Submit button
    pub search_button: Locator,
    /// Enclosing form
    pub search_form: Locator,
    /// Suggestions panel
    pub search_dropdown: Locator,
    /// Suggestions body
    pub search_dropdown_body: Locator,
}

impl Searchbar {
    /// Search box rooted at `.shopbar-search`
    #[must_use]
    pub fn new(page: &Page) -> Self {
        Self::with_root(page, SEARCHBAR_SELECTOR)
    }

    /// Search box rooted at a custom selector
    #[must_use]
    pub fn with_root(page: &Page, selector: &str) -> Self {
        let element = ElementHandle::from_selector(page, selector);
        let search_dropdown = element.locator(".instasearch-drop");
        Self {
            search_input: element.locator("input.instasearch-term[name=\"q\"]"),
            search_button: element.locator("button.instasearch-button"),
            search_form: element.locator("form.instasearch-form"),
            search_dropdown_body: search_dropdown.locator(".instasearch-drop-body"),
            search_dropdown,
            element,
        }
    }

    /// Type `term` without submitting
    pub async fn type_term(&self, term: &str) -> ShopResult<()> {
        self.search_input.fill(term).await
    }

    /// Fill `term`, submit, and wait for the results page to load
    pub async fn search(&self, term: &str) -> ShopResult<()> {
        info!(term, "search");
        self.type_term(term).await?;
        self.search_button.click().await?;
        self.element
            .page()
            .wait_for_load_state(LoadState::Load)
            .await
    }
}

impl Component for Searchbar {
    fn element(&self) -> &ElementHandle {
        &self.element
    }
}
