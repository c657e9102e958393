//! Locator abstraction for element selection and interaction.
//!
//! A [`Locator`] is a [`Page`] plus an ordered [`SelectorChain`]. Building or
//! chaining locators never touches the document; the chain is resolved from
//! scratch by the driver on every async operation, so a locator held across
//! a re-render still finds the new nodes.
//!
//! # Design Philosophy
//!
//! - **Lazy**: construction is free, resolution happens per call
//! - **Auto-Waiting**: actions wait for the target to exist (and be visible)
//! - **Fluent API**: chain CSS, role, nth and filter steps
//!
//! Chains render in the familiar `>>` notation:
//!
//! ```text
//! #menu-main >> role=link[name="Sports"]
//! .cart-row >> has=(.cart-item-link >> has-text="Tennis Ball")
//! .artlist article.art >> nth=2 >> .art-price
//! ```

use crate::driver::{Action, SelectOption};
use crate::page::Page;
use crate::result::{ShopError, ShopResult};
use crate::wait::poll_until;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// One step of a selector chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Selector {
    /// CSS selector evaluated under each current match
    Css(String),
    /// ARIA role, optionally narrowed by accessible name (case-insensitive substring)
    Role {
        /// ARIA role (e.g. "link", "checkbox")
        role: String,
        /// Accessible name filter
        name: Option<String>,
    },
    /// `data-testid` attribute
    TestId(String),
    /// Keep only the nth current match; negative counts from the end
    Nth(i32),
    /// Keep current matches whose text contains the given text
    HasText(String),
    /// Keep current matches that have a descendant matching the chain
    Has(SelectorChain),
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create a role selector
    #[must_use]
    pub fn role(role: impl Into<String>, name: Option<&str>) -> Self {
        Self::Role {
            role: role.into(),
            name: name.map(str::to_string),
        }
    }

    /// Create a test ID selector
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::TestId(id.into())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(s) => write!(f, "{s}"),
            Self::Role { role, name: None } => write!(f, "role={role}"),
            Self::Role {
                role,
                name: Some(name),
            } => write!(f, "role={role}[name={name:?}]"),
            Self::TestId(id) => write!(f, "[data-testid={id:?}]"),
            Self::Nth(n) => write!(f, "nth={n}"),
            Self::HasText(text) => write!(f, "has-text={text:?}"),
            Self::Has(chain) => write!(f, "has=({chain})"),
        }
    }
}

/// Ordered selector steps, each applied to the previous step's matches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SelectorChain(Vec<Selector>);

impl SelectorChain {
    /// Chain starting with a CSS step
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self(vec![Selector::css(selector)])
    }

    /// Chain starting with a role step
    #[must_use]
    pub fn role(role: impl Into<String>, name: Option<&str>) -> Self {
        Self(vec![Selector::role(role, name)])
    }

    /// Append a step
    #[must_use]
    pub fn then(mut self, step: Selector) -> Self {
        self.0.push(step);
        self
    }

    /// Narrow the last step to matches containing `text`
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.then(Selector::HasText(text.into()))
    }

    /// The steps in order
    #[must_use]
    pub fn steps(&self) -> &[Selector] {
        &self.0
    }

    /// Whether the chain has no steps
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SelectorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " >> ")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

/// Element states a locator can wait for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementState {
    /// At least one match exists
    Attached,
    /// No match exists
    Detached,
    /// The first match is visible
    Visible,
    /// Nothing visible matches
    Hidden,
}

impl fmt::Display for ElementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Attached => "attached",
            Self::Detached => "detached",
            Self::Visible => "visible",
            Self::Hidden => "hidden",
        };
        write!(f, "{name}")
    }
}

/// A lazy reference to zero or more elements on a [`Page`]
#[derive(Debug, Clone)]
pub struct Locator {
    page: Page,
    chain: SelectorChain,
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.chain)
    }
}

impl Locator {
    /// Bind a chain to a page
    #[must_use]
    pub fn new(page: Page, chain: SelectorChain) -> Self {
        Self { page, chain }
    }

    fn then(&self, step: Selector) -> Self {
        Self {
            page: self.page.clone(),
            chain: self.chain.clone().then(step),
        }
    }

    /// Descendants matching a CSS selector
    #[must_use]
    pub fn locator(&self, selector: &str) -> Self {
        self.then(Selector::css(selector))
    }

    /// Descendants with an ARIA role and optional accessible name
    #[must_use]
    pub fn get_by_role(&self, role: &str, name: Option<&str>) -> Self {
        self.then(Selector::role(role, name))
    }

    /// Descendants with a `data-testid`
    #[must_use]
    pub fn get_by_test_id(&self, id: &str) -> Self {
        self.then(Selector::test_id(id))
    }

    /// The nth match (zero-based)
    #[must_use]
    pub fn nth(&self, index: usize) -> Self {
        self.then(Selector::Nth(index as i32))
    }

    /// The first match
    #[must_use]
    pub fn first(&self) -> Self {
        self.nth(0)
    }

    /// The last match
    #[must_use]
    pub fn last(&self) -> Self {
        self.then(Selector::Nth(-1))
    }

    /// Matches whose text contains `text`
    #[must_use]
    pub fn filter_has_text(&self, text: &str) -> Self {
        self.then(Selector::HasText(text.to_string()))
    }

    /// Matches with a descendant matching `inner`
    #[must_use]
    pub fn filter_has(&self, inner: SelectorChain) -> Self {
        self.then(Selector::Has(inner))
    }

    /// The page this locator resolves against
    #[must_use]
    pub const fn page(&self) -> &Page {
        &self.page
    }

    /// The selector chain
    #[must_use]
    pub const fn chain(&self) -> &SelectorChain {
        &self.chain
    }

    /// The rendered selector chain
    #[must_use]
    pub fn selector(&self) -> String {
        self.chain.to_string()
    }

    // =========================================================================
    // Queries (resolve immediately, never wait)
    // =========================================================================

    /// Number of current matches
    pub async fn count(&self) -> ShopResult<usize> {
        self.page.driver().count(&self.chain).await
    }

    /// Whether the first match is visible
    pub async fn is_visible(&self) -> ShopResult<bool> {
        self.page.driver().is_visible(&self.chain).await
    }

    /// One locator per current match, in document order
    pub async fn all(&self) -> ShopResult<Vec<Self>> {
        let count = self.count().await?;
        Ok((0..count).map(|i| self.nth(i)).collect())
    }

    // =========================================================================
    // Reads (wait for the element to be attached)
    // =========================================================================

    /// Text content of the first match
    pub async fn text_content(&self) -> ShopResult<String> {
        self.wait_for(ElementState::Attached).await?;
        Ok(self
            .page
            .driver()
            .text_content(&self.chain)
            .await?
            .unwrap_or_default())
    }

    /// Value of the first matching input
    pub async fn input_value(&self) -> ShopResult<String> {
        self.wait_for(ElementState::Attached).await?;
        self.page.driver().input_value(&self.chain).await
    }

    /// Attribute of the first match
    pub async fn get_attribute(&self, name: &str) -> ShopResult<Option<String>> {
        self.wait_for(ElementState::Attached).await?;
        self.page.driver().attribute(&self.chain, name).await
    }

    /// Whether the first match is checked
    pub async fn is_checked(&self) -> ShopResult<bool> {
        self.wait_for(ElementState::Attached).await?;
        self.page.driver().is_checked(&self.chain).await
    }

    // =========================================================================
    // Actions (auto-wait for actionability)
    // =========================================================================

    /// Click the first match
    pub async fn click(&self) -> ShopResult<()> {
        self.perform(Action::Click { force: false }).await
    }

    /// Click without waiting for visibility
    pub async fn click_forced(&self) -> ShopResult<()> {
        self.perform(Action::Click { force: true }).await
    }

    /// Hover over the first match
    pub async fn hover(&self) -> ShopResult<()> {
        self.perform(Action::Hover).await
    }

    /// Replace the first match's value
    pub async fn fill(&self, text: &str) -> ShopResult<()> {
        self.perform(Action::Fill(text.to_string())).await
    }

    /// Check a checkbox or radio
    pub async fn check(&self) -> ShopResult<()> {
        self.perform(Action::Check).await
    }

    /// Uncheck a checkbox
    pub async fn uncheck(&self) -> ShopResult<()> {
        self.perform(Action::Uncheck).await
    }

    /// Remove focus
    pub async fn blur(&self) -> ShopResult<()> {
        self.perform(Action::Blur).await
    }

    /// Pick an option of a `<select>` by label
    pub async fn select_option(&self, label: &str) -> ShopResult<()> {
        self.perform(Action::SelectOption(SelectOption::Label(label.to_string())))
            .await
    }

    /// Pick an option of a `<select>` by its `value` attribute
    pub async fn select_option_value(&self, value: &str) -> ShopResult<()> {
        self.perform(Action::SelectOption(SelectOption::Value(value.to_string())))
            .await
    }

    async fn perform(&self, action: Action) -> ShopResult<()> {
        let state = if action.requires_visible() {
            ElementState::Visible
        } else {
            ElementState::Attached
        };
        self.wait_for(state).await?;
        debug!(selector = %self.chain, action = action.name(), "perform");
        self.page.driver().perform(&self.chain, &action).await
    }

    /// Wait until the locator reaches `state`.
    ///
    /// Waiting for `Attached` or `Visible` on a locator that never matches
    /// fails with [`ShopError::NotFound`]; every other unmet state fails
    /// with [`ShopError::Timeout`].
    pub async fn wait_for(&self, state: ElementState) -> ShopResult<()> {
        let driver = self.page.driver();
        let chain = &self.chain;
        let waited_for = format!("{chain} to be {state}");
        let result = poll_until(&waited_for, self.page.config().timeouts.expect(), || async move {
            Ok(match state {
                ElementState::Attached => driver.count(chain).await? > 0,
                ElementState::Detached => driver.count(chain).await? == 0,
                ElementState::Visible => driver.is_visible(chain).await?,
                ElementState::Hidden => !driver.is_visible(chain).await?,
            })
        })
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) if err.is_timeout() && matches!(state, ElementState::Attached | ElementState::Visible) => {
                if driver.count(chain).await? == 0 {
                    Err(ShopError::NotFound {
                        selector: chain.to_string(),
                    })
                } else {
                    Err(err)
                }
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::config::{SuiteConfig, Timeouts};
    use crate::mock::{MockDriver, MockElement};
    use std::sync::Arc;

    fn fast_page(mock: &Arc<MockDriver>) -> Page {
        let timeouts = Timeouts {
            expect_ms: 50,
            poll_ms: 5,
            ..Timeouts::default()
        };
        Page::new(mock.clone(), SuiteConfig::new().with_timeouts(timeouts))
    }

    mod selector_tests {
        use super::*;

        #[test]
        fn test_css_display() {
            assert_eq!(Selector::css("#cart").to_string(), "#cart");
        }

        #[test]
        fn test_role_display() {
            assert_eq!(Selector::role("link", None).to_string(), "role=link");
            assert_eq!(
                Selector::role("link", Some("Sports")).to_string(),
                "role=link[name=\"Sports\"]"
            );
        }

        #[test]
        fn test_filters_display() {
            assert_eq!(Selector::test_id("cart").to_string(), "[data-testid=\"cart\"]");
            assert_eq!(Selector::Nth(-1).to_string(), "nth=-1");
            assert_eq!(
                Selector::HasText("Tennis".into()).to_string(),
                "has-text=\"Tennis\""
            );
        }

        #[test]
        fn test_has_nests_chain() {
            let inner = SelectorChain::css("a.name").with_text("Ball");
            assert_eq!(
                Selector::Has(inner).to_string(),
                "has=(a.name >> has-text=\"Ball\")"
            );
        }

        #[test]
        fn test_serializes_for_script_handoff() {
            let chain = SelectorChain::css(".row").then(Selector::Nth(2));
            let json = serde_json::to_string(&chain).unwrap();
            assert_eq!(
                json,
                r#"[{"kind":"css","value":".row"},{"kind":"nth","value":2}]"#
            );
        }
    }

    mod chain_tests {
        use super::*;

        #[test]
        fn test_locator_chaining_is_lazy() {
            let mock = Arc::new(MockDriver::new());
            let page = fast_page(&mock);
            let rows = page.locator(".cart-row");
            let name = rows.nth(1).locator(".cart-item-link");
            assert_eq!(name.selector(), ".cart-row >> nth=1 >> .cart-item-link");
            assert_eq!(rows.selector(), ".cart-row");
            assert!(mock.call_history().is_empty());
        }

        #[test]
        fn test_first_last() {
            let mock = Arc::new(MockDriver::new());
            let page = fast_page(&mock);
            let rows = page.locator("li");
            assert_eq!(rows.first().selector(), "li >> nth=0");
            assert_eq!(rows.last().selector(), "li >> nth=-1");
        }

        #[test]
        fn test_page_is_recoverable() {
            let mock = Arc::new(MockDriver::new());
            let page = fast_page(&mock);
            let loc = page.locator("#x").locator(".y");
            assert_eq!(loc.page().id(), page.id());
        }
    }

    mod action_tests {
        use super::*;

        #[tokio::test]
        async fn test_click_missing_element_is_not_found() {
            let mock = Arc::new(MockDriver::new());
            let page = fast_page(&mock);
            let err = page.locator("#nope").click().await.unwrap_err();
            assert!(matches!(err, ShopError::NotFound { ref selector } if selector == "#nope"));
        }

        #[tokio::test]
        async fn test_click_hidden_element_times_out() {
            let mock = Arc::new(MockDriver::new());
            mock.set("#btn", MockElement::new().hidden());
            let page = fast_page(&mock);
            let err = page.locator("#btn").click().await.unwrap_err();
            assert!(err.is_timeout());
        }

        #[tokio::test]
        async fn test_forced_click_ignores_visibility() {
            let mock = Arc::new(MockDriver::new());
            mock.set("#btn", MockElement::new().hidden());
            let page = fast_page(&mock);
            page.locator("#btn").click_forced().await.unwrap();
            assert!(mock.was_performed("#btn", "click"));
        }

        #[tokio::test]
        async fn test_fill_then_read_value() {
            let mock = Arc::new(MockDriver::new());
            mock.set("#q", MockElement::new());
            let page = fast_page(&mock);
            let input = page.locator("#q");
            input.fill("ball").await.unwrap();
            assert_eq!(input.input_value().await.unwrap(), "ball");
        }

        #[tokio::test]
        async fn test_all_expands_to_nth() {
            let mock = Arc::new(MockDriver::new());
            mock.set("li", MockElement::new().with_count(3));
            let page = fast_page(&mock);
            let all = page.locator("li").all().await.unwrap();
            assert_eq!(all.len(), 3);
            assert_eq!(all[2].selector(), "li >> nth=2");
        }

        #[tokio::test]
        async fn test_wait_for_detached() {
            let mock = Arc::new(MockDriver::new());
            let page = fast_page(&mock);
            page.locator(".gone").wait_for(ElementState::Detached).await.unwrap();
            page.locator(".gone").wait_for(ElementState::Hidden).await.unwrap();
        }
    }
}
