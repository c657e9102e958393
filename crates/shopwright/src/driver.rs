//! Driver - abstract browser-automation engine.
//!
//! Everything that touches a live document goes through [`Driver`]. Locators,
//! element handles and page objects never talk to a browser directly, which
//! lets the same page objects run on Chromium (feature `browser`) or on the
//! scriptable [`MockDriver`](crate::MockDriver).
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ Page Object  │──►│  Component   │──►│   Locator    │──►│    Driver    │
//! │ (CartPage)   │   │ (CartItem)   │   │ (lazy chain) │   │ (CDP / mock) │
//! └──────────────┘   └──────────────┘   └──────────────┘   └──────────────┘
//! ```

use crate::locator::SelectorChain;
use crate::result::ShopResult;
use crate::wait::LoadState;
use async_trait::async_trait;
use std::time::Duration;

/// How to pick an `<option>` in a `<select>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOption {
    /// Match the option's visible label
    Label(String),
    /// Match the option's `value` attribute
    Value(String),
}

/// Interactions that can be performed on a located element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Click the element. `force` skips the visibility check.
    Click {
        /// Skip actionability checks
        force: bool,
    },
    /// Move the pointer over the element
    Hover,
    /// Replace the element's value with text
    Fill(String),
    /// Check a checkbox or radio button
    Check,
    /// Uncheck a checkbox
    Uncheck,
    /// Remove focus from the element
    Blur,
    /// Select an option in a `<select>`
    SelectOption(SelectOption),
}

impl Action {
    /// Short name for logging
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Click { .. } => "click",
            Self::Hover => "hover",
            Self::Fill(_) => "fill",
            Self::Check => "check",
            Self::Uncheck => "uncheck",
            Self::Blur => "blur",
            Self::SelectOption(_) => "select_option",
        }
    }

    /// Whether the target must be visible before the action runs
    #[must_use]
    pub const fn requires_visible(&self) -> bool {
        match self {
            Self::Click { force } => !*force,
            Self::Blur => false,
            _ => true,
        }
    }
}

/// Abstract driver for one browser tab.
///
/// Queries take the full selector chain and resolve it against the live
/// document on every call; implementations must not cache resolved nodes.
/// Single-element queries (`text_content`, `input_value`, ...) read the
/// first match.
#[async_trait]
pub trait Driver: Send + Sync + std::fmt::Debug {
    /// Load `url` and wait until `wait_until` is reached
    async fn goto(&self, url: &str, wait_until: LoadState, timeout: Duration) -> ShopResult<()>;

    /// Wait for the current document to reach a load state without navigating
    async fn wait_for_load_state(&self, state: LoadState, timeout: Duration) -> ShopResult<()>;

    /// Current document URL
    async fn current_url(&self) -> ShopResult<String>;

    /// Current document title
    async fn title(&self) -> ShopResult<String>;

    /// Press a key on the page keyboard (e.g. "Escape")
    async fn press_key(&self, key: &str) -> ShopResult<()>;

    /// Number of elements matching the chain
    async fn count(&self, chain: &SelectorChain) -> ShopResult<usize>;

    /// Text content of the first match, `None` when nothing matches
    async fn text_content(&self, chain: &SelectorChain) -> ShopResult<Option<String>>;

    /// Value of the first matching input
    async fn input_value(&self, chain: &SelectorChain) -> ShopResult<String>;

    /// Attribute of the first match
    async fn attribute(&self, chain: &SelectorChain, name: &str) -> ShopResult<Option<String>>;

    /// Whether the first match is rendered and visible; `false` when nothing matches
    async fn is_visible(&self, chain: &SelectorChain) -> ShopResult<bool>;

    /// Whether the first match is checked
    async fn is_checked(&self, chain: &SelectorChain) -> ShopResult<bool>;

    /// Perform an interaction on the first match
    async fn perform(&self, chain: &SelectorChain, action: &Action) -> ShopResult<()>;
}
