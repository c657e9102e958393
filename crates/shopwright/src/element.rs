//! Scoped element handles and the component trait.

use crate::locator::Locator;
use crate::page::Page;
use crate::result::ShopResult;
use async_trait::async_trait;

/// A region of the page identified by a root locator.
///
/// All lookups through [`ElementHandle::locator`] are relative to the root.
#[derive(Debug, Clone)]
pub struct ElementHandle {
    root: Locator,
}

impl ElementHandle {
    /// Root the handle at a CSS selector on `page`
    #[must_use]
    pub fn from_selector(page: &Page, selector: &str) -> Self {
        Self {
            root: page.locator(selector),
        }
    }

    /// Root the handle at an existing locator (e.g. the nth row of a list)
    #[must_use]
    pub const fn from_locator(root: Locator) -> Self {
        Self { root }
    }

    /// Descendants of the root matching `selector`
    #[must_use]
    pub fn locator(&self, selector: &str) -> Locator {
        self.root.locator(selector)
    }

    /// The root locator
    #[must_use]
    pub const fn root(&self) -> &Locator {
        &self.root
    }

    /// The owning page
    #[must_use]
    pub const fn page(&self) -> &Page {
        self.root.page()
    }
}

/// A reusable piece of UI built on an [`ElementHandle`]
#[async_trait]
pub trait Component: Send + Sync {
    /// The handle this component is built on
    fn element(&self) -> &ElementHandle;

    /// Root locator
    fn root(&self) -> &Locator {
        self.element().root()
    }

    /// Whether the component's root is visible right now
    async fn is_visible(&self) -> ShopResult<bool> {
        self.root().is_visible().await
    }
}
