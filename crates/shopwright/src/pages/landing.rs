use crate::components::{Menu, Searchbar};
use crate::locator::Locator;
use crate::page::Page;
use crate::page_object::{PageHandle, PageObject};
use crate::result::ShopResult;

/// The storefront home page (`/`)
#[derive(Debug, Clone)]
pub struct LandingPage {
    handle: PageHandle,
    /// Site header
    pub menu: Menu,
    /// Shopbar search
    pub searchbar: Searchbar,
    /// Hero call to action
    pub meet_triplake_button: Locator,
}

impl LandingPage {
    /// Route of the home page
    pub const URL: &'static str = "/";

    /// Landing page bound to `page`
    #[must_use]
    pub fn new(page: &Page) -> Self {
        let handle = PageHandle::new(page, Self::URL);
        Self {
            meet_triplake_button: handle.get_by_role("link", Some("Meet Triplake")),
            menu: Menu::new(page),
            searchbar: Searchbar::new(page),
            handle,
        }
    }

    /// Follow the hero call to action
    pub async fn meet_triplake(&self) -> ShopResult<()> {
        self.meet_triplake_button.click().await
    }
}

impl PageObject for LandingPage {
    fn handle(&self) -> &PageHandle {
        &self.handle
    }

    fn page_name(&self) -> &str {
        "LandingPage"
    }
}
