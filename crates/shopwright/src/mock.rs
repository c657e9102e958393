//! Scriptable in-memory driver.
//!
//! [`MockDriver`] answers every [`Driver`] query from a table keyed by the
//! rendered selector chain, so a test registers exactly the locators its
//! page objects will ask for:
//!
//! ```ignore
//! let mock = Arc::new(MockDriver::new());
//! mock.set(cart.subtotal(), MockElement::with_text("$2.10 excl tax"));
//! mock.on_action(cart.checkout_button(), |dom| dom.set_url("https://shop.test/login"));
//! ```
//!
//! Hooks registered with [`MockDriver::on_action`] run after an action has
//! been applied and may rewrite the document, which is how tests script
//! server round-trips (loader spins, totals change, rows disappear).

use crate::driver::{Action, Driver, SelectOption};
use crate::loader::LOADER_SELECTOR;
use crate::locator::SelectorChain;
use crate::result::{ShopError, ShopResult};
use crate::wait::LoadState;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// A fake element (or group of identical elements)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockElement {
    /// Number of matches
    pub count: usize,
    /// Text content
    pub text: String,
    /// Input value
    pub value: String,
    /// Visibility
    pub visible: bool,
    /// Checked state
    pub checked: bool,
    /// Attributes
    pub attributes: HashMap<String, String>,
    /// When set, the element reads visible for this many more visibility
    /// queries and then turns hidden
    pub visible_polls: Option<u32>,
}

impl Default for MockElement {
    fn default() -> Self {
        Self {
            count: 1,
            text: String::new(),
            value: String::new(),
            visible: true,
            checked: false,
            attributes: HashMap::new(),
            visible_polls: None,
        }
    }
}

impl MockElement {
    /// A single visible element
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A single visible element with text
    #[must_use]
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// A single visible input with a value
    #[must_use]
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    /// Set the number of matches
    #[must_use]
    pub const fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Mark hidden
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Set the checked state
    #[must_use]
    pub const fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    /// Add an attribute
    #[must_use]
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        let _ = self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    /// Visible for `polls` visibility queries, hidden afterwards
    #[must_use]
    pub const fn visible_for(mut self, polls: u32) -> Self {
        self.visible = true;
        self.visible_polls = Some(polls);
        self
    }
}

/// The mutable fake document handed to hooks
#[derive(Default)]
pub struct MockDom {
    elements: HashMap<String, MockElement>,
    failures: HashMap<String, String>,
    pending: HashMap<String, Vec<Hook>>,
    url: String,
    title: String,
}

impl fmt::Debug for MockDom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockDom")
            .field("url", &self.url)
            .field("title", &self.title)
            .field("elements", &self.elements.len())
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl MockDom {
    /// Register or replace an element
    pub fn set(&mut self, selector: impl fmt::Display, element: MockElement) {
        let _ = self.elements.insert(selector.to_string(), element);
    }

    /// Remove an element
    pub fn remove(&mut self, selector: impl fmt::Display) -> Option<MockElement> {
        self.elements.remove(&selector.to_string())
    }

    /// Look up an element
    #[must_use]
    pub fn get(&self, selector: impl fmt::Display) -> Option<&MockElement> {
        self.elements.get(&selector.to_string())
    }

    /// Look up an element mutably
    pub fn get_mut(&mut self, selector: impl fmt::Display) -> Option<&mut MockElement> {
        self.elements.get_mut(&selector.to_string())
    }

    /// Replace the text of a registered element, registering it if absent
    pub fn set_text(&mut self, selector: impl fmt::Display, text: impl Into<String>) {
        self.elements.entry(selector.to_string()).or_default().text = text.into();
    }

    /// Current URL
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Change the current URL
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    /// Change the document title
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Show `selector` for `polls` visibility queries, then apply `hook` on
    /// the query that first reads it hidden.
    ///
    /// Models a server round-trip: the document only changes once the busy
    /// indicator has been observed to clear.
    pub fn busy<F>(&mut self, selector: impl fmt::Display, polls: u32, hook: F)
    where
        F: Fn(&mut MockDom) + Send + Sync + 'static,
    {
        let key = selector.to_string();
        let _ = self
            .elements
            .insert(key.clone(), MockElement::new().visible_for(polls));
        self.pending.entry(key).or_default().push(Arc::new(hook));
    }

    /// Whether a [`busy`](Self::busy) mutation is still waiting
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.values().any(|hooks| !hooks.is_empty())
    }

    fn check_failure(&self, key: &str) -> ShopResult<()> {
        match self.failures.get(key) {
            Some(message) => Err(ShopError::driver(message.clone())),
            None => Ok(()),
        }
    }

    fn element(&self, key: &str) -> ShopResult<Option<&MockElement>> {
        self.check_failure(key)?;
        Ok(self.elements.get(key).filter(|e| e.count > 0))
    }
}

type Hook = Arc<dyn Fn(&mut MockDom) + Send + Sync>;

#[derive(Default)]
struct MockState {
    dom: MockDom,
    action_hooks: HashMap<String, Vec<Hook>>,
    key_hooks: HashMap<String, Vec<Hook>>,
    navigate_hooks: Vec<Hook>,
    call_history: Vec<String>,
}

/// Mock driver for unit and workflow tests
#[derive(Default)]
pub struct MockDriver {
    state: Mutex<MockState>,
}

impl fmt::Debug for MockDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("MockDriver")
            .field("url", &state.dom.url)
            .field("elements", &state.dom.elements.len())
            .field("calls", &state.call_history.len())
            .finish()
    }
}

impl MockDriver {
    /// Create an empty document at `about:blank`
    #[must_use]
    pub fn new() -> Self {
        let driver = Self::default();
        driver.lock().dom.url = "about:blank".to_string();
        driver
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register or replace an element
    pub fn set(&self, selector: impl fmt::Display, element: MockElement) {
        self.lock().dom.set(selector, element);
    }

    /// Remove an element
    pub fn remove(&self, selector: impl fmt::Display) {
        let _ = self.lock().dom.remove(selector);
    }

    /// Make every query on `selector` fail with a driver error
    pub fn fail(&self, selector: impl fmt::Display, message: &str) {
        let _ = self
            .lock()
            .dom
            .failures
            .insert(selector.to_string(), message.to_string());
    }

    /// Set the current URL
    pub fn set_url(&self, url: &str) {
        self.lock().dom.url = url.to_string();
    }

    /// Set the document title
    pub fn set_title(&self, title: &str) {
        self.lock().dom.title = title.to_string();
    }

    /// Run `hook` after any action on `selector`
    pub fn on_action<F>(&self, selector: impl fmt::Display, hook: F)
    where
        F: Fn(&mut MockDom) + Send + Sync + 'static,
    {
        self.lock()
            .action_hooks
            .entry(selector.to_string())
            .or_default()
            .push(Arc::new(hook));
    }

    /// After any action on `selector`, show the loader for `polls`
    /// visibility queries and apply `hook` once it has been seen hidden
    pub fn on_round_trip<F>(&self, selector: impl fmt::Display, polls: u32, hook: F)
    where
        F: Fn(&mut MockDom) + Send + Sync + 'static,
    {
        let hook: Hook = Arc::new(hook);
        self.on_action(selector, move |dom| {
            let hook = Arc::clone(&hook);
            dom.busy(LOADER_SELECTOR, polls, move |dom| hook(dom));
        });
    }

    /// Run `hook` after `key` is pressed
    pub fn on_key<F>(&self, key: &str, hook: F)
    where
        F: Fn(&mut MockDom) + Send + Sync + 'static,
    {
        self.lock()
            .key_hooks
            .entry(key.to_string())
            .or_default()
            .push(Arc::new(hook));
    }

    /// Run `hook` after every navigation
    pub fn on_navigate<F>(&self, hook: F)
    where
        F: Fn(&mut MockDom) + Send + Sync + 'static,
    {
        self.lock().navigate_hooks.push(Arc::new(hook));
    }

    /// Inspect the document
    pub fn with_dom<R>(&self, f: impl FnOnce(&MockDom) -> R) -> R {
        f(&self.lock().dom)
    }

    /// Get call history (`"method:target"` entries)
    #[must_use]
    pub fn call_history(&self) -> Vec<String> {
        self.lock().call_history.clone()
    }

    /// Check if a method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.lock()
            .call_history
            .iter()
            .any(|c| c.starts_with(method))
    }

    /// Number of times `action` was performed on `selector`
    #[must_use]
    pub fn performed_count(&self, selector: impl fmt::Display, action: &str) -> usize {
        let entry = format!("{action}:{selector}");
        self.lock()
            .call_history
            .iter()
            .filter(|c| **c == entry)
            .count()
    }

    /// Whether `action` was performed on `selector` at least once
    #[must_use]
    pub fn was_performed(&self, selector: impl fmt::Display, action: &str) -> bool {
        self.performed_count(selector, action) > 0
    }

    /// Forget recorded calls
    pub fn clear_history(&self) {
        self.lock().call_history.clear();
    }

    fn record(state: &mut MockState, entry: String) {
        state.call_history.push(entry);
    }

    fn run_hooks(state: &mut MockState, hooks: Vec<Hook>) {
        for hook in hooks {
            hook(&mut state.dom);
        }
    }
}

#[async_trait]
impl Driver for MockDriver {
    async fn goto(&self, url: &str, _wait_until: LoadState, _timeout: Duration) -> ShopResult<()> {
        let mut state = self.lock();
        Self::record(&mut state, format!("goto:{url}"));
        state.dom.url = url.to_string();
        let hooks = state.navigate_hooks.clone();
        Self::run_hooks(&mut state, hooks);
        Ok(())
    }

    async fn wait_for_load_state(&self, state: LoadState, _timeout: Duration) -> ShopResult<()> {
        Self::record(&mut self.lock(), format!("wait_for_load_state:{state}"));
        Ok(())
    }

    async fn current_url(&self) -> ShopResult<String> {
        Ok(self.lock().dom.url.clone())
    }

    async fn title(&self) -> ShopResult<String> {
        Ok(self.lock().dom.title.clone())
    }

    async fn press_key(&self, key: &str) -> ShopResult<()> {
        let mut state = self.lock();
        Self::record(&mut state, format!("press:{key}"));
        let hooks = state.key_hooks.get(key).cloned().unwrap_or_default();
        Self::run_hooks(&mut state, hooks);
        Ok(())
    }

    async fn count(&self, chain: &SelectorChain) -> ShopResult<usize> {
        let state = self.lock();
        Ok(state
            .dom
            .element(&chain.to_string())?
            .map_or(0, |e| e.count))
    }

    async fn text_content(&self, chain: &SelectorChain) -> ShopResult<Option<String>> {
        let state = self.lock();
        Ok(state
            .dom
            .element(&chain.to_string())?
            .map(|e| e.text.clone()))
    }

    async fn input_value(&self, chain: &SelectorChain) -> ShopResult<String> {
        let key = chain.to_string();
        let state = self.lock();
        state
            .dom
            .element(&key)?
            .map(|e| e.value.clone())
            .ok_or(ShopError::NotFound { selector: key })
    }

    async fn attribute(&self, chain: &SelectorChain, name: &str) -> ShopResult<Option<String>> {
        let state = self.lock();
        Ok(state
            .dom
            .element(&chain.to_string())?
            .and_then(|e| e.attributes.get(name).cloned()))
    }

    async fn is_visible(&self, chain: &SelectorChain) -> ShopResult<bool> {
        let key = chain.to_string();
        let mut state = self.lock();
        state.dom.check_failure(&key)?;
        let Some(element) = state.dom.elements.get_mut(&key).filter(|e| e.count > 0) else {
            return Ok(false);
        };
        let mut cleared = false;
        match element.visible_polls {
            Some(0) => {
                element.visible = false;
                element.visible_polls = None;
                cleared = true;
            }
            Some(n) => element.visible_polls = Some(n - 1),
            None => {}
        }
        let visible = element.visible;
        if cleared {
            let hooks = state.dom.pending.remove(&key).unwrap_or_default();
            Self::run_hooks(&mut state, hooks);
        }
        Ok(visible)
    }

    async fn is_checked(&self, chain: &SelectorChain) -> ShopResult<bool> {
        let state = self.lock();
        Ok(state
            .dom
            .element(&chain.to_string())?
            .is_some_and(|e| e.checked))
    }

    async fn perform(&self, chain: &SelectorChain, action: &Action) -> ShopResult<()> {
        let key = chain.to_string();
        let mut state = self.lock();
        Self::record(&mut state, format!("{}:{key}", action.name()));
        state.dom.check_failure(&key)?;
        let Some(element) = state.dom.elements.get_mut(&key).filter(|e| e.count > 0) else {
            return Err(ShopError::NotFound { selector: key });
        };
        match action {
            Action::Fill(text) => element.value.clone_from(text),
            Action::Check => element.checked = true,
            Action::Uncheck => element.checked = false,
            Action::SelectOption(SelectOption::Label(v) | SelectOption::Value(v)) => {
                element.value.clone_from(v);
            }
            Action::Click { .. } | Action::Hover | Action::Blur => {}
        }
        let hooks = state.action_hooks.get(&key).cloned().unwrap_or_default();
        Self::run_hooks(&mut state, hooks);
        Ok(())
    }
}
