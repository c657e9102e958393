//! Chromium driver over the Chrome DevTools Protocol.
//!
//! Selector chains are serialized to JSON and resolved inside the page by a
//! small script, so resolution always runs against the live document.
//! Pointer actions go through `Input.dispatchMouseEvent` at the element's
//! centre; forced clicks call `element.click()` directly.

#![allow(
    clippy::significant_drop_tightening,
    clippy::items_after_statements,
    clippy::missing_errors_doc
)]

use crate::config::SuiteConfig;
use crate::driver::{Action, Driver, SelectOption};
use crate::locator::SelectorChain;
use crate::result::{ShopError, ShopResult};
use crate::wait::LoadState;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::input::{
    DispatchKeyEventParams, DispatchKeyEventType, DispatchMouseEventParams,
    DispatchMouseEventType, MouseButton,
};
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Resolves a serialized [`SelectorChain`] to an array of elements.
const RESOLVER: &str = r#"
(chain) => {
  const ROLES = {
    link: 'a[href], [role="link"]',
    button: 'button, input[type="button"], input[type="submit"], [role="button"]',
    radio: 'input[type="radio"], [role="radio"]',
    checkbox: 'input[type="checkbox"], [role="checkbox"]',
    textbox: 'input:not([type]), input[type="text"], input[type="email"], input[type="password"], textarea, [role="textbox"]',
    heading: 'h1, h2, h3, h4, h5, h6, [role="heading"]',
    listitem: 'li, [role="listitem"]',
    combobox: 'select, [role="combobox"]',
  };
  const norm = (s) => (s || '').replace(/\s+/g, ' ').trim().toLowerCase();
  const nameOf = (el) => {
    const aria = el.getAttribute('aria-label');
    if (aria) return aria;
    const by = el.getAttribute('aria-labelledby');
    if (by) {
      const ref = document.getElementById(by);
      if (ref) return ref.textContent;
    }
    if (el.id) {
      const label = document.querySelector(`label[for="${CSS.escape(el.id)}"]`);
      if (label) return label.textContent;
    }
    const wrapping = el.closest('label');
    if (wrapping) return wrapping.textContent;
    return el.textContent || el.value || el.getAttribute('title') || '';
  };
  const unique = (els) => Array.from(new Set(els));
  const under = (roots, css) =>
    unique(roots.flatMap((root) => Array.from(root.querySelectorAll(css))));
  const resolve = (roots, steps) => {
    let current = roots;
    for (const step of steps) {
      switch (step.kind) {
        case 'css':
          current = under(current, step.value);
          break;
        case 'role': {
          const css = ROLES[step.value.role] || `[role="${step.value.role}"]`;
          current = under(current, css);
          if (step.value.name != null) {
            const wanted = norm(step.value.name);
            current = current.filter((el) => norm(nameOf(el)).includes(wanted));
          }
          break;
        }
        case 'testId':
          current = under(current, `[data-testid="${CSS.escape(step.value)}"]`);
          break;
        case 'nth': {
          const i = step.value < 0 ? current.length + step.value : step.value;
          current = i >= 0 && i < current.length ? [current[i]] : [];
          break;
        }
        case 'hasText': {
          const wanted = norm(step.value);
          current = current.filter((el) => norm(el.textContent).includes(wanted));
          break;
        }
        case 'has':
          current = current.filter((el) => resolve([el], step.value).length > 0);
          break;
        default:
          throw new Error(`unknown selector step ${step.kind}`);
      }
    }
    return current;
  };
  return resolve([document], chain);
}
"#;

/// Visibility test used by every visibility query
const VISIBLE: &str = r"
(el) => {
  if (!el || !el.isConnected) return false;
  const style = getComputedStyle(el);
  if (style.visibility === 'hidden' || style.display === 'none') return false;
  const rect = el.getBoundingClientRect();
  return rect.width > 0 && rect.height > 0;
}
";

#[derive(Deserialize)]
struct Wrapped<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
struct Point {
    x: f64,
    y: f64,
}

fn cdp_error(err: impl fmt::Display) -> ShopError {
    ShopError::driver(err.to_string())
}

/// Chromium behind the [`Driver`] trait
#[derive(Debug)]
pub struct CdpDriver {
    browser: Arc<Mutex<CdpBrowser>>,
    page: CdpPage,
    handler: tokio::task::JoinHandle<()>,
    network_idle: Duration,
    poll: Duration,
}

impl CdpDriver {
    /// Launch Chromium with the suite's headless and viewport settings and
    /// open one blank tab
    pub async fn launch(config: &SuiteConfig) -> ShopResult<Self> {
        let mut builder = CdpConfig::builder()
            .window_size(config.viewport.width, config.viewport.height);
        if !config.headless {
            builder = builder.with_head();
        }
        if std::env::var_os("SHOPWRIGHT_NO_SANDBOX").is_some() {
            builder = builder.no_sandbox();
        }
        let cdp_config = builder.build().map_err(|message| ShopError::BrowserLaunch { message })?;

        let (browser, mut handler) =
            CdpBrowser::launch(cdp_config)
                .await
                .map_err(|e| ShopError::BrowserLaunch {
                    message: e.to_string(),
                })?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ShopError::BrowserLaunch {
                message: e.to_string(),
            })?;
        info!(headless = config.headless, "chromium launched");

        Ok(Self {
            browser: Arc::new(Mutex::new(browser)),
            page,
            handler,
            network_idle: Duration::from_millis(config.timeouts.network_idle_ms),
            poll: Duration::from_millis(config.timeouts.poll_ms.max(1)),
        })
    }

    /// Close the browser and stop the event handler
    pub async fn close(&self) -> ShopResult<()> {
        let mut browser = self.browser.lock().await;
        browser.close().await.map_err(cdp_error)?;
        let _ = browser.wait().await;
        self.handler.abort();
        Ok(())
    }

    async fn eval<T: DeserializeOwned>(&self, script: String) -> ShopResult<T> {
        let result = self.page.evaluate(script).await.map_err(cdp_error)?;
        let wrapped: Wrapped<T> = result.into_value().map_err(cdp_error)?;
        Ok(wrapped.value)
    }

    /// Run `body` with `els` bound to the chain's matches and `visible` to the
    /// visibility predicate; `body` must `return { value }`.
    async fn on_matches<T: DeserializeOwned>(
        &self,
        chain: &SelectorChain,
        body: &str,
    ) -> ShopResult<T> {
        let chain_json = serde_json::to_string(chain)?;
        let script = format!(
            "(() => {{ const els = ({RESOLVER})({chain_json}); const visible = ({VISIBLE}); {body} }})()"
        );
        self.eval(script).await
    }

    async fn centre(&self, chain: &SelectorChain) -> ShopResult<Point> {
        let point: Option<Point> = self
            .on_matches(
                chain,
                "const el = els[0]; if (!el) return { value: null }; \
                 el.scrollIntoView({ block: 'center', inline: 'center' }); \
                 const r = el.getBoundingClientRect(); \
                 return { value: { x: r.left + r.width / 2, y: r.top + r.height / 2 } };",
            )
            .await?;
        point.ok_or_else(|| ShopError::NotFound {
            selector: chain.to_string(),
        })
    }

    async fn mouse(&self, kind: DispatchMouseEventType, at: &Point) -> ShopResult<()> {
        let mut params = DispatchMouseEventParams::builder().r#type(kind.clone()).x(at.x).y(at.y);
        if kind != DispatchMouseEventType::MouseMoved {
            params = params.button(MouseButton::Left).click_count(1);
        }
        let params = params.build().map_err(ShopError::driver)?;
        let _ = self.page.execute(params).await.map_err(cdp_error)?;
        Ok(())
    }

    async fn script_action(&self, chain: &SelectorChain, body: &str) -> ShopResult<()> {
        let found: bool = self
            .on_matches(
                chain,
                &format!("const el = els[0]; if (!el) return {{ value: false }}; {body} return {{ value: true }};"),
            )
            .await?;
        if found {
            Ok(())
        } else {
            Err(ShopError::NotFound {
                selector: chain.to_string(),
            })
        }
    }

    async fn click(&self, chain: &SelectorChain) -> ShopResult<()> {
        let at = self.centre(chain).await?;
        self.mouse(DispatchMouseEventType::MouseMoved, &at).await?;
        self.mouse(DispatchMouseEventType::MousePressed, &at).await?;
        self.mouse(DispatchMouseEventType::MouseReleased, &at).await
    }

    async fn ready_state(&self) -> ShopResult<String> {
        self.eval("({ value: document.readyState })".to_string()).await
    }

    async fn resource_count(&self) -> ShopResult<usize> {
        self.eval("({ value: performance.getEntriesByType('resource').length })".to_string())
            .await
    }
}

fn key_code(key: &str) -> Option<i64> {
    match key {
        "Enter" => Some(13),
        "Escape" => Some(27),
        "Tab" => Some(9),
        "Backspace" => Some(8),
        "ArrowUp" => Some(38),
        "ArrowDown" => Some(40),
        _ => None,
    }
}

#[async_trait]
impl Driver for CdpDriver {
    async fn goto(&self, url: &str, wait_until: LoadState, timeout: Duration) -> ShopResult<()> {
        debug!(url, %wait_until, "goto");
        let started = Instant::now();
        tokio::time::timeout(timeout, self.page.goto(url))
            .await
            .map_err(|_| ShopError::timeout(format!("navigation to {url}"), timeout.as_millis() as u64))?
            .map_err(|e| ShopError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        let left = timeout.saturating_sub(started.elapsed());
        self.wait_for_load_state(wait_until, left).await
    }

    async fn wait_for_load_state(&self, state: LoadState, timeout: Duration) -> ShopResult<()> {
        let started = Instant::now();
        let mut resources = self.resource_count().await?;
        let mut quiet_since = Instant::now();
        loop {
            let ready = self.ready_state().await?;
            let done = match state {
                LoadState::DomContentLoaded => ready != "loading",
                LoadState::Load => ready == "complete",
                LoadState::NetworkIdle => {
                    let now = self.resource_count().await?;
                    if now != resources {
                        resources = now;
                        quiet_since = Instant::now();
                    }
                    ready == "complete" && quiet_since.elapsed() >= self.network_idle
                }
            };
            if done {
                return Ok(());
            }
            if started.elapsed() >= timeout {
                return Err(ShopError::timeout(
                    format!("page should reach {state}"),
                    timeout.as_millis() as u64,
                ));
            }
            tokio::time::sleep(self.poll).await;
        }
    }

    async fn current_url(&self) -> ShopResult<String> {
        Ok(self.page.url().await.map_err(cdp_error)?.unwrap_or_default())
    }

    async fn title(&self) -> ShopResult<String> {
        Ok(self.page.get_title().await.map_err(cdp_error)?.unwrap_or_default())
    }

    async fn press_key(&self, key: &str) -> ShopResult<()> {
        debug!(key, "press");
        for kind in [DispatchKeyEventType::KeyDown, DispatchKeyEventType::KeyUp] {
            let mut params = DispatchKeyEventParams::builder().r#type(kind).key(key).code(key);
            if let Some(code) = key_code(key) {
                params = params.windows_virtual_key_code(code).native_virtual_key_code(code);
            }
            let params = params.build().map_err(ShopError::driver)?;
            let _ = self.page.execute(params).await.map_err(cdp_error)?;
        }
        Ok(())
    }

    async fn count(&self, chain: &SelectorChain) -> ShopResult<usize> {
        self.on_matches(chain, "return { value: els.length };").await
    }

    async fn text_content(&self, chain: &SelectorChain) -> ShopResult<Option<String>> {
        self.on_matches(chain, "return { value: els[0] ? els[0].textContent : null };")
            .await
    }

    async fn input_value(&self, chain: &SelectorChain) -> ShopResult<String> {
        let value: Option<String> = self
            .on_matches(chain, "return { value: els[0] ? String(els[0].value ?? '') : null };")
            .await?;
        value.ok_or_else(|| ShopError::NotFound {
            selector: chain.to_string(),
        })
    }

    async fn attribute(&self, chain: &SelectorChain, name: &str) -> ShopResult<Option<String>> {
        let name = serde_json::to_string(name)?;
        self.on_matches(
            chain,
            &format!("return {{ value: els[0] ? els[0].getAttribute({name}) : null }};"),
        )
        .await
    }

    async fn is_visible(&self, chain: &SelectorChain) -> ShopResult<bool> {
        self.on_matches(chain, "return { value: visible(els[0]) };").await
    }

    async fn is_checked(&self, chain: &SelectorChain) -> ShopResult<bool> {
        self.on_matches(
            chain,
            "const el = els[0]; \
             return { value: !!el && (el.checked === true || el.getAttribute('aria-checked') === 'true') };",
        )
        .await
    }

    async fn perform(&self, chain: &SelectorChain, action: &Action) -> ShopResult<()> {
        debug!(selector = %chain, action = action.name(), "perform");
        match action {
            Action::Click { force: false } => self.click(chain).await,
            Action::Click { force: true } => self.script_action(chain, "el.click();").await,
            Action::Hover => {
                let at = self.centre(chain).await?;
                self.mouse(DispatchMouseEventType::MouseMoved, &at).await
            }
            Action::Fill(text) => {
                let text = serde_json::to_string(text)?;
                self.script_action(
                    chain,
                    &format!(
                        "el.focus(); el.value = {text}; \
                         el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
                         el.dispatchEvent(new Event('change', {{ bubbles: true }}));"
                    ),
                )
                .await
            }
            Action::Check | Action::Uncheck => {
                let want = matches!(action, Action::Check);
                if self.is_checked(chain).await? != want {
                    self.click(chain).await?;
                }
                Ok(())
            }
            Action::Blur => self.script_action(chain, "el.blur();").await,
            Action::SelectOption(option) => {
                let (field, wanted) = match option {
                    SelectOption::Label(label) => ("label", label),
                    SelectOption::Value(value) => ("value", value),
                };
                let wanted = serde_json::to_string(wanted)?;
                self.script_action(
                    chain,
                    &format!(
                        "const opt = Array.from(el.options || []).find((o) => o.{field}.trim() === {wanted}); \
                         if (!opt) throw new Error('no option ' + {wanted}); \
                         el.value = opt.value; \
                         el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
                         el.dispatchEvent(new Event('change', {{ bubbles: true }}));"
                    ),
                )
                .await
            }
        }
    }
}
