//! The storefront smoke scenario
//!
//! Empty the cart, filter sports by price and add the first product. Check it
//! is the only cart item and that the offcanvas and cart page subtotals match
//! its price, then proceed to checkout as a guest and expect the login page.

use crate::error::{CliError, CliResult};
use crate::output::StepReporter;
use shopwright::components::PriceRange;
use shopwright::{round_cents, Fixtures, ShopError, ShopResult, SuiteConfig};
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// What a passing run observed
#[derive(Debug, Clone, PartialEq)]
pub struct SmokeOutcome {
    /// Steps that passed
    pub steps: usize,
    /// Name of the product added to the cart
    pub product: String,
    /// Its listed price
    pub price: f64,
    /// Total wall time
    pub elapsed: Duration,
}

struct Steps<'a> {
    reporter: &'a StepReporter,
    passed: usize,
}

impl Steps<'_> {
    async fn run<T, F>(&mut self, name: &str, step: F) -> CliResult<T>
    where
        F: Future<Output = ShopResult<T>>,
    {
        let started = Instant::now();
        info!(step = name, "smoke step");
        match step.await {
            Ok(value) => {
                self.passed += 1;
                self.reporter.pass(name, started.elapsed());
                Ok(value)
            }
            Err(err) => {
                warn!(step = name, error = %err, "smoke step failed");
                self.reporter.fail(name, &err.to_string());
                Err(CliError::smoke(name, err))
            }
        }
    }
}

fn same_price(what: &str, actual: f64, expected: f64) -> ShopResult<()> {
    if round_cents(actual) == round_cents(expected) {
        Ok(())
    } else {
        Err(ShopError::assertion(format!(
            "{what} should be {expected:.2}, got {actual:.2}"
        )))
    }
}

/// Run the scenario against already-built fixtures
pub async fn run_scenario(fx: &Fixtures, reporter: &StepReporter) -> CliResult<SmokeOutcome> {
    let started = Instant::now();
    let mut steps = Steps {
        reporter,
        passed: 0,
    };

    steps.run("start with an empty cart", fx.start_with_empty_cart()).await?;
    steps
        .run(
            "filter sports up to $50",
            fx.sports_page.filter_by_price(PriceRange::UpTo50),
        )
        .await?;

    let product = fx.sports_page.product_list.product(0);
    let name = steps.run("read first product", product.name()).await?;
    let price = steps.run("read its price", product.price_value()).await?;
    steps.run("add it to the cart", fx.sports_page.add_to_cart(&product)).await?;
    steps
        .run("cart holds one item", async {
            match fx.cart.item_count().await? {
                1 => Ok(()),
                n => Err(ShopError::assertion(format!("cart should hold 1 item, got {n}"))),
            }
        })
        .await?;

    steps
        .run("offcanvas subtotal matches", async {
            same_price("offcanvas subtotal", fx.cart.subtotal_value().await?, price)
        })
        .await?;
    steps.run("open the cart page", fx.cart.go_to_cart()).await?;
    steps
        .run("cart page subtotal matches", async {
            same_price("cart subtotal", fx.cart_page.subtotal().await?, price)
        })
        .await?;

    steps
        .run("guest checkout redirects to login", fx.cart_page.proceed_to_checkout())
        .await?;
    steps
        .run("login page is displayed", fx.login_page.assert_login_page_displayed())
        .await?;

    Ok(SmokeOutcome {
        steps: steps.passed,
        product: name,
        price,
        elapsed: started.elapsed(),
    })
}

/// Launch Chromium, run the scenario and close the browser
#[cfg(feature = "browser")]
pub async fn run(config: SuiteConfig, reporter: &StepReporter) -> CliResult<SmokeOutcome> {
    use shopwright::{CdpDriver, Page};
    use std::sync::Arc;

    reporter.info(&format!("storefront {}", config.base_url));
    let driver = Arc::new(CdpDriver::launch(&config).await?);
    let page = Page::new(driver.clone(), config);
    let fx = Fixtures::new(&page);

    let outcome = run_scenario(&fx, reporter).await;
    if let Err(err) = driver.close().await {
        warn!(error = %err, "browser did not close cleanly");
    }
    outcome
}

/// Without the `browser` feature there is nothing to drive
#[cfg(not(feature = "browser"))]
pub async fn run(_config: SuiteConfig, _reporter: &StepReporter) -> CliResult<SmokeOutcome> {
    Err(CliError::config(
        "smoke needs Chromium; rebuild with --features browser",
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use shopwright::components::CART_SELECTOR;
    use shopwright::{Component, MockDriver, MockElement, Page, Timeouts};
    use std::sync::Arc;

    const BASE: &str = "https://shop.test";

    fn fixtures() -> (Arc<MockDriver>, Fixtures) {
        let mock = Arc::new(MockDriver::new());
        let timeouts = Timeouts {
            expect_ms: 100,
            poll_ms: 2,
            navigation_ms: 100,
            loader_appear_ms: 10,
            loader_settle_ms: 100,
            network_idle_ms: 0,
        };
        let config = SuiteConfig::new()
            .with_base_url(BASE)
            .with_timeouts(timeouts);
        let page = Page::new(mock.clone(), config);
        (mock, Fixtures::new(&page))
    }

    /// Storefront where the first listed product costs `cart_price` once in the cart
    fn script(mock: &MockDriver, fx: &Fixtures, cart_price: &str, item_count: usize) {
        let sports = &fx.sports_page;
        mock.set(fx.filter.price_option(PriceRange::UpTo50), MockElement::new());

        let product = sports.product_list.product(0);
        mock.set(product.root(), MockElement::new());
        mock.set(&product.name, MockElement::with_text("Titleist Pro V1x"));
        mock.set(&product.price, MockElement::with_text("$2.10 excl tax"));
        mock.set(&product.add_to_cart_button, MockElement::new());

        let items = fx.cart.items.selector();
        let subtotal = fx.cart.subtotal.selector();
        let go_to_cart = fx.cart.go_to_cart_button.selector();
        let offcanvas_price = cart_price.to_string();
        mock.on_round_trip(&product.add_to_cart_button, 1, move |dom| {
            dom.set(CART_SELECTOR, MockElement::new());
            dom.set(&items, MockElement::new().with_count(item_count));
            dom.set(&subtotal, MockElement::with_text(offcanvas_price.clone()));
            dom.set(&go_to_cart, MockElement::new());
        });

        let cart_page = &fx.cart_page;
        let order_subtotal = cart_page.subtotal_value.selector();
        let checkout = cart_page.checkout_button.selector();
        let page_price = cart_price.to_string();
        mock.on_action(&fx.cart.go_to_cart_button, move |dom| {
            dom.set_url(format!("{BASE}/cart"));
            dom.set(&order_subtotal, MockElement::with_text(page_price.clone()));
            dom.set(&checkout, MockElement::new());
        });

        let title = fx.login_page.page_title.selector();
        let button = fx.login_page.login_button.selector();
        mock.on_action(&cart_page.checkout_button, move |dom| {
            dom.set_url(format!("{BASE}/login?returnUrl=%2Fcart"));
            dom.set(&title, MockElement::with_text("Welcome, please sign in!"));
            dom.set(&button, MockElement::new());
        });
    }

    #[tokio::test]
    async fn test_scenario_passes_on_consistent_storefront() {
        let (mock, fx) = fixtures();
        script(&mock, &fx, "$2.10 excl tax", 1);
        let reporter = StepReporter::new(false, true);

        let outcome = run_scenario(&fx, &reporter).await.unwrap();
        assert_eq!(outcome.steps, 11);
        assert_eq!(outcome.product, "Titleist Pro V1x");
        assert!((outcome.price - 2.10).abs() < 1e-9);
        assert!(mock.with_dom(|dom| dom.url().ends_with("/login?returnUrl=%2Fcart")));
    }

    #[tokio::test]
    async fn test_scenario_names_failing_step() {
        let (mock, fx) = fixtures();
        script(&mock, &fx, "$3.00 excl tax", 1);
        let reporter = StepReporter::new(false, true);

        let err = run_scenario(&fx, &reporter).await.unwrap_err();
        let text = err.to_string();
        assert!(text.contains("'offcanvas subtotal matches'"), "{text}");
        assert!(text.contains("should be 2.10, got 3.00"), "{text}");
        assert!(!mock.was_performed(&fx.cart.go_to_cart_button, "click"));
    }

    #[tokio::test]
    async fn test_scenario_rejects_duplicate_cart_rows() {
        let (mock, fx) = fixtures();
        script(&mock, &fx, "$2.10 excl tax", 2);
        let reporter = StepReporter::new(false, true);

        let err = run_scenario(&fx, &reporter).await.unwrap_err();
        let text = err.to_string();
        assert!(text.contains("'cart holds one item'"), "{text}");
        assert!(text.contains("got 2"), "{text}");
    }

    #[test]
    fn test_same_price_rounds_to_cents() {
        assert!(same_price("total", 4.199_999, 4.20).is_ok());
        assert!(same_price("total", 4.21, 4.20).is_err());
    }
}
