use crate::assertion::expect;
use crate::locator::Locator;
use crate::page::Page;
use crate::page_object::{PageHandle, PageObject};
use crate::result::ShopResult;
use tracing::info;

/// The sign-in page (`/login`), also the checkout gate for guests
#[derive(Debug, Clone)]
pub struct LoginPage {
    handle: PageHandle,
    /// Page heading
    pub page_title: Locator,
    /// Sign-in box
    pub sign_in_box: Locator,
    /// Username or email input
    pub username_input: Locator,
    /// Password input
    pub password_input: Locator,
    /// "Remember me" checkbox
    pub remember_me_checkbox: Locator,
    /// Submit button
    pub login_button: Locator,
    /// Password recovery link
    pub forgot_password_link: Locator,
    /// Validation summary box
    pub validation_summary: Locator,
    /// Validation message items
    pub validation_error_message: Locator,
    /// Registration block
    pub register_block: Locator,
    /// "Register" button
    pub register_button: Locator,
    /// "Checkout as guest" button
    pub checkout_as_guest_button: Locator,
}

impl LoginPage {
    /// Route of the sign-in page
    pub const URL: &'static str = "/login";

    /// Login page bound to `page`
    #[must_use]
    pub fn new(page: &Page) -> Self {
        let handle = PageHandle::new(page, Self::URL);
        let validation_summary = handle.locator(".validation-summary-errors");
        Self {
            page_title: handle.locator(".page-title h1"),
            sign_in_box: handle.locator(".login-box"),
            username_input: handle.locator("#UsernameOrEmail"),
            password_input: handle.locator("#Password"),
            remember_me_checkbox: handle.locator("#RememberMe"),
            login_button: handle.locator(".btn-login"),
            forgot_password_link: handle.locator("a[href=\"/customer/passwordrecovery\"]"),
            validation_error_message: validation_summary.locator("ul li"),
            validation_summary,
            register_block: handle.locator(".register-block"),
            register_button: handle.locator("a.register-button"),
            checkout_as_guest_button: handle.locator("a.checkout-as-guest-button"),
            handle,
        }
    }

    /// Fill credentials; ticks "remember me" only when asked and not already ticked
    pub async fn fill_login_form(
        &self,
        username: &str,
        password: &str,
        remember_me: bool,
    ) -> ShopResult<()> {
        self.username_input.fill(username).await?;
        self.password_input.fill(password).await?;
        if remember_me && !self.remember_me_checkbox.is_checked().await? {
            self.remember_me_checkbox.check().await?;
        }
        Ok(())
    }

    /// Fill credentials and submit
    pub async fn login(&self, username: &str, password: &str, remember_me: bool) -> ShopResult<()> {
        info!(username, remember_me, "log in");
        self.fill_login_form(username, password, remember_me).await?;
        self.login_button.click().await
    }

    /// Whether the validation summary is showing
    pub async fn has_validation_error(&self) -> ShopResult<bool> {
        self.validation_summary.is_visible().await
    }

    /// Trimmed validation message, empty when no summary is showing
    pub async fn validation_error(&self) -> ShopResult<String> {
        if !self.has_validation_error().await? {
            return Ok(String::new());
        }
        Ok(self
            .validation_error_message
            .text_content()
            .await?
            .trim()
            .to_string())
    }

    /// Wait for the validation summary and for its message to contain `expected`
    pub async fn assert_validation_error_contains(&self, expected: &str) -> ShopResult<()> {
        expect(&self.validation_summary)
            .with_message("Validation error should be visible")
            .to_be_visible()
            .await?;
        expect(&self.validation_error_message)
            .with_message(format!("Expected error to contain: {expected}"))
            .to_contain_text(expected)
            .await
    }

    /// Wait for the heading and the submit button
    pub async fn assert_login_page_displayed(&self) -> ShopResult<()> {
        expect(&self.page_title)
            .with_message("Login page title should be visible")
            .to_be_visible()
            .await?;
        expect(&self.login_button)
            .with_message("Login button should be visible")
            .to_be_visible()
            .await
    }

    /// Whether "remember me" is ticked
    pub async fn is_remember_me_checked(&self) -> ShopResult<bool> {
        self.remember_me_checkbox.is_checked().await
    }

    /// Current username field value
    pub async fn username_value(&self) -> ShopResult<String> {
        self.username_input.input_value().await
    }

    /// Open the registration page
    pub async fn go_to_register(&self) -> ShopResult<()> {
        self.register_button.click().await
    }

    /// Continue checkout without an account
    pub async fn checkout_as_guest(&self) -> ShopResult<()> {
        self.checkout_as_guest_button.click().await
    }

    /// Open password recovery
    pub async fn go_to_forgot_password(&self) -> ShopResult<()> {
        self.forgot_password_link.click().await
    }
}

impl PageObject for LoginPage {
    fn handle(&self) -> &PageHandle {
        &self.handle
    }

    fn page_name(&self) -> &str {
        "LoginPage"
    }
}
