//! Assertions for test validation.
//!
//! - [`expect`]: polling expectations on locators
//! - [`retry_until`]: the polling engine behind them, usable with any async check
//! - [`SoftAssertions`]: collect failures and report them together

mod expect;
mod retry;
mod soft;

pub use expect::{expect, Expect};
pub use retry::{retry_until, AssertionCheckResult, RetryConfig, RetryResult};
pub use soft::{AssertionFailure, AssertionSummary, SoftAssertions};
