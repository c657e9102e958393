//! Soft assertions.
//!
//! Collect several failures in one test run and report them together,
//! instead of stopping at the first one.

use crate::price::round_cents;
use crate::result::{ShopError, ShopResult};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A single assertion failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionFailure {
    /// Message describing the failure
    pub message: String,
    /// Index of this assertion in the sequence
    pub index: usize,
}

/// Soft assertions collector
///
/// ```ignore
/// let mut soft = SoftAssertions::new();
/// soft.check(expect(cart.badge()).to_have_text("1").await);
/// soft.assert_price_eq(cart.subtotal_value().await?, 2.10, "subtotal");
/// soft.verify()?;
/// ```
#[derive(Debug, Default)]
pub struct SoftAssertions {
    failures: Vec<AssertionFailure>,
    assertion_count: usize,
}

impl SoftAssertions {
    /// Create a new soft assertions collector
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of a hard expectation without stopping
    pub fn check(&mut self, outcome: ShopResult<()>) {
        self.assertion_count += 1;
        if let Err(err) = outcome {
            self.record_failure(err.to_string());
        }
    }

    /// Assert two values are equal
    pub fn assert_eq<T: PartialEq + Debug>(&mut self, actual: &T, expected: &T, message: &str) {
        self.assertion_count += 1;
        if actual != expected {
            self.record_failure(format!("{message}: expected {expected:?}, got {actual:?}"));
        }
    }

    /// Assert a condition is true
    pub fn assert_true(&mut self, condition: bool, message: &str) {
        self.assertion_count += 1;
        if !condition {
            self.record_failure(format!("{message}: expected true, got false"));
        }
    }

    /// Assert a string contains a substring
    pub fn assert_contains(&mut self, haystack: &str, needle: &str, message: &str) {
        self.assertion_count += 1;
        if !haystack.contains(needle) {
            self.record_failure(format!(
                "{message}: expected '{haystack}' to contain '{needle}'"
            ));
        }
    }

    /// Assert two floats are approximately equal
    pub fn assert_approx_eq(&mut self, actual: f64, expected: f64, epsilon: f64, message: &str) {
        self.assertion_count += 1;
        if (actual - expected).abs() >= epsilon {
            self.record_failure(format!(
                "{message}: expected {actual} to be within {epsilon} of {expected}"
            ));
        }
    }

    /// Assert two amounts are equal to the cent
    pub fn assert_price_eq(&mut self, actual: f64, expected: f64, message: &str) {
        self.assertion_count += 1;
        if round_cents(actual) != round_cents(expected) {
            self.record_failure(format!(
                "{message}: expected ${expected:.2}, got ${actual:.2}"
            ));
        }
    }

    fn record_failure(&mut self, message: String) {
        let failure = AssertionFailure {
            message,
            index: self.failures.len(),
        };
        self.failures.push(failure);
    }

    /// Get all failures
    #[must_use]
    pub fn failures(&self) -> &[AssertionFailure] {
        &self.failures
    }

    /// Check if all assertions passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// Get a summary of the assertions
    #[must_use]
    pub fn summary(&self) -> AssertionSummary {
        AssertionSummary {
            total: self.assertion_count,
            passed: self.assertion_count - self.failures.len(),
            failed: self.failures.len(),
        }
    }

    /// Fail with every collected message if anything failed
    pub fn verify(&self) -> ShopResult<()> {
        if self.failures.is_empty() {
            return Ok(());
        }
        let mut message = format!("{} assertion(s) failed:", self.failures.len());
        for (i, failure) in self.failures.iter().enumerate() {
            message.push_str(&format!("\n  {}. {}", i + 1, failure.message));
        }
        Err(ShopError::assertion(message))
    }
}

/// Summary of assertion results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionSummary {
    /// Total assertions checked
    pub total: usize,
    /// Assertions that passed
    pub passed: usize,
    /// Assertions that failed
    pub failed: usize,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod soft_assertions_basic {
        use super::*;

        #[test]
        fn test_new_creates_empty() {
            let soft = SoftAssertions::new();
            assert!(soft.all_passed());
            assert_eq!(soft.summary().total, 0);
            assert!(soft.verify().is_ok());
        }

        #[test]
        fn test_collects_multiple_failures() {
            let mut soft = SoftAssertions::new();
            soft.assert_eq(&1, &2, "cart count");
            soft.assert_true(true, "cart visible");
            soft.assert_contains("$2.10 excl tax", "$4.20", "subtotal");
            assert_eq!(
                soft.summary(),
                AssertionSummary {
                    total: 3,
                    passed: 1,
                    failed: 2
                }
            );
            assert_eq!(soft.failures()[1].index, 1);
        }

        #[test]
        fn test_verify_lists_every_failure() {
            let mut soft = SoftAssertions::new();
            soft.assert_approx_eq(4.2, 2.1, 0.001, "item subtotal");
            soft.check(Err(ShopError::timeout("Loader should disappear", 10)));
            let message = soft.verify().unwrap_err().to_string();
            assert!(message.contains("2 assertion(s) failed"));
            assert!(message.contains("1. item subtotal"));
            assert!(message.contains("2. Loader should disappear"));
        }

        #[test]
        fn test_price_eq_compares_cents() {
            let mut soft = SoftAssertions::new();
            soft.assert_price_eq(2.10 * 2.0, 4.20, "item subtotal");
            soft.assert_price_eq(4.21, 4.20, "order subtotal");
            assert_eq!(soft.summary().failed, 1);
            assert_eq!(
                soft.failures()[0].message,
                "order subtotal: expected $4.20, got $4.21"
            );
        }

        #[test]
        fn test_check_ok_counts_as_pass() {
            let mut soft = SoftAssertions::new();
            soft.check(Ok(()));
            assert!(soft.all_passed());
            assert_eq!(soft.summary().passed, 1);
        }
    }
}
