//! Numeric values derived from displayed text.
//!
//! The storefront renders money as `"$2.10 excl tax"`, `"$1,000.00"` and
//! similar, and paging banners as `"1-12 of 37"`. Everything here is pure so
//! the parsing rules can be tested without a page.

use crate::result::{ShopError, ShopResult};
use regex::Regex;
use std::sync::OnceLock;

/// First currency amount in a string: optional `$`, digits, optional fraction
pub const PRICE_PATTERN: &str = r"\$?(\d+\.?\d*)";

/// Paging banner: `"<first>-<last> of <total>"`
pub const ITEM_COUNT_PATTERN: &str = r"(\d+)-(\d+)\s+of\s+(\d+)";

fn compiled(cell: &'static OnceLock<Result<Regex, regex::Error>>, pattern: &str) -> ShopResult<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern))
        .as_ref()
        .map_err(|e| ShopError::config(format!("invalid pattern {pattern}: {e}")))
}

fn price_regex() -> ShopResult<&'static Regex> {
    static CELL: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    compiled(&CELL, PRICE_PATTERN)
}

fn item_count_regex() -> ShopResult<&'static Regex> {
    static CELL: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    compiled(&CELL, ITEM_COUNT_PATTERN)
}

/// Parse the first currency amount in `text`.
///
/// Thousands separators between digits are ignored, so `"$1,000.00"` is
/// `1000.0`. `what` names the value in the error.
pub fn parse_price(what: &str, text: &str) -> ShopResult<f64> {
    let normalized = strip_thousands_separators(text);
    price_regex()?
        .captures(&normalized)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .ok_or_else(|| ShopError::parse(what, text))
}

fn strip_thousands_separators(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    chars
        .iter()
        .enumerate()
        .filter(|&(i, c)| {
            !(*c == ','
                && i > 0
                && chars[i - 1].is_ascii_digit()
                && chars.get(i + 1).is_some_and(char::is_ascii_digit))
        })
        .map(|(_, c)| *c)
        .collect()
}

/// Parse a non-negative integer such as a quantity or a badge count
pub fn parse_count(what: &str, text: &str) -> ShopResult<u32> {
    text.trim()
        .parse::<u32>()
        .map_err(|_| ShopError::parse(what, text))
}

/// Result of parsing a paging banner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemCount {
    /// Items shown on this page
    pub displayed: u32,
    /// Items across all pages
    pub total: u32,
}

impl ItemCount {
    /// Parse `"<first>-<last> of <total>"`; `displayed` is `last - first + 1`
    pub fn parse(text: &str) -> ShopResult<Self> {
        let err = || ShopError::parse("item count", text);
        let caps = item_count_regex()?.captures(text).ok_or_else(err)?;
        let number = |i: usize| {
            caps.get(i)
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .ok_or_else(err)
        };
        let (first, last, total) = (number(1)?, number(2)?, number(3)?);
        if last < first {
            return Err(err());
        }
        Ok(Self {
            displayed: last - first + 1,
            total,
        })
    }
}

/// Round to cents for comparing computed totals
#[must_use]
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
