//! Result and error types for Shopwright.

use thiserror::Error;

/// Result type for Shopwright operations
pub type ShopResult<T> = Result<T, ShopError>;

/// Errors that can occur while driving the storefront
#[derive(Debug, Error)]
pub enum ShopError {
    /// Displayed text did not match the expected numeric/count format
    #[error("Unable to parse {what}: {text}")]
    Parse {
        /// What was being parsed (e.g. "subtotal", "item count")
        what: String,
        /// The offending raw text
        text: String,
    },

    /// A wait exceeded its bound
    #[error("{expectation} (timed out after {ms}ms)")]
    Timeout {
        /// Description of the expectation that was not met
        expectation: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// A locator resolved to zero elements when one was required
    #[error("No element matches {selector}")]
    NotFound {
        /// Rendered selector chain
        selector: String,
    },

    /// A non-polling assertion failed
    #[error("Assertion failed: {message}")]
    Assertion {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// The browser-automation engine reported an error
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl ShopError {
    /// Create a parse error
    #[must_use]
    pub fn parse(what: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Parse {
            what: what.into(),
            text: text.into(),
        }
    }

    /// Create a timeout error
    #[must_use]
    pub fn timeout(expectation: impl Into<String>, ms: u64) -> Self {
        Self::Timeout {
            expectation: expectation.into(),
            ms,
        }
    }

    /// Create a driver error
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Create an assertion error
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::Assertion {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error is a wait timeout
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
