//! Error types for the CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Smoke scenario failed at a step
    #[error("Smoke scenario failed at '{step}': {source}")]
    Smoke {
        /// Step that failed
        step: String,
        /// Underlying failure
        #[source]
        source: shopwright::ShopError,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Library error outside a scenario step
    #[error("{0}")]
    Shop(shopwright::ShopError),
}

impl CliError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a smoke step error
    #[must_use]
    pub fn smoke(step: impl Into<String>, source: shopwright::ShopError) -> Self {
        Self::Smoke {
            step: step.into(),
            source,
        }
    }
}

impl From<shopwright::ShopError> for CliError {
    fn from(err: shopwright::ShopError) -> Self {
        match err {
            shopwright::ShopError::Config { message } => Self::Config { message },
            shopwright::ShopError::Yaml(e) => Self::Config {
                message: e.to_string(),
            },
            other => Self::Shop(other),
        }
    }
}
