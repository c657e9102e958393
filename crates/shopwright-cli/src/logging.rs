//! Log subscriber setup

use crate::config::CliConfig;
use tracing_subscriber::EnvFilter;

/// Environment variable read before `RUST_LOG`
pub const LOG_ENV: &str = "SHOPWRIGHT_LOG";

/// Filter from `SHOPWRIGHT_LOG`, then `RUST_LOG`, then the verbosity default
#[must_use]
pub fn env_filter(config: &CliConfig) -> EnvFilter {
    filter_from(config, |key| std::env::var(key).ok())
}

fn filter_from<F>(config: &CliConfig, lookup: F) -> EnvFilter
where
    F: Fn(&str) -> Option<String>,
{
    [LOG_ENV, EnvFilter::DEFAULT_ENV]
        .into_iter()
        .filter_map(|key| lookup(key))
        .find_map(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(config.verbosity.filter_directive()))
}

/// Install the global subscriber on stderr. A second call is a no-op.
pub fn init(config: &CliConfig) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(std::io::stderr)
        .with_target(false);
    let result = if config.log_json {
        builder.json().try_init()
    } else {
        builder.with_ansi(config.color.should_color()).try_init()
    };
    if result.is_err() {
        tracing::debug!("log subscriber already installed");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::Verbosity;

    fn config(verbosity: Verbosity) -> CliConfig {
        CliConfig {
            verbosity,
            ..CliConfig::default()
        }
    }

    #[test]
    fn test_verbosity_default() {
        let filter = filter_from(&config(Verbosity::Debug), |_| None);
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    fn test_shopwright_log_wins() {
        let filter = filter_from(&config(Verbosity::Quiet), |key| match key {
            LOG_ENV => Some("trace".to_string()),
            _ => Some("info".to_string()),
        });
        assert_eq!(filter.to_string(), "trace");
    }

    #[test]
    fn test_rust_log_fallback() {
        let filter = filter_from(&config(Verbosity::Normal), |key| {
            (key == "RUST_LOG").then(|| "warn".to_string())
        });
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        let cfg = CliConfig::default();
        init(&cfg);
        init(&cfg);
    }
}
