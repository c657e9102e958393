//! CLI configuration

use crate::commands::{Cli, SmokeArgs};
use crate::error::CliResult;
use shopwright::{SuiteConfig, ENV_BASE_URL, ENV_HEADLESS};
use std::path::Path;

/// Verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only
    Quiet,
    /// Default output
    #[default]
    Normal,
    /// Extra output
    Verbose,
    /// Maximum output
    Debug,
}

impl Verbosity {
    /// From the `-q` flag and the `-v` count
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Debug,
        }
    }

    /// Check if quiet mode
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet)
    }

    /// Default log filter directive for this level
    #[must_use]
    pub const fn filter_directive(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn,shopwright=info",
            Self::Verbose => "info,shopwright=debug",
            Self::Debug => "debug",
        }
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Always use colors
    Always,
    /// Use colors when output is a terminal
    #[default]
    Auto,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Should use colors based on output detection
    #[must_use]
    pub fn should_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::io::IsTerminal::is_terminal(&std::io::stdout()),
        }
    }
}

/// CLI configuration derived from the global flags
#[derive(Debug, Clone, Copy, Default)]
pub struct CliConfig {
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Color output choice
    pub color: ColorChoice,
    /// JSON log lines
    pub log_json: bool,
}

impl CliConfig {
    /// Build from parsed arguments
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            verbosity: Verbosity::from_flags(cli.quiet, cli.verbose),
            color: cli.color.into(),
            log_json: cli.log_json,
        }
    }
}

/// Effective suite configuration: defaults, then the file, then the
/// environment, then command-line flags.
pub fn resolve_suite_config(
    file: Option<&Path>,
    base_url: Option<&str>,
    headed: bool,
) -> CliResult<SuiteConfig> {
    resolve_with(file, base_url, headed, |key| std::env::var(key).ok())
}

/// [`resolve_suite_config`] with an injectable environment
pub fn resolve_with<F>(
    file: Option<&Path>,
    base_url: Option<&str>,
    headed: bool,
    env: F,
) -> CliResult<SuiteConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let config = match file {
        Some(path) => SuiteConfig::load(path)?,
        None => SuiteConfig::default(),
    };
    let config = config.with_overrides_from(env)?;
    let config = config.with_overrides_from(|key| match key {
        ENV_BASE_URL => base_url.map(str::to_string),
        ENV_HEADLESS if headed => Some("false".to_string()),
        _ => None,
    })?;
    Ok(config)
}

/// Suite configuration for the smoke command
pub fn smoke_config(args: &SmokeArgs) -> CliResult<SuiteConfig> {
    resolve_suite_config(args.config.as_deref(), args.base_url.as_deref(), args.headed)
}
