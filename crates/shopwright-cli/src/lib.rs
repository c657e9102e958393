//! Shopwright CLI library
//!
//! Command-line front end for the storefront page objects: a Chromium smoke
//! scenario and a printer for the effective suite configuration.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
pub mod logging;
mod output;
pub mod smoke;

pub use commands::{Cli, ColorArg, Commands, ConfigArgs, SmokeArgs};
pub use config::{
    resolve_suite_config, resolve_with, smoke_config, CliConfig, ColorChoice, Verbosity,
};
pub use error::{CliError, CliResult};
pub use output::StepReporter;
pub use smoke::{run_scenario, SmokeOutcome};
