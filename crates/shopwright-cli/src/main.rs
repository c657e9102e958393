//! Shopwright CLI: storefront smoke checks
//!
//! ## Usage
//!
//! ```bash
//! shopwright smoke                                  # Headless run against the default shop
//! shopwright smoke --base-url http://localhost:5000 --headed
//! shopwright config --config suite.yaml             # Print the effective configuration
//! ```

use clap::Parser;
use shopwright_cli::{
    logging, resolve_suite_config, smoke, smoke_config, Cli, CliConfig, CliResult,
    Commands, ConfigArgs, SmokeArgs, StepReporter,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = CliConfig::from_cli(&cli);
    logging::init(&config);

    match cli.command {
        Commands::Smoke(args) => run_smoke(&config, &args),
        Commands::Config(args) => run_config(&args),
    }
}

fn run_smoke(config: &CliConfig, args: &SmokeArgs) -> CliResult<()> {
    let suite = smoke_config(args)?;
    let reporter = StepReporter::new(config.color.should_color(), config.verbosity.is_quiet());
    reporter.header("Storefront smoke");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let outcome = runtime.block_on(smoke::run(suite, &reporter))?;

    reporter.info(&format!("added {} at ${:.2}", outcome.product, outcome.price));
    reporter.summary(outcome.steps, outcome.elapsed);
    Ok(())
}

fn run_config(args: &ConfigArgs) -> CliResult<()> {
    let suite = resolve_suite_config(args.config.as_deref(), None, false)?;
    print!("{}", suite.to_yaml()?);
    Ok(())
}
