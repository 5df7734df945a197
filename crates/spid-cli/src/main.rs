//! # spid-check
//!
//! Offline SPID response checker.

#![forbid(unsafe_code)]

use clap::Parser;
use spid_cli::{
    cli::{Cli, Command},
    commands::{run_attribute_sets, run_check, run_metadata},
    config::CliConfig,
    error::EXIT_OK,
    output::error,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match CliConfig::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            error(&format!("Failed to load configuration: {e}"));
            std::process::exit(e.exit_code());
        }
    };
    let format = cli.output.unwrap_or(config.output_format);

    let result = match cli.command {
        Command::Check(args) => run_check(args, &config, format),
        Command::Metadata(args) => run_metadata(args, &config),
        Command::AttributeSets => run_attribute_sets(format),
    };

    match result {
        Ok(()) => std::process::exit(EXIT_OK),
        Err(e) => {
            // the verdict of a rejected response was already printed
            if !matches!(e, spid_cli::CliError::Check(ref inner) if inner.is_compliance_failure()) {
                error(&e.to_string());
            }
            std::process::exit(e.exit_code());
        }
    }
}
