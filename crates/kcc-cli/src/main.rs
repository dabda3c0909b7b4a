//! # kcc
//!
//! Realm configuration importer.

#![forbid(unsafe_code)]

use clap::Parser;
use kcc_cli::{
    cli::{Cli, Command},
    commands::{run_config, run_import},
    config::CliConfig,
    output::error,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load configuration
    let mut config = match CliConfig::load() {
        Ok(c) => c,
        Err(e) => {
            error(&format!("Failed to load configuration: {e}"));
            std::process::exit(1);
        }
    };

    let format = cli.output.unwrap_or(config.output_format);

    let result = match cli.command {
        Command::Import(args) => run_import(args, &config, &cli.connection, format).await,
        Command::Config(cmd) => run_config(cmd, &mut config),
    };

    if let Err(e) = result {
        error(&e.to_string());
        std::process::exit(1);
    }
}

/// Logs go to stderr so that JSON output on stdout stays parseable.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let default_filter =
        format!("kcc_cli={default_level},kcc_core={default_level},kcc_remote={default_level}");

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or(default_filter),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
