//! # memnet CLI - experiment runner for associative memory networks
//!
//! Drives a real-time associative memory network from a markdown-like
//! experiment description: stimulations on a millisecond timeline,
//! sampled activation traces, and CSV export for plotting.

use clap::Parser;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod error;
mod experiment;
mod parser;
mod trace;

use commands::MemnetCli;
use error::CliResult;

fn main() -> CliResult<()> {
    // Parse CLI arguments
    let cli = MemnetCli::parse();

    // Initialize logging with environment variable support
    let default_filter = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    // Execute the command
    if let Err(err) = cli.execute() {
        error!("Command failed: {}", err);
        std::process::exit(1);
    }

    Ok(())
}
