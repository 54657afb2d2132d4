//! CLI command implementations for memnet

use clap::{Parser, Subcommand};

use crate::error::CliResult;

pub mod inspect;
pub mod run;

/// memnet - runs experiments on associative memory networks
#[derive(Parser, Debug)]
#[command(
    name = "memnet",
    version,
    about = "Runs experiments on associative memory networks",
    long_about = "memnet drives a real-time associative memory network from a \
                  markdown-like experiment description: it stimulates units on \
                  the experiment's timeline, samples the activations, and \
                  exports the traces for plotting."
)]
pub struct MemnetCli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run an experiment against a live network
    Run(run::RunCommand),

    /// Parse an experiment file and print its summary
    #[command(alias = "check")]
    Inspect(inspect::InspectCommand),
}

impl MemnetCli {
    /// Execute the CLI command
    pub fn execute(self) -> CliResult<()> {
        match self.command {
            Commands::Run(cmd) => cmd.execute(),
            Commands::Inspect(cmd) => cmd.execute(),
        }
    }
}
