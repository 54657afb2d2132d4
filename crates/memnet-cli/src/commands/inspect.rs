//! Experiment inspection command

use clap::Args;
use std::path::PathBuf;
use tracing::info;

use crate::error::CliResult;
use crate::parser;

/// Parse an experiment file and print its summary
#[derive(Args, Debug)]
pub struct InspectCommand {
    /// Experiment description file (markdown)
    pub experiment: PathBuf,
}

impl InspectCommand {
    /// Parse the experiment and print its summary
    pub fn execute(self) -> CliResult<()> {
        info!("Inspecting {}", self.experiment.display());

        let text = std::fs::read_to_string(&self.experiment)?;
        let experiment = parser::parse(&text)?;

        print!("{}", experiment.summary());
        Ok(())
    }
}
