//! Experiment execution command
//!
//! Replays the experiment's activation schedule against a live network on
//! the wall clock, collecting a decimated activation trace through the
//! network's logging sink.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Args;
use parking_lot::Mutex;
use tracing::info;

use memnet_core::{MemoryNetwork, NetworkBuilder};

use crate::error::{CliError, CliResult};
use crate::experiment::Experiment;
use crate::parser;
use crate::trace::{TraceBuffer, DEFAULT_SAMPLE_RATE};

/// Run an experiment against a live network
#[derive(Args, Debug)]
pub struct RunCommand {
    /// Experiment description file (markdown)
    pub experiment: PathBuf,

    /// Write the sampled activation trace to this CSV file
    #[arg(short, long)]
    pub csv: Option<PathBuf>,

    /// Trace sampling rate in Hz (0 keeps every step)
    #[arg(long, default_value_t = DEFAULT_SAMPLE_RATE)]
    pub sample_rate: f64,

    /// Override the network update frequency limit in Hz
    #[arg(long)]
    pub max_frequency: Option<f64>,

    /// Keep running this long after the last scheduled event (ms)
    #[arg(long, default_value = "0")]
    pub settle_ms: u64,

    /// Record the stimulations and print the report afterwards
    #[arg(long)]
    pub record: bool,
}

impl RunCommand {
    /// Parse, run, and export the experiment
    pub fn execute(self) -> CliResult<()> {
        let text = std::fs::read_to_string(&self.experiment)?;
        let experiment = parser::parse(&text)?;
        if experiment.units.is_empty() {
            return Err(CliError::invalid_args("the experiment defines no units"));
        }
        info!(
            "Loaded experiment {:?}: {} units, {} scheduled activations, {}ms",
            experiment.name,
            experiment.units.len(),
            experiment.activations.len(),
            experiment.duration().as_millis()
        );

        let trace = Arc::new(Mutex::new(TraceBuffer::new(self.sample_rate)));
        let mut network = self.build_network(&experiment, &trace)?;

        network.start()?;
        let begin = Instant::now();

        for activation in experiment.schedule() {
            let at = Duration::from(activation.start);
            let now = begin.elapsed();
            if at > now {
                thread::sleep(at - now);
            }
            info!(
                "Activating {} at level {} for {}ms",
                activation.unit,
                activation.level,
                activation.duration.as_millis()
            );
            network.activate_unit_by_name(&activation.unit, activation.level, activation.duration)?;
        }

        let total = Duration::from(experiment.duration()) + Duration::from_millis(self.settle_ms);
        let elapsed = begin.elapsed();
        if total > elapsed {
            thread::sleep(total - elapsed);
        }

        let frequency = network.frequency();
        network.stop();
        info!(
            "Experiment completed: {}ms wall time, {} Hz update rate",
            begin.elapsed().as_millis(),
            frequency
        );

        if let Some(path) = &self.csv {
            let csv = trace.lock().to_csv(&network.units_names());
            std::fs::write(path, csv)?;
            info!("Wrote activation trace to {}", path.display());
        }

        if self.record {
            print!("{}", network.save_record());
        }

        Ok(())
    }

    /// Assemble the network from the experiment description
    fn build_network(
        &self,
        experiment: &Experiment,
        trace: &Arc<Mutex<TraceBuffer>>,
    ) -> CliResult<MemoryNetwork> {
        let sink_trace = Arc::clone(trace);
        let mut builder = NetworkBuilder::new()
            .with_units(experiment.units.iter().cloned())
            .recording(self.record)
            .activation_sink(move |t, levels| sink_trace.lock().observe(t, levels));

        for (name, value) in &experiment.parameters {
            if name == "MaxFreq" {
                builder = builder.max_frequency(*value);
            } else {
                builder = builder.parameter(name, *value);
            }
        }
        if let Some(hz) = self.max_frequency {
            builder = builder.max_frequency(hz);
        }

        Ok(builder.build()?)
    }
}
