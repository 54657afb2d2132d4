//! Experiment description model
//!
//! An experiment names a set of units, assigns network parameters, and
//! schedules external activations on a millisecond timeline. `Plots`
//! sections are carried through for downstream presentation; the network
//! itself never sees them.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use memnet_core::Time;

/// One scheduled external activation
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledActivation {
    /// Target unit name
    pub unit: String,
    /// When to issue the activation, from experiment start
    pub start: Time,
    /// How long the unit is held at the level
    pub duration: Time,
    /// Commanded activation level
    pub level: f64,
}

impl ScheduledActivation {
    /// End of the activation interval
    pub fn end(&self) -> Time {
        self.start + self.duration
    }
}

/// A plotting window requested by the experiment
#[derive(Debug, Clone, PartialEq)]
pub struct PlotWindow {
    /// Unit to plot
    pub unit: String,
    /// Window start
    pub start: Time,
    /// Window end
    pub stop: Time,
}

/// A parsed experiment description
#[derive(Debug, Clone, Default)]
pub struct Experiment {
    /// Experiment name (the document title)
    pub name: String,
    /// Free-form description paragraph
    pub description: String,
    /// Network parameter assignments, in file order
    pub parameters: Vec<(String, f64)>,
    /// Unit names, in file order
    pub units: Vec<String>,
    /// Scheduled activations
    pub activations: Vec<ScheduledActivation>,
    /// Requested plot windows
    pub plots: Vec<PlotWindow>,
}

impl Experiment {
    /// Total duration: the latest activation end or plot stop
    pub fn duration(&self) -> Time {
        let last_activation = self
            .activations
            .iter()
            .map(|a| a.end())
            .max()
            .unwrap_or(Time::ZERO);
        let last_plot = self
            .plots
            .iter()
            .map(|p| p.stop)
            .max()
            .unwrap_or(Time::ZERO);
        last_activation.max(last_plot)
    }

    /// Activations ordered by start time
    pub fn schedule(&self) -> Vec<&ScheduledActivation> {
        let mut schedule: Vec<_> = self.activations.iter().collect();
        schedule.sort_by_key(|a| a.start);
        schedule
    }

    /// Render the textual experiment summary
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Summary of the experiment \"{}\"", self.name);
        out.push('\n');

        out.push_str("Network parameters:\n");
        for (name, value) in &self.parameters {
            let _ = writeln!(out, "- {}: {}", name, value);
        }

        let _ = writeln!(out, "\n{} defined units:", self.units.len());
        for unit in &self.units {
            let _ = writeln!(out, "{}", unit);
        }

        out.push_str("\nActivations plan:\n");
        let mut by_start: BTreeMap<u64, Vec<&ScheduledActivation>> = BTreeMap::new();
        for activation in &self.activations {
            by_start
                .entry(activation.start.as_millis())
                .or_default()
                .push(activation);
        }
        for (start_ms, activations) in &by_start {
            let _ = writeln!(out, "  - at {}ms:", start_ms);
            for activation in activations {
                let _ = writeln!(
                    out,
                    "    - {} for {}ms at {}",
                    activation.unit,
                    activation.duration.as_millis(),
                    activation.level
                );
            }
        }

        out.push_str("\nRequested plots:\n");
        for plot in &self.plots {
            let _ = writeln!(
                out,
                "Unit <{}> from {}ms to {}ms",
                plot.unit,
                plot.start.as_millis(),
                plot.stop.as_millis()
            );
        }

        let _ = writeln!(out, "\nTotal duration: {}ms", self.duration().as_millis());
        out
    }
}
