//! Builder for configuring a network before it exists
//!
//! Collects units, parameters, sinks, and the time source, then validates
//! everything at once in [`NetworkBuilder::build`].

use crate::clock::TimeMode;
use crate::error::{NetworkError, Result};
use crate::network::{LogSink, MemoryNetwork};
use crate::params::NetworkParams;
use crate::time::Time;
use crate::unit::UnitTable;

/// Builder for [`MemoryNetwork`]
#[derive(Default)]
pub struct NetworkBuilder {
    size: Option<usize>,
    names: Vec<String>,
    params: NetworkParams,
    overrides: Vec<(String, f64)>,
    activation_sink: Option<LogSink>,
    external_sink: Option<LogSink>,
    simulated_time: bool,
    max_frequency: Option<f64>,
    recording: bool,
}

impl NetworkBuilder {
    /// Start building a network with default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `n` anonymous units, named `unit-0` .. `unit-{n-1}`
    pub fn with_size(mut self, n: usize) -> Self {
        self.size = Some(n);
        self
    }

    /// Add one named unit
    pub fn add_unit(mut self, name: impl Into<String>) -> Self {
        self.names.push(name.into());
        self
    }

    /// Add several named units
    pub fn with_units<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.extend(names.into_iter().map(Into::into));
        self
    }

    /// Use a complete parameter set
    pub fn params(mut self, params: NetworkParams) -> Self {
        self.params = params;
        self
    }

    /// Override one parameter by name (applied and checked at build time)
    pub fn parameter(mut self, name: impl Into<String>, value: f64) -> Self {
        self.overrides.push((name.into(), value));
        self
    }

    /// Install the per-step activation snapshot sink
    pub fn activation_sink<F>(mut self, sink: F) -> Self
    where
        F: FnMut(Time, &[f64]) + Send + 'static,
    {
        self.activation_sink = Some(Box::new(sink));
        self
    }

    /// Install the per-step external-activation snapshot sink
    pub fn external_sink<F>(mut self, sink: F) -> Self
    where
        F: FnMut(Time, &[f64]) + Send + 'static,
    {
        self.external_sink = Some(Box::new(sink));
        self
    }

    /// Select the time source: wall clock (`true`) or virtual (`false`)
    pub fn physical_time(mut self, physical: bool) -> Self {
        self.simulated_time = !physical;
        self
    }

    /// Limit the update rate (Hz); `0` means unthrottled
    pub fn max_frequency(mut self, hz: f64) -> Self {
        self.max_frequency = Some(hz);
        self
    }

    /// Enable stimulation recording from the start
    pub fn recording(mut self, enabled: bool) -> Self {
        self.recording = enabled;
        self
    }

    /// Validate the configuration and assemble the network
    pub fn build(self) -> Result<MemoryNetwork> {
        let mut params = self.params;
        for (name, value) in &self.overrides {
            params.set(name, *value)?;
        }
        params.validate()?;

        let units = match (self.size, self.names.is_empty()) {
            (Some(_), false) => {
                return Err(NetworkError::config_conflict(
                    "give either a size or unit names, not both",
                ));
            }
            (Some(n), true) => UnitTable::from_names((0..n).map(|i| format!("unit-{}", i)))?,
            (None, _) => UnitTable::from_names(self.names)?,
        };

        let mode = if self.simulated_time {
            TimeMode::Simulated
        } else {
            TimeMode::Physical
        };

        let min_period = match self.max_frequency {
            Some(hz) if hz > 0.0 && hz.is_finite() => Time::from_micros((1_000_000.0 / hz) as u64),
            Some(hz) if hz == 0.0 => {
                if mode == TimeMode::Simulated {
                    return Err(NetworkError::config_conflict(
                        "cannot run at an unbounded rate in simulated time",
                    ));
                }
                Time::ZERO
            }
            Some(hz) => {
                return Err(NetworkError::invalid_parameter(
                    "MaxFreq",
                    hz.to_string(),
                    ">= 0",
                ));
            }
            None => Time::ZERO,
        };

        Ok(MemoryNetwork::from_parts(
            units,
            params,
            self.activation_sink,
            self.external_sink,
            mode,
            min_period,
            self.recording,
        ))
    }
}
