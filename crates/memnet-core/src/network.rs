//! The thread-safe memory network handle and its update loop
//!
//! [`MemoryNetwork`] bundles the mutable network state behind a single
//! mutex and runs the step kernel on a dedicated worker thread. All
//! external access (stimulation, snapshots, configuration, lifecycle)
//! goes through the handle and serializes with step execution; the worker
//! owns its clock, so throttling sleeps never happen under the lock.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::clock::{ClockTick, StepClock, TimeMode};
use crate::error::{NetworkError, Result};
use crate::params::NetworkParams;
use crate::record::{render_report, StimulationRecord};
use crate::state::NetworkState;
use crate::time::Time;
use crate::unit::{UnitId, UnitTable};
use crate::weights::WeightMatrix;

/// Default level for [`MemoryNetwork::activate_unit`]
pub const DEFAULT_STIMULATION_LEVEL: f64 = 1.0;

/// Default duration for [`MemoryNetwork::activate_unit`]
pub const DEFAULT_STIMULATION_DURATION: Time = Time::from_millis(200);

/// Callback invoked by the worker every step with the elapsed time and a
/// snapshot of a network vector
///
/// The slice is only valid for the duration of the call. Sinks run on the
/// worker thread and must return well within the step period; any
/// decimation (e.g. sampling at 500 Hz) is the sink's responsibility.
pub type LogSink = Box<dyn FnMut(Time, &[f64]) + Send>;

/// State bundle guarded by the network mutex
struct Inner {
    units: UnitTable,
    state: NetworkState,
    params: NetworkParams,
    record: StimulationRecord,
    recording: bool,
    activation_sink: Option<LogSink>,
    external_sink: Option<LogSink>,
    mode: TimeMode,
    min_period: Time,
    started_at: Option<Instant>,
    sim_elapsed: Time,
    measured_freq: u32,
}

impl Inner {
    /// Elapsed time since the worker entered its loop
    fn elapsed(&self) -> Time {
        match self.mode {
            TimeMode::Physical => self
                .started_at
                .map(|t| Time::from(t.elapsed()))
                .unwrap_or(Time::ZERO),
            TimeMode::Simulated => self.sim_elapsed,
        }
    }

    /// Write an external activation, recording it if requested
    ///
    /// Requests for units the worker has not yet grown into the vectors
    /// are dropped. Commands issued while idle are recorded at time zero,
    /// matching the elapsed-time contract.
    fn stimulate(&mut self, id: UnitId, level: f64, duration: Time, running: bool) {
        if id.index() >= self.state.size() {
            return;
        }
        if self.recording {
            let now = if running { self.elapsed() } else { Time::ZERO };
            self.record.record(id.index(), level, now, duration);
        }
        self.state.apply_stimulus(id.index(), level, duration);
    }

    /// One iteration of the worker loop under the lock
    fn advance(&mut self, tick: ClockTick) {
        if self.mode == TimeMode::Simulated {
            self.sim_elapsed = tick.elapsed;
        }
        if let Some(hz) = tick.frequency {
            self.measured_freq = hz;
        }

        // Units added since the last step: grow the vectors, preserving
        // all prior values
        let target = self.units.len();
        if target > self.state.size() {
            log::debug!(
                "growing network from {} to {} units",
                self.state.size(),
                target
            );
            self.state.grow_to(target, &self.params);
            self.record.grow_to(target);
        }

        if self.state.size() == 0 {
            return;
        }

        self.state.step_activations(&self.params, tick.dt);

        if let Some(sink) = self.activation_sink.as_mut() {
            sink(tick.elapsed, self.state.activations());
        }
        if let Some(sink) = self.external_sink.as_mut() {
            sink(tick.elapsed, self.state.external());
        }

        self.state.step_weights(&self.params, tick.dt);
        self.state.decay_external(tick.dt);
    }
}

struct Shared {
    inner: Mutex<Inner>,
    running: AtomicBool,
}

/// Worker loop: advance the network at a bounded rate until stopped
fn run_worker(shared: Arc<Shared>) {
    log::info!("memory network worker started");

    let (mode, min_period) = {
        let inner = shared.inner.lock();
        (inner.mode, inner.min_period)
    };
    let mut clock = StepClock::start(mode, min_period);
    {
        let mut inner = shared.inner.lock();
        inner.started_at = Some(clock.started_at());
        inner.sim_elapsed = Time::ZERO;
        inner.measured_freq = 0;
    }
    shared.running.store(true, Ordering::SeqCst);

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        while shared.running.load(Ordering::SeqCst) {
            // may sleep (physical mode); the lock is not held here
            let tick = clock.tick();
            shared.inner.lock().advance(tick);
        }
    }));

    if outcome.is_err() {
        shared.running.store(false, Ordering::SeqCst);
        log::error!("memory network worker failed and was stopped");
    }
    log::info!("memory network worker finished");
}

/// A real-time associative memory network
///
/// Units carry scalar activations that evolve under external stimulation
/// and mutual excitation/inhibition, with Hebbian updates on the weights
/// between co-stimulated units. The network is advanced by a background
/// worker between [`MemoryNetwork::start`] and [`MemoryNetwork::stop`];
/// the handle can be driven from another thread while it runs.
pub struct MemoryNetwork {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl MemoryNetwork {
    /// Create an empty network with default parameters
    ///
    /// Physical time, no rate limit, recording off.
    pub fn new() -> Self {
        Self::from_parts(
            UnitTable::new(),
            NetworkParams::default(),
            None,
            None,
            TimeMode::Physical,
            Time::ZERO,
            false,
        )
    }

    /// Assemble a network from builder-validated pieces
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        units: UnitTable,
        params: NetworkParams,
        activation_sink: Option<LogSink>,
        external_sink: Option<LogSink>,
        mode: TimeMode,
        min_period: Time,
        recording: bool,
    ) -> Self {
        let n = units.len();
        let state = NetworkState::new(n, &params);
        let mut record = StimulationRecord::new();
        record.grow_to(n);

        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    units,
                    state,
                    params,
                    record,
                    recording,
                    activation_sink,
                    external_sink,
                    mode,
                    min_period,
                    started_at: None,
                    sim_elapsed: Time::ZERO,
                    measured_freq: 0,
                }),
                running: AtomicBool::new(false),
            }),
            worker: None,
        }
    }

    // ------------------------------------------------------------------
    // Unit management

    /// Append a named unit, returning its assigned ID
    ///
    /// Legal while running: the worker grows its vectors at the next step.
    /// When the network is idle the vectors grow immediately.
    pub fn add_unit(&self, name: impl Into<String>) -> Result<UnitId> {
        let name = name.into();
        let mut inner = self.shared.inner.lock();
        log::debug!("adding unit {:?}", name);
        let id = inner.units.add(name)?;
        if !self.shared.running.load(Ordering::SeqCst) {
            let n = inner.units.len();
            let params = inner.params;
            inner.state.grow_to(n, &params);
            inner.record.grow_to(n);
        }
        Ok(id)
    }

    /// Whether a unit with this name exists
    pub fn has_unit(&self, name: &str) -> bool {
        self.shared.inner.lock().units.contains(name)
    }

    /// Look up the ID of a named unit
    pub fn unit_id(&self, name: &str) -> Result<UnitId> {
        self.shared.inner.lock().units.id_of(name)
    }

    /// All unit names, in insertion order
    pub fn units_names(&self) -> Vec<String> {
        self.shared.inner.lock().units.names().to_vec()
    }

    /// Define the full unit name list of a fresh network
    ///
    /// Indices and names are immutable once assigned, so this is only
    /// legal while the network has no units, and never while running.
    pub fn set_units_names<I, S>(&self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.is_running() {
            return Err(NetworkError::running_locked("set the unit names"));
        }
        let mut inner = self.shared.inner.lock();
        if !inner.units.is_empty() {
            return Err(NetworkError::config_conflict(
                "unit names are fixed once units exist",
            ));
        }
        let units = UnitTable::from_names(names)?;
        let n = units.len();
        let params = inner.params;
        inner.units = units;
        inner.state.grow_to(n, &params);
        inner.record.grow_to(n);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Stimulation

    /// Command an external activation of `level` held for `duration`
    ///
    /// An ID at or past the current internal size belongs to a unit the
    /// worker has not yet observed; the request is silently dropped.
    pub fn activate_unit(&self, id: UnitId, level: f64, duration: Time) {
        let running = self.is_running();
        self.shared.inner.lock().stimulate(id, level, duration, running);
    }

    /// Command an external activation by unit name
    pub fn activate_unit_by_name(&self, name: &str, level: f64, duration: Time) -> Result<()> {
        let running = self.is_running();
        let mut inner = self.shared.inner.lock();
        let id = inner.units.id_of(name)?;
        inner.stimulate(id, level, duration, running);
        Ok(())
    }

    // ------------------------------------------------------------------
    // State access

    /// Snapshot of the current activations
    pub fn activations(&self) -> Vec<f64> {
        self.shared.inner.lock().state.activations().to_vec()
    }

    /// Snapshot of the current weight matrix
    pub fn weights(&self) -> WeightMatrix {
        self.shared.inner.lock().state.weights().clone()
    }

    /// Number of units the state vectors currently hold
    pub fn size(&self) -> usize {
        self.shared.inner.lock().state.size()
    }

    /// Last measured update frequency (Hz), physical mode only
    pub fn frequency(&self) -> u32 {
        self.shared.inner.lock().measured_freq
    }

    /// Elapsed time since `start`, or zero while not running
    pub fn elapsed_time(&self) -> Time {
        if !self.is_running() {
            return Time::ZERO;
        }
        self.shared.inner.lock().elapsed()
    }

    // ------------------------------------------------------------------
    // Configuration

    /// Set a network parameter by name (`Dg`, `Lg`, `Eg`, `Ig`, `Amax`,
    /// `Amin`, `Arest`, `Winit`)
    ///
    /// Rejected while running. Setting `Arest` also refills the rest
    /// vector and the activations.
    pub fn set_parameter(&self, name: &str, value: f64) -> Result<()> {
        if self.is_running() {
            return Err(NetworkError::running_locked("change network parameters"));
        }
        let mut inner = self.shared.inner.lock();
        inner.params.set(name, value)?;
        log::debug!("set network parameter {} to {}", name, value);
        if name == "Arest" {
            inner.state.set_rest(value);
        }
        Ok(())
    }

    /// Get a network parameter by name
    pub fn get_parameter(&self, name: &str) -> Result<f64> {
        self.shared.inner.lock().params.get(name)
    }

    /// Current parameter set
    pub fn parameters(&self) -> NetworkParams {
        self.shared.inner.lock().params
    }

    /// Limit the update rate to `hz` steps per second
    ///
    /// `hz = 0` removes the limit, which is only meaningful with physical
    /// time; in simulated mode an unbounded rate is rejected. Rejected
    /// while running.
    pub fn max_frequency(&self, hz: f64) -> Result<()> {
        if self.is_running() {
            return Err(NetworkError::running_locked("change the update frequency"));
        }
        if hz < 0.0 || !hz.is_finite() {
            return Err(NetworkError::invalid_parameter(
                "MaxFreq",
                hz.to_string(),
                ">= 0",
            ));
        }
        let mut inner = self.shared.inner.lock();
        if hz == 0.0 {
            if inner.mode == TimeMode::Simulated {
                return Err(NetworkError::config_conflict(
                    "cannot run at an unbounded rate in simulated time",
                ));
            }
            inner.min_period = Time::ZERO;
        } else {
            inner.min_period = Time::from_micros((1_000_000.0 / hz) as u64);
        }
        log::debug!("internal minimal period set to {}", inner.min_period);
        Ok(())
    }

    /// The minimal step period the worker is throttled to
    pub fn internal_period(&self) -> Time {
        self.shared.inner.lock().min_period
    }

    /// Select the time source: wall clock (`true`) or virtual (`false`)
    ///
    /// Rejected while running.
    pub fn use_physical_time(&self, physical: bool) -> Result<()> {
        if self.is_running() {
            return Err(NetworkError::running_locked("change the time source"));
        }
        self.shared.inner.lock().mode = if physical {
            TimeMode::Physical
        } else {
            TimeMode::Simulated
        };
        Ok(())
    }

    /// Whether step deltas come from the wall clock
    pub fn is_using_physical_time(&self) -> bool {
        self.shared.inner.lock().mode == TimeMode::Physical
    }

    // ------------------------------------------------------------------
    // Lifecycle

    /// Spawn the worker and wait until it has entered its loop
    ///
    /// Fails if the network is already running, or in simulated mode
    /// without a rate limit (a zero period would mean an infinite rate).
    pub fn start(&mut self) -> Result<()> {
        if self.is_running() {
            return Err(NetworkError::AlreadyRunning);
        }
        // a worker that stopped on its own still needs joining
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }

        {
            let inner = self.shared.inner.lock();
            if inner.mode == TimeMode::Simulated && inner.min_period.is_zero() {
                return Err(NetworkError::config_conflict(
                    "simulated time needs a finite rate; call max_frequency first",
                ));
            }
        }

        let shared = Arc::clone(&self.shared);
        let handle = thread::Builder::new()
            .name("memnet-worker".into())
            .spawn(move || run_worker(shared))
            .map_err(|e| NetworkError::internal(format!("failed to spawn worker: {}", e)))?;
        self.worker = Some(handle);

        // wait for the worker to be effectively running
        while !self.shared.running.load(Ordering::SeqCst) {
            if self.worker.as_ref().map_or(true, |h| h.is_finished()) {
                return Err(NetworkError::internal(
                    "worker exited before entering its loop",
                ));
            }
            thread::sleep(Duration::from_millis(1));
        }
        Ok(())
    }

    /// Ask the worker to stop and join it
    ///
    /// Cooperative: the worker may finish its in-progress step. The
    /// activations and weights are preserved; a later `start` resumes
    /// from them. No-op when not running.
    pub fn stop(&mut self) {
        self.shared.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }

    /// Whether the worker is currently running
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// Return all activations to rest and forget all weights
    pub fn reset(&self) {
        let mut inner = self.shared.inner.lock();
        let params = inner.params;
        inner.state.reset(&params);
    }

    // ------------------------------------------------------------------
    // Recording

    /// Enable or disable stimulation recording
    pub fn record(&self, enabled: bool) {
        self.shared.inner.lock().recording = enabled;
    }

    /// Whether stimulations are being recorded
    pub fn is_recording(&self) -> bool {
        self.shared.inner.lock().recording
    }

    /// Render the recorded session as an experiment report
    pub fn save_record(&self) -> String {
        let inner = self.shared.inner.lock();
        render_report(
            &inner.params,
            inner.min_period,
            inner.units.names(),
            &inner.record,
        )
    }
}

impl Default for MemoryNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MemoryNetwork {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulated_network(units: &[&str], hz: f64) -> MemoryNetwork {
        let mut net = MemoryNetwork::new();
        for unit in units {
            net.add_unit(*unit).unwrap();
        }
        net.use_physical_time(false).unwrap();
        net.max_frequency(hz).unwrap();
        net
    }

    fn run_for(net: &mut MemoryNetwork, simulated: Time) {
        net.start().unwrap();
        while net.elapsed_time() < simulated {
            thread::sleep(Duration::from_micros(200));
        }
        net.stop();
    }

    #[test]
    fn test_new_network_is_idle_and_empty() {
        let net = MemoryNetwork::new();
        assert!(!net.is_running());
        assert_eq!(net.size(), 0);
        assert_eq!(net.elapsed_time(), Time::ZERO);
        assert_eq!(net.frequency(), 0);
        assert!(net.is_using_physical_time());
    }

    #[test]
    fn test_add_unit_while_idle_grows_immediately() {
        let net = MemoryNetwork::new();
        let apple = net.add_unit("apple").unwrap();
        assert_eq!(apple, UnitId::new(0));
        assert_eq!(net.size(), 1);
        assert_eq!(net.units_names(), vec!["apple".to_string()]);
        assert!(net.has_unit("apple"));
        assert_eq!(net.unit_id("apple").unwrap(), apple);

        assert!(net.add_unit("apple").is_err());
        assert!(net.unit_id("pear").is_err());
    }

    #[test]
    fn test_set_units_names_only_on_fresh_network() {
        let net = MemoryNetwork::new();
        net.set_units_names(["a", "b"]).unwrap();
        assert_eq!(net.size(), 2);
        assert!(net.set_units_names(["x"]).is_err());
    }

    #[test]
    fn test_activate_past_size_is_dropped() {
        let net = MemoryNetwork::new();
        net.add_unit("a").unwrap();
        // no panic, no effect
        net.activate_unit(UnitId::new(17), 1.0, Time::from_millis(10));
        assert_eq!(net.activations().len(), 1);
    }

    #[test]
    fn test_unknown_name_is_reported() {
        let net = MemoryNetwork::new();
        let result = net.activate_unit_by_name("ghost", 1.0, Time::from_millis(10));
        assert!(matches!(result, Err(NetworkError::UnknownUnit { .. })));
    }

    #[test]
    fn test_parameters_locked_while_running() {
        let mut net = simulated_network(&["a"], 1000.0);
        net.start().unwrap();

        assert!(matches!(
            net.set_parameter("Dg", 0.5),
            Err(NetworkError::RunningLocked { .. })
        ));
        assert!(matches!(
            net.max_frequency(10.0),
            Err(NetworkError::RunningLocked { .. })
        ));
        assert!(matches!(
            net.use_physical_time(true),
            Err(NetworkError::RunningLocked { .. })
        ));
        // reads stay available
        assert_eq!(net.get_parameter("Dg").unwrap(), 0.2);

        net.stop();
        net.set_parameter("Dg", 0.5).unwrap();
        assert_eq!(net.get_parameter("Dg").unwrap(), 0.5);
    }

    #[test]
    fn test_arest_refills_activations() {
        let net = MemoryNetwork::new();
        net.add_unit("a").unwrap();
        net.set_parameter("Arest", -0.05).unwrap();
        assert_eq!(net.activations(), vec![-0.05]);
        assert_eq!(net.get_parameter("Arest").unwrap(), -0.05);
    }

    #[test]
    fn test_simulated_mode_requires_rate_limit() {
        let mut net = MemoryNetwork::new();
        net.add_unit("a").unwrap();
        net.use_physical_time(false).unwrap();

        // no limit configured: start is a configuration conflict
        assert!(matches!(
            net.start(),
            Err(NetworkError::ConfigConflict { .. })
        ));
        // and an explicit zero limit is rejected outright
        assert!(matches!(
            net.max_frequency(0.0),
            Err(NetworkError::ConfigConflict { .. })
        ));

        net.max_frequency(1000.0).unwrap();
        assert_eq!(net.internal_period(), Time::from_millis(1));
        net.start().unwrap();
        net.stop();
    }

    #[test]
    fn test_double_start_is_an_error() {
        let mut net = simulated_network(&["a"], 1000.0);
        net.start().unwrap();
        assert!(matches!(net.start(), Err(NetworkError::AlreadyRunning)));
        net.stop();
        // restart after stop is fine
        net.start().unwrap();
        net.stop();
    }

    #[test]
    fn test_elapsed_time_zero_unless_running() {
        let mut net = simulated_network(&["a"], 1000.0);
        assert_eq!(net.elapsed_time(), Time::ZERO);
        run_for(&mut net, Time::from_millis(5));
        assert_eq!(net.elapsed_time(), Time::ZERO);
    }

    #[test]
    fn test_stop_start_preserves_state() {
        let mut net = simulated_network(&["x", "y"], 1000.0);
        net.activate_unit_by_name("x", 1.0, Time::from_millis(20))
            .unwrap();
        net.activate_unit_by_name("y", 1.0, Time::from_millis(20))
            .unwrap();
        run_for(&mut net, Time::from_millis(50));

        let w1 = net.weights();
        let a1 = net.activations();
        assert!(w1.get(0, 1).unwrap() > 0.0);

        run_for(&mut net, Time::from_millis(10));

        // the pulses are over, so the weights cannot have moved
        let w2 = net.weights();
        assert_eq!(w2.get(0, 1), w1.get(0, 1));
        // activations continued from the preserved values (not from rest)
        let a2 = net.activations();
        assert!((a2[0] - a1[0]).abs() < 0.05);
    }

    #[test]
    fn test_reset_wipes_state() {
        let mut net = simulated_network(&["x", "y"], 1000.0);
        net.activate_unit_by_name("x", 1.0, Time::from_millis(20))
            .unwrap();
        net.activate_unit_by_name("y", 1.0, Time::from_millis(20))
            .unwrap();
        run_for(&mut net, Time::from_millis(30));
        assert!(net.weights().defined_count() > 0);

        net.reset();
        assert_eq!(net.weights().defined_count(), 0);
        assert_eq!(net.activations(), vec![-0.1, -0.1]);
    }

    #[test]
    fn test_recording_produces_report() {
        let net = MemoryNetwork::new();
        net.add_unit("apple").unwrap();
        net.record(true);
        assert!(net.is_recording());
        net.activate_unit(UnitId::new(0), 1.0, Time::from_millis(200));

        let report = net.save_record();
        assert!(report.contains("- apple:"));
        assert!(report.contains("[0,200] at 1"));
    }
}
