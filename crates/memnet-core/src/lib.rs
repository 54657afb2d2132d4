//! Real-time associative memory network engine
//!
//! This crate simulates a fixed-topology recurrent network of scalar
//! units whose activations evolve under external stimulation and mutual
//! excitation/inhibition, with Hebbian weight updates between
//! co-stimulated units. A background worker advances the network at a
//! bounded rate against a physical or simulated clock while the
//! thread-safe [`MemoryNetwork`] handle accepts stimulations and serves
//! snapshots.
//!
//! ```no_run
//! use memnet_core::{NetworkBuilder, Time};
//!
//! # fn main() -> memnet_core::Result<()> {
//! let mut network = NetworkBuilder::new()
//!     .with_units(["apple", "pear"])
//!     .max_frequency(1000.0)
//!     .build()?;
//!
//! network.start()?;
//! network.activate_unit_by_name("apple", 1.0, Time::from_millis(200))?;
//! network.activate_unit_by_name("pear", 1.0, Time::from_millis(200))?;
//! std::thread::sleep(std::time::Duration::from_millis(300));
//! network.stop();
//!
//! // co-stimulation created a symmetric positive weight
//! let weights = network.weights();
//! assert!(weights.get(0, 1).unwrap() > 0.0);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

// Core modules
pub mod builder;
pub mod clock;
pub mod error;
pub mod network;
pub mod params;
pub mod plasticity;
pub mod record;
pub mod state;
pub mod time;
pub mod unit;
pub mod weights;

// Re-export essential types
pub use builder::NetworkBuilder;
pub use clock::{StepClock, TimeMode, FREQUENCY_WINDOW};
pub use error::{NetworkError, Result};
pub use network::{
    LogSink, MemoryNetwork, DEFAULT_STIMULATION_DURATION, DEFAULT_STIMULATION_LEVEL,
};
pub use params::{NetworkParams, PARAMETER_NAMES};
pub use plasticity::HebbianRule;
pub use record::{ActivationInterval, StimulationRecord};
pub use state::NetworkState;
pub use time::Time;
pub use unit::{UnitId, UnitTable};
pub use weights::WeightMatrix;
