//! Network state vectors and the step kernel
//!
//! [`NetworkState`] owns everything one discrete advance of the network
//! needs: the activation vector, the rest vector, the external
//! activations with their remaining durations, the per-step derived
//! internal/net vectors, and the weight matrix.
//!
//! The kernel is split at its logging point so the update loop can emit
//! snapshots between the activation update and the weight update:
//! [`NetworkState::step_activations`] runs connection creation through
//! clamping, [`NetworkState::step_weights`] runs the Hebbian pass, and
//! [`NetworkState::decay_external`] expires finished stimulations.

use crate::params::NetworkParams;
use crate::plasticity::HebbianRule;
use crate::time::Time;
use crate::weights::WeightMatrix;

/// Complete mutable state of a memory network
#[derive(Debug, Clone)]
pub struct NetworkState {
    activations: Vec<f64>,
    rest: Vec<f64>,
    external: Vec<f64>,
    // Remaining stimulation time per unit (us)
    external_decay: Vec<u64>,
    internal: Vec<f64>,
    net: Vec<f64>,
    weights: WeightMatrix,
}

impl NetworkState {
    /// Create a state for `n` units, all at rest
    pub fn new(n: usize, params: &NetworkParams) -> Self {
        Self {
            activations: vec![params.a_rest; n],
            rest: vec![params.a_rest; n],
            external: vec![0.0; n],
            external_decay: vec![0; n],
            internal: vec![0.0; n],
            net: vec![0.0; n],
            weights: WeightMatrix::new(n),
        }
    }

    /// Number of units
    pub fn size(&self) -> usize {
        self.activations.len()
    }

    /// Current activation levels
    pub fn activations(&self) -> &[f64] {
        &self.activations
    }

    /// Current external activation levels
    pub fn external(&self) -> &[f64] {
        &self.external
    }

    /// Current internal activations (as of the last step)
    pub fn internal(&self) -> &[f64] {
        &self.internal
    }

    /// Weight matrix
    pub fn weights(&self) -> &WeightMatrix {
        &self.weights
    }

    /// Grow to `n` units, preserving all existing values
    ///
    /// New units start at rest with no external drive and an all-absent
    /// weight row and column.
    pub fn grow_to(&mut self, n: usize, params: &NetworkParams) {
        if n <= self.size() {
            return;
        }
        self.activations.resize(n, params.a_rest);
        self.rest.resize(n, params.a_rest);
        self.external.resize(n, 0.0);
        self.external_decay.resize(n, 0);
        self.internal.resize(n, 0.0);
        self.net.resize(n, 0.0);
        self.weights.grow_to(n);
    }

    /// Return every vector to its initial value and forget all weights
    pub fn reset(&mut self, params: &NetworkParams) {
        self.rest.fill(params.a_rest);
        self.activations.fill(params.a_rest);
        self.external.fill(0.0);
        self.external_decay.fill(0);
        self.internal.fill(0.0);
        self.net.fill(0.0);
        self.weights.reset();
    }

    /// Refill the rest vector and the activations after an `Arest` change
    pub fn set_rest(&mut self, a_rest: f64) {
        self.rest.fill(a_rest);
        self.activations.fill(a_rest);
    }

    /// Command an external activation: hold `level` for `duration`
    pub fn apply_stimulus(&mut self, index: usize, level: f64, duration: Time) {
        self.external[index] = level;
        self.external_decay[index] = duration.as_micros();
    }

    /// Phases 1-6 of the kernel: connection creation, internal
    /// activations, net drive, activation update, decay toward rest, clamp
    pub fn step_activations(&mut self, params: &NetworkParams, dt: Time) {
        if self.size() == 0 {
            return;
        }

        // Establish connections between co-stimulated units
        self.weights.connect_coactive(&self.external, params.w_init);

        // Internal activations from the defined weights
        for i in 0..self.size() {
            self.internal[i] = self.weights.weighted_sum(i, &self.activations);
        }

        // Net drive
        for i in 0..self.size() {
            self.net[i] = params.eg * self.external[i] + params.ig * self.internal[i];
        }

        // Activation update; the drive acts once per step
        for i in 0..self.size() {
            if self.net[i] > 0.0 {
                self.activations[i] += self.net[i] * (params.a_max - self.activations[i]);
            } else {
                self.activations[i] += self.net[i] * (self.activations[i] - params.a_min);
            }
        }

        // Decay toward rest
        let dt_ms = dt.as_millis_f64();
        for i in 0..self.size() {
            self.activations[i] -= params.dg * dt_ms * (self.activations[i] - self.rest[i]);
        }

        // Clamp into [Amin, Amax]
        for a in &mut self.activations {
            *a = params.a_max.min(params.a_min.max(*a));
        }
    }

    /// Phase 8 of the kernel: the externally gated Hebbian weight update
    pub fn step_weights(&mut self, params: &NetworkParams, dt: Time) {
        HebbianRule::new(params.lg).apply(
            &mut self.weights,
            &self.activations,
            &self.external,
            dt.as_millis_f64(),
        );
    }

    /// Phase 9 of the kernel: count down stimulation durations
    ///
    /// An external activation holds its commanded level until its duration
    /// is spent, then is forced to zero on the following step.
    pub fn decay_external(&mut self, dt: Time) {
        let dt_us = dt.as_micros();
        for i in 0..self.size() {
            if self.external_decay[i] > 0 {
                self.external_decay[i] = self.external_decay[i].saturating_sub(dt_us);
            } else {
                self.external[i] = 0.0;
            }
        }
    }

    /// One full advance of the network by `dt`, without observers
    pub fn step(&mut self, params: &NetworkParams, dt: Time) {
        self.step_activations(params, dt);
        self.step_weights(params, dt);
        self.decay_external(dt);
    }
}
