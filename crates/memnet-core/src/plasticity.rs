//! Hebbian weight dynamics
//!
//! Weights only learn while both endpoints are externally stimulated (the
//! co-activation gate): internal reverberation alone never changes a
//! weight. The update is soft-bounded so weights stay inside (-1, 1).

use crate::weights::WeightMatrix;

/// Externally gated, soft-bounded Hebbian update rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HebbianRule {
    /// Learning rate (per ms)
    pub learning_rate: f64,
}

impl HebbianRule {
    /// Create a rule with the given per-ms learning rate
    pub fn new(learning_rate: f64) -> Self {
        Self { learning_rate }
    }

    /// Increment for a single weight given the endpoint activations
    ///
    /// With `p = a_i * a_j`, correlated activity (`p > 0`) pushes the
    /// weight toward 1 through the `(1 - w)` bound, anti-correlated
    /// activity pushes it toward -1 through the `(1 + w)` bound.
    pub fn weight_delta(&self, weight: f64, a_i: f64, a_j: f64, dt_ms: f64) -> f64 {
        let p = a_i * a_j;
        if p > 0.0 {
            self.learning_rate * dt_ms * p * (1.0 - weight)
        } else {
            self.learning_rate * dt_ms * p * (1.0 + weight)
        }
    }

    /// Apply the gated update to every defined, co-stimulated connection
    ///
    /// Symmetry is preserved because each pair is updated once and written
    /// to both triangles.
    pub fn apply(
        &self,
        weights: &mut WeightMatrix,
        activations: &[f64],
        external: &[f64],
        dt_ms: f64,
    ) {
        let n = weights.size();
        if n < 2 {
            return;
        }
        for i in 0..n - 1 {
            if external[i] == 0.0 {
                continue;
            }
            for j in i + 1..n {
                if external[j] == 0.0 {
                    continue;
                }
                if let Some(w) = weights.get(i, j) {
                    let delta = self.weight_delta(w, activations[i], activations[j], dt_ms);
                    weights.set(i, j, w + delta);
                }
            }
        }
    }
}
