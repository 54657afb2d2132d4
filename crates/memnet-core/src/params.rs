//! Network parameters and their name-keyed access
//!
//! Parameter names follow the experiment-file convention (`Dg`, `Lg`, ...)
//! so that `set_parameter`/`get_parameter` can be driven directly from a
//! parsed experiment description.

use crate::error::{NetworkError, Result};

/// Names recognized by [`NetworkParams::get`] and [`NetworkParams::set`]
pub const PARAMETER_NAMES: [&str; 8] = [
    "Dg", "Lg", "Eg", "Ig", "Amax", "Amin", "Arest", "Winit",
];

/// Parameters governing activation and weight dynamics
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkParams {
    /// Activation decay rate toward rest (per ms)
    pub dg: f64,
    /// Hebbian learning rate (per ms)
    pub lg: f64,
    /// External influence (gain on external activations)
    pub eg: f64,
    /// Internal influence (gain on internal activations)
    pub ig: f64,
    /// Maximum activation
    pub a_max: f64,
    /// Minimum activation
    pub a_min: f64,
    /// Rest activation
    pub a_rest: f64,
    /// Initial weight of newly created connections
    pub w_init: f64,
}

impl Default for NetworkParams {
    fn default() -> Self {
        Self {
            dg: 0.2,      // activation decay per ms
            lg: 0.01,     // learning rate per ms
            eg: 0.6,      // external influence
            ig: 0.3,      // internal influence
            a_max: 1.0,   // maximum activation
            a_min: -0.2,  // minimum activation
            a_rest: -0.1, // rest activation
            w_init: 0.0,  // initial weights
        }
    }
}

impl NetworkParams {
    /// Create new parameters with validation
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        dg: f64,
        lg: f64,
        eg: f64,
        ig: f64,
        a_max: f64,
        a_min: f64,
        a_rest: f64,
        w_init: f64,
    ) -> Result<Self> {
        let params = Self {
            dg,
            lg,
            eg,
            ig,
            a_max,
            a_min,
            a_rest,
            w_init,
        };
        params.validate()?;
        Ok(params)
    }

    /// Validate parameter consistency
    pub fn validate(&self) -> Result<()> {
        if self.dg < 0.0 {
            return Err(NetworkError::invalid_parameter(
                "Dg",
                self.dg.to_string(),
                ">= 0.0",
            ));
        }
        if self.lg < 0.0 {
            return Err(NetworkError::invalid_parameter(
                "Lg",
                self.lg.to_string(),
                ">= 0.0",
            ));
        }
        if self.a_max <= self.a_min {
            return Err(NetworkError::invalid_parameter(
                "Amax",
                format!("{} (with Amin={})", self.a_max, self.a_min),
                "> Amin",
            ));
        }
        if self.a_rest < self.a_min || self.a_rest > self.a_max {
            return Err(NetworkError::invalid_parameter(
                "Arest",
                self.a_rest.to_string(),
                "within [Amin, Amax]",
            ));
        }
        Ok(())
    }

    /// Get a parameter by name
    pub fn get(&self, name: &str) -> Result<f64> {
        match name {
            "Dg" => Ok(self.dg),
            "Lg" => Ok(self.lg),
            "Eg" => Ok(self.eg),
            "Ig" => Ok(self.ig),
            "Amax" => Ok(self.a_max),
            "Amin" => Ok(self.a_min),
            "Arest" => Ok(self.a_rest),
            "Winit" => Ok(self.w_init),
            _ => Err(NetworkError::unknown_parameter(name)),
        }
    }

    /// Set a parameter by name
    pub fn set(&mut self, name: &str, value: f64) -> Result<()> {
        match name {
            "Dg" => self.dg = value,
            "Lg" => self.lg = value,
            "Eg" => self.eg = value,
            "Ig" => self.ig = value,
            "Amax" => self.a_max = value,
            "Amin" => self.a_min = value,
            "Arest" => self.a_rest = value,
            "Winit" => self.w_init = value,
            _ => return Err(NetworkError::unknown_parameter(name)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = NetworkParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.dg, 0.2);
        assert_eq!(params.lg, 0.01);
        assert_eq!(params.eg, 0.6);
        assert_eq!(params.ig, 0.3);
        assert_eq!(params.a_max, 1.0);
        assert_eq!(params.a_min, -0.2);
        assert_eq!(params.a_rest, -0.1);
        assert_eq!(params.w_init, 0.0);
    }

    #[test]
    fn test_validation() {
        // Amax must exceed Amin
        let result = NetworkParams::new(0.2, 0.01, 0.6, 0.3, -0.2, 1.0, -0.1, 0.0);
        assert!(result.is_err());

        // Arest must lie within the clamp interval
        let result = NetworkParams::new(0.2, 0.01, 0.6, 0.3, 1.0, -0.2, -0.5, 0.0);
        assert!(result.is_err());

        // Negative decay rate
        let result = NetworkParams::new(-0.1, 0.01, 0.6, 0.3, 1.0, -0.2, -0.1, 0.0);
        assert!(result.is_err());

        let result = NetworkParams::new(0.2, 0.01, 0.6, 0.3, 1.0, -0.2, -0.1, 0.0);
        assert!(result.is_ok());
    }

    #[test]
    fn test_get_set_roundtrip() {
        let mut params = NetworkParams::default();
        for (i, name) in PARAMETER_NAMES.iter().enumerate() {
            let value = 0.125 * (i as f64 + 1.0);
            params.set(name, value).unwrap();
            assert_eq!(params.get(name).unwrap(), value);
        }
    }

    #[test]
    fn test_unknown_name() {
        let mut params = NetworkParams::default();
        assert!(params.get("MaxFreq").is_err());
        assert!(params.set("Bogus", 1.0).is_err());
    }
}
