//! Decimated activation traces and CSV export
//!
//! The network invokes its sink every step; at kilohertz update rates
//! that is far denser than any plot needs, so the buffer keeps a sample
//! only when the configured sampling period has passed since the last
//! one kept.

use std::fmt::Write as _;

use memnet_core::Time;

/// Default trace sampling rate (Hz)
pub const DEFAULT_SAMPLE_RATE: f64 = 500.0;

/// Decimating buffer of `(timestamp, activation levels)` samples
#[derive(Debug, Clone)]
pub struct TraceBuffer {
    sample_period_us: u64,
    last_sample_us: u64,
    timestamps_us: Vec<u64>,
    samples: Vec<Vec<f64>>,
}

impl TraceBuffer {
    /// Create a buffer sampling at `rate_hz` (0 keeps every sample)
    pub fn new(rate_hz: f64) -> Self {
        let sample_period_us = if rate_hz > 0.0 {
            (1_000_000.0 / rate_hz) as u64
        } else {
            0
        };
        Self {
            sample_period_us,
            last_sample_us: 0,
            timestamps_us: Vec::new(),
            samples: Vec::new(),
        }
    }

    /// Offer a snapshot; it is kept if the sampling period has passed
    pub fn observe(&mut self, t: Time, levels: &[f64]) {
        let t_us = t.as_micros();
        if !self.samples.is_empty() && t_us.saturating_sub(self.last_sample_us) <= self.sample_period_us
        {
            return;
        }
        self.last_sample_us = t_us;
        self.timestamps_us.push(t_us);
        self.samples.push(levels.to_vec());
    }

    /// Number of kept samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether nothing has been kept yet
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Render the trace as CSV with a `time_ms` column and one column
    /// per unit
    ///
    /// Samples taken before a dynamically added unit existed leave that
    /// unit's cell empty.
    pub fn to_csv(&self, names: &[String]) -> String {
        let mut out = String::new();
        out.push_str("time_ms");
        for name in names {
            let _ = write!(out, ",{}", name);
        }
        out.push('\n');

        for (t_us, levels) in self.timestamps_us.iter().zip(&self.samples) {
            let _ = write!(out, "{}", *t_us as f64 / 1_000.0);
            for k in 0..names.len() {
                match levels.get(k) {
                    Some(level) => {
                        let _ = write!(out, ",{}", level);
                    }
                    None => out.push(','),
                }
            }
            out.push('\n');
        }
        out
    }
}

impl Default for TraceBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimation() {
        let mut trace = TraceBuffer::new(500.0); // keep at most every 2ms
        for k in 1..=10u64 {
            trace.observe(Time::from_millis(k), &[0.1 * k as f64]);
        }
        // kept: 1ms, then every sample more than 2ms after the last kept
        assert_eq!(trace.len(), 4);
    }

    #[test]
    fn test_unthrottled_keeps_everything() {
        let mut trace = TraceBuffer::new(0.0);
        for k in 1..=5u64 {
            trace.observe(Time::from_millis(k), &[0.0]);
        }
        assert_eq!(trace.len(), 5);
    }

    #[test]
    fn test_csv_layout() {
        let mut trace = TraceBuffer::new(0.0);
        trace.observe(Time::from_millis(1), &[0.5]);
        trace.observe(Time::from_millis(2), &[0.25, -0.1]);

        let names = vec!["apple".to_string(), "pear".to_string()];
        let csv = trace.to_csv(&names);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "time_ms,apple,pear");
        // a sample predating unit "pear" leaves its cell empty
        assert_eq!(lines[1], "1,0.5,");
        assert_eq!(lines[2], "2,0.25,-0.1");
        assert_eq!(lines.len(), 3);
    }
}
