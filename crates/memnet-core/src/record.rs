//! Stimulation history recording
//!
//! When recording is enabled, every commanded external activation is
//! appended to a per-unit interval list. Overlapping commands are
//! coalesced so the record stays a clean sequence of
//! `(level, start, duration)` pulses, and the whole session can be
//! rendered back out as an experiment report.

use std::fmt::Write as _;

use crate::params::NetworkParams;
use crate::time::Time;

/// One recorded stimulation interval
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActivationInterval {
    /// Commanded activation level
    pub level: f64,
    /// Start of the interval (elapsed time at the command)
    pub start: Time,
    /// Length of the interval
    pub duration: Time,
}

impl ActivationInterval {
    /// End of the interval
    pub fn end(&self) -> Time {
        self.start + self.duration
    }
}

/// Per-unit lists of recorded stimulation intervals
#[derive(Debug, Clone, Default)]
pub struct StimulationRecord {
    intervals: Vec<Vec<ActivationInterval>>,
}

impl StimulationRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Make room for `n` units
    pub fn grow_to(&mut self, n: usize) {
        if n > self.intervals.len() {
            self.intervals.resize_with(n, Vec::new);
        }
    }

    /// Recorded intervals of one unit
    pub fn intervals(&self, index: usize) -> &[ActivationInterval] {
        self.intervals.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether nothing has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.intervals.iter().all(Vec::is_empty)
    }

    /// Forget everything recorded so far
    pub fn clear(&mut self) {
        for list in &mut self.intervals {
            list.clear();
        }
    }

    /// Append a stimulation, coalescing with the previous interval
    ///
    /// A command that starts after the previous interval ended opens a new
    /// interval. A command overlapping the previous one either extends it
    /// (same level) or trims it and opens a new one (level changed).
    pub fn record(&mut self, index: usize, level: f64, now: Time, duration: Time) {
        self.grow_to(index + 1);
        let list = &mut self.intervals[index];

        match list.last_mut() {
            Some(prev) if prev.end() >= now => {
                if level == prev.level {
                    prev.duration = (now + duration).saturating_sub(prev.start);
                } else {
                    prev.duration = now.saturating_sub(prev.start);
                    list.push(ActivationInterval {
                        level,
                        start: now,
                        duration,
                    });
                }
            }
            _ => list.push(ActivationInterval {
                level,
                start: now,
                duration,
            }),
        }
    }
}

/// Render a recorded session as an experiment report
///
/// The report lists the network parameters (including the update-frequency
/// limit), the unit names, and each unit's stimulation intervals in
/// millisecond resolution, in the experiment-file layout.
pub fn render_report(
    params: &NetworkParams,
    min_period: Time,
    names: &[String],
    record: &StimulationRecord,
) -> String {
    let max_freq = if min_period.is_zero() {
        0.0
    } else {
        1_000_000.0 / min_period.as_micros() as f64
    };

    let mut out = String::new();
    out.push_str("Experiment\n==========\n\n");
    out.push_str("Network Parameters\n------------------\n\n");
    let _ = writeln!(out, "- Dg: {} (activation decay per ms)", params.dg);
    let _ = writeln!(out, "- Lg: {} (learning rate per ms)", params.lg);
    let _ = writeln!(out, "- Eg: {} (external influence)", params.eg);
    let _ = writeln!(out, "- Ig: {} (internal influence)", params.ig);
    let _ = writeln!(out, "- Amax: {} (maximum activation)", params.a_max);
    let _ = writeln!(out, "- Amin: {} (minimum activation)", params.a_min);
    let _ = writeln!(out, "- Arest: {} (rest activation)", params.a_rest);
    let _ = writeln!(out, "- Winit: {} (initial weights)", params.w_init);
    let _ = writeln!(
        out,
        "- MaxFreq: {} (maximum network update frequency -- 0 means no limit)",
        max_freq
    );

    out.push_str("\nUnits\n-----\n\n");
    for name in names {
        let _ = writeln!(out, "- {}", name);
    }

    out.push_str("\nActivations\n-----------\n\n");
    for (index, name) in names.iter().enumerate() {
        let intervals = record.intervals(index);
        if intervals.is_empty() {
            continue;
        }
        let _ = writeln!(out, "- {}:", name);
        for interval in intervals {
            let _ = writeln!(
                out,
                "    - [{},{}] at {}",
                interval.start.as_millis(),
                interval.end().as_millis(),
                interval.level
            );
        }
    }

    out
}
