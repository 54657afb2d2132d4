//! Physical and simulated time sources for the update loop
//!
//! The clock is owned by the worker thread: throttling sleeps happen
//! inside [`StepClock::tick`], so the caller never holds a lock across a
//! sleep. In physical mode the step delta comes from a monotonic clock
//! and the loop is throttled to the configured minimal period; in
//! simulated mode the loop free-runs and a virtual elapsed counter
//! advances by exactly the minimal period per tick.

use std::thread;
use std::time::{Duration, Instant};

use crate::time::Time;

/// How often the measured update frequency is refreshed in physical mode
pub const FREQUENCY_WINDOW: Time = Time::from_millis(200);

/// Where step deltas come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeMode {
    /// Wall-clock deltas, throttled to the minimal period
    Physical,
    /// Virtual time advancing by the minimal period each step
    Simulated,
}

/// Result of one clock tick
#[derive(Debug, Clone, Copy)]
pub struct ClockTick {
    /// Time delta to advance the network by
    pub dt: Time,
    /// Elapsed time since the clock started
    pub elapsed: Time,
    /// Fresh frequency measurement, if the window just closed
    pub frequency: Option<u32>,
}

/// Step time accounting for the update loop
#[derive(Debug)]
pub struct StepClock {
    mode: TimeMode,
    min_period: Time,
    start: Instant,
    last: Instant,
    last_freq_at: Instant,
    steps_in_window: u32,
    sim_elapsed: Time,
}

impl StepClock {
    /// Start a clock now
    pub fn start(mode: TimeMode, min_period: Time) -> Self {
        let now = Instant::now();
        Self {
            mode,
            min_period,
            start: now,
            last: now,
            last_freq_at: now,
            steps_in_window: 0,
            sim_elapsed: Time::ZERO,
        }
    }

    /// The time mode this clock runs in
    pub fn mode(&self) -> TimeMode {
        self.mode
    }

    /// The instant the clock was started
    pub fn started_at(&self) -> Instant {
        self.start
    }

    /// Advance the clock by one step, sleeping if the loop runs too fast
    pub fn tick(&mut self) -> ClockTick {
        match self.mode {
            TimeMode::Physical => {
                // throttle first, then stamp, so the sleep is part of this
                // step's delta rather than suppressing the next sleep
                let since_last = Time::from(self.last.elapsed());
                if !self.min_period.is_zero() && since_last < self.min_period {
                    thread::sleep(Duration::from(self.min_period - since_last));
                }
                let now = Instant::now();
                let dt = Time::from(now - self.last);
                self.last = now;

                self.steps_in_window += 1;
                let window = Time::from(now - self.last_freq_at);
                let frequency = if window > FREQUENCY_WINDOW {
                    let hz = self.steps_in_window as u64 * 1_000_000 / window.as_micros();
                    self.last_freq_at = now;
                    self.steps_in_window = 0;
                    Some(hz as u32)
                } else {
                    None
                };

                ClockTick {
                    dt,
                    elapsed: Time::from(now - self.start),
                    frequency,
                }
            }
            TimeMode::Simulated => {
                self.sim_elapsed += self.min_period;
                ClockTick {
                    dt: self.min_period,
                    elapsed: self.sim_elapsed,
                    frequency: None,
                }
            }
        }
    }
}
