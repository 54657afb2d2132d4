//! Time representation for the network engine
//!
//! All engine-facing durations and instants are expressed in integer
//! microseconds: external stimulation durations, the minimal step period,
//! and the elapsed time stamped on log samples. Rate parameters (decay,
//! learning) are specified per millisecond, so a fractional-millisecond
//! view of a delta is provided for the kernel.

use core::fmt;
use core::ops::{Add, AddAssign, Sub};
use std::time::Duration;

/// Time value in microseconds (since network start, or as a duration)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Time(pub u64);

impl Time {
    /// Create a new time value from microseconds
    pub const fn new(us: u64) -> Self {
        Self(us)
    }

    /// Create a time value from microseconds
    pub const fn from_micros(us: u64) -> Self {
        Self(us)
    }

    /// Create a time value from milliseconds
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms * 1_000)
    }

    /// Create a time value from seconds
    pub const fn from_secs(s: u64) -> Self {
        Self(s * 1_000_000)
    }

    /// Get the value in microseconds
    pub const fn as_micros(&self) -> u64 {
        self.0
    }

    /// Get the value in whole milliseconds (truncating)
    pub const fn as_millis(&self) -> u64 {
        self.0 / 1_000
    }

    /// Get the value in fractional milliseconds
    ///
    /// This is the unit the rate parameters (decay, learning) are
    /// expressed in, so the kernel scales its per-ms terms by this.
    pub fn as_millis_f64(&self) -> f64 {
        self.0 as f64 / 1_000.0
    }

    /// Whether this is the zero time value
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Saturating subtraction
    pub const fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }

    /// Zero time constant
    pub const ZERO: Self = Self(0);
}

impl Add for Time {
    type Output = Time;

    fn add(self, rhs: Time) -> Time {
        Time(self.0 + rhs.0)
    }
}

impl AddAssign for Time {
    fn add_assign(&mut self, rhs: Time) {
        self.0 += rhs.0;
    }
}

impl Sub for Time {
    type Output = Time;

    fn sub(self, rhs: Time) -> Time {
        Time(self.0 - rhs.0)
    }
}

impl From<Time> for Duration {
    fn from(t: Time) -> Duration {
        Duration::from_micros(t.0)
    }
}

impl From<Duration> for Time {
    fn from(d: Duration) -> Time {
        Time(d.as_micros() as u64)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}us", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        assert_eq!(Time::from_millis(200), Time::from_micros(200_000));
        assert_eq!(Time::from_secs(1), Time::from_micros(1_000_000));
        assert_eq!(Time::ZERO.as_micros(), 0);
        assert!(Time::ZERO.is_zero());
    }

    #[test]
    fn test_millis_f64() {
        assert_eq!(Time::from_micros(1_500).as_millis_f64(), 1.5);
        assert_eq!(Time::from_micros(100).as_millis_f64(), 0.1);
    }

    #[test]
    fn test_arithmetic() {
        let mut t = Time::from_millis(1);
        t += Time::from_micros(500);
        assert_eq!(t, Time::from_micros(1_500));
        assert_eq!(t - Time::from_micros(500), Time::from_millis(1));
        assert_eq!(Time::ZERO.saturating_sub(Time::from_millis(1)), Time::ZERO);
    }

    #[test]
    fn test_duration_roundtrip() {
        let t = Time::from_millis(42);
        let d: Duration = t.into();
        assert_eq!(Time::from(d), t);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Time::from_millis(2)), "2000us");
    }
}
