//! Forecast horizon value types: how far ahead, in how many slots, and what came back.

use serde::{Deserialize, Serialize};

/// Length of one forecasting slot in minutes.
pub const INTERVAL_MINUTES: u64 = 15;

const MINUTES_PER_HOUR: u64 = 60;
const MINUTES_PER_DAY: u64 = 24 * MINUTES_PER_HOUR;
const MINUTES_PER_WEEK: u64 = 7 * MINUTES_PER_DAY;

/// An elapsed amount of time, canonicalized to whole minutes.
///
/// Calendar units are deliberately absent: a "day" is always 1440 minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Duration {
    minutes: u64,
}

impl Duration {
    pub const fn from_minutes(minutes: u64) -> Self {
        Self { minutes }
    }

    pub const fn from_hours(hours: u64) -> Self {
        Self::from_minutes(hours.saturating_mul(MINUTES_PER_HOUR))
    }

    pub const fn from_days(days: u64) -> Self {
        Self::from_minutes(days.saturating_mul(MINUTES_PER_DAY))
    }

    pub const fn from_weeks(weeks: u64) -> Self {
        Self::from_minutes(weeks.saturating_mul(MINUTES_PER_WEEK))
    }

    pub const fn minutes(&self) -> u64 {
        self.minutes
    }

    /// Number of 15-minute intervals this duration spans.
    pub fn intervals(&self) -> IntervalCount {
        IntervalCount::from_duration(*self)
    }

    /// Human label using the largest unit that divides evenly, e.g. "2 hours".
    pub fn label(&self) -> String {
        let m = self.minutes;
        let (n, unit) = if m == 0 {
            (0, "minute")
        } else if m % MINUTES_PER_WEEK == 0 {
            (m / MINUTES_PER_WEEK, "week")
        } else if m % MINUTES_PER_DAY == 0 {
            (m / MINUTES_PER_DAY, "day")
        } else if m % MINUTES_PER_HOUR == 0 {
            (m / MINUTES_PER_HOUR, "hour")
        } else {
            (m, "minute")
        };
        if n == 1 {
            format!("1 {unit}")
        } else {
            format!("{n} {unit}s")
        }
    }
}

impl std::fmt::Display for Duration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

/// A positive count of fixed 15-minute forecasting slots.
///
/// Invariant: `count == max(1, ceil(minutes / 15))` for the duration it was
/// derived from. There is no upper bound here; the forecaster owns any ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntervalCount(u64);

impl IntervalCount {
    pub fn from_duration(duration: Duration) -> Self {
        Self(duration.minutes().div_ceil(INTERVAL_MINUTES).max(1))
    }

    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Total minutes covered by the slots (may exceed the source duration).
    pub const fn covered_minutes(&self) -> u64 {
        self.0.saturating_mul(INTERVAL_MINUTES)
    }
}

impl From<Duration> for IntervalCount {
    fn from(duration: Duration) -> Self {
        Self::from_duration(duration)
    }
}

impl std::fmt::Display for IntervalCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered per-interval forecast values, index 0 is interval 1.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictionSeries(Vec<f64>);

impl PredictionSeries {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Arithmetic mean, `None` for an empty series.
    pub fn mean(&self) -> Option<f64> {
        if self.0.is_empty() {
            return None;
        }
        Some(self.0.iter().sum::<f64>() / self.0.len() as f64)
    }
}

impl From<Vec<f64>> for PredictionSeries {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}
