//! Inclusive value ranges and the daytime/nighttime table selecting them.

use serde::{Deserialize, Serialize};

use crate::tick::Tick;

/// Whether a sensor reports fractional or whole numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Real,
    Integer,
}

/// Closed interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether `value` lies within the range, bounds included.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Per-sensor pair of ranges, selected by the daytime predicate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeTable {
    pub daytime: ValueRange,
    pub nighttime: ValueRange,
    pub value_type: ValueType,
}

impl RangeTable {
    #[must_use]
    pub const fn new(daytime: ValueRange, nighttime: ValueRange, value_type: ValueType) -> Self {
        Self {
            daytime,
            nighttime,
            value_type,
        }
    }

    /// The range in force at `tick`.
    #[must_use]
    pub fn range_for(&self, tick: Tick) -> ValueRange {
        if tick.is_daytime() {
            self.daytime
        } else {
            self.nighttime
        }
    }
}
