//! Sensor — kinds, range tables and the readings they produce.
//!
//! Every sensor variant differs only in its [`SensorKind`] and the
//! [`RangeTable`] attached to it, so there is a single parameterised model
//! rather than one type per sensor.

mod range;
mod reading;
mod value;

pub use range::{RangeTable, ValueRange, ValueType};
pub use reading::{ReadingSet, ReadingSetBuilder, SensorReading};
pub use value::SensorValue;

use serde::{Deserialize, Serialize};

/// The four environmental sensors fitted to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    Temperature,
    Humidity,
    Light,
    Moisture,
}

impl SensorKind {
    /// Every sensor kind, in payload order.
    pub const ALL: [Self; 4] = [
        Self::Temperature,
        Self::Humidity,
        Self::Light,
        Self::Moisture,
    ];

    /// The daytime/nighttime ranges this sensor reports within.
    #[must_use]
    pub const fn range_table(self) -> RangeTable {
        match self {
            Self::Temperature => RangeTable::new(
                ValueRange::new(25.0, 35.0),
                ValueRange::new(20.0, 25.0),
                ValueType::Real,
            ),
            Self::Humidity => RangeTable::new(
                ValueRange::new(40.0, 60.0),
                ValueRange::new(30.0, 40.0),
                ValueType::Real,
            ),
            Self::Light => RangeTable::new(
                ValueRange::new(50.0, 100.0),
                ValueRange::new(0.0, 50.0),
                ValueType::Integer,
            ),
            Self::Moisture => RangeTable::new(
                ValueRange::new(60.0, 80.0),
                ValueRange::new(40.0, 60.0),
                ValueType::Integer,
            ),
        }
    }
}

impl std::fmt::Display for SensorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Temperature => f.write_str("temperature"),
            Self::Humidity => f.write_str("humidity"),
            Self::Light => f.write_str("light"),
            Self::Moisture => f.write_str("moisture"),
        }
    }
}
