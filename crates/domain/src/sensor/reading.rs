//! Readings produced for a single tick, and the per-cycle set of them.

use serde::{Deserialize, Serialize};

use super::{SensorKind, SensorValue};
use crate::error::{GardenHubError, ValidationError};

/// One value sampled from one sensor. Never stored beyond its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub kind: SensorKind,
    pub value: SensorValue,
}

impl SensorReading {
    #[must_use]
    pub fn new(kind: SensorKind, value: impl Into<SensorValue>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Exactly one reading per [`SensorKind`], sampled during one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadingSet {
    pub temperature: SensorValue,
    pub humidity: SensorValue,
    pub light: SensorValue,
    pub moisture: SensorValue,
}

impl ReadingSet {
    /// Create a builder collecting one reading per sensor kind.
    #[must_use]
    pub fn builder() -> ReadingSetBuilder {
        ReadingSetBuilder::default()
    }

    /// The value sampled for `kind`.
    #[must_use]
    pub fn get(&self, kind: SensorKind) -> SensorValue {
        match kind {
            SensorKind::Temperature => self.temperature,
            SensorKind::Humidity => self.humidity,
            SensorKind::Light => self.light,
            SensorKind::Moisture => self.moisture,
        }
    }

    /// All four readings, in [`SensorKind::ALL`] order.
    #[must_use]
    pub fn readings(&self) -> [SensorReading; 4] {
        SensorKind::ALL.map(|kind| SensorReading::new(kind, self.get(kind)))
    }
}

/// Step-by-step builder for [`ReadingSet`].
#[derive(Debug, Default)]
pub struct ReadingSetBuilder {
    temperature: Option<SensorValue>,
    humidity: Option<SensorValue>,
    light: Option<SensorValue>,
    moisture: Option<SensorValue>,
    duplicate: Option<SensorKind>,
}

impl ReadingSetBuilder {
    #[must_use]
    pub fn reading(mut self, reading: SensorReading) -> Self {
        let slot = match reading.kind {
            SensorKind::Temperature => &mut self.temperature,
            SensorKind::Humidity => &mut self.humidity,
            SensorKind::Light => &mut self.light,
            SensorKind::Moisture => &mut self.moisture,
        };
        if slot.replace(reading.value).is_some() && self.duplicate.is_none() {
            self.duplicate = Some(reading.kind);
        }
        self
    }

    /// Consume the builder and return a complete [`ReadingSet`].
    ///
    /// # Errors
    ///
    /// Returns [`MissingReading`](ValidationError::MissingReading) when a kind
    /// was never sampled and [`DuplicateReading`](ValidationError::DuplicateReading)
    /// when one was sampled twice.
    pub fn build(self) -> Result<ReadingSet, GardenHubError> {
        if let Some(kind) = self.duplicate {
            return Err(ValidationError::DuplicateReading(kind).into());
        }
        Ok(ReadingSet {
            temperature: self
                .temperature
                .ok_or(ValidationError::MissingReading(SensorKind::Temperature))?,
            humidity: self
                .humidity
                .ok_or(ValidationError::MissingReading(SensorKind::Humidity))?,
            light: self
                .light
                .ok_or(ValidationError::MissingReading(SensorKind::Light))?,
            moisture: self
                .moisture
                .ok_or(ValidationError::MissingReading(SensorKind::Moisture))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> ReadingSetBuilder {
        ReadingSet::builder()
            .reading(SensorReading::new(SensorKind::Temperature, 32.0))
            .reading(SensorReading::new(SensorKind::Humidity, 35.0))
            .reading(SensorReading::new(SensorKind::Light, 40_i64))
            .reading(SensorReading::new(SensorKind::Moisture, 15_i64))
    }

    #[test]
    fn should_build_when_every_kind_is_present() {
        let set = complete().build().unwrap();
        assert_eq!(set.temperature, SensorValue::Float(32.0));
        assert_eq!(set.get(SensorKind::Light), SensorValue::Int(40));
        assert_eq!(set.get(SensorKind::Moisture), SensorValue::Int(15));
    }

    #[test]
    fn should_reject_missing_reading() {
        let result = ReadingSet::builder()
            .reading(SensorReading::new(SensorKind::Temperature, 20.0))
            .reading(SensorReading::new(SensorKind::Humidity, 50.0))
            .reading(SensorReading::new(SensorKind::Light, 10_i64))
            .build();
        assert!(matches!(
            result,
            Err(GardenHubError::Validation(ValidationError::MissingReading(
                SensorKind::Moisture
            )))
        ));
    }

    #[test]
    fn should_reject_duplicate_reading() {
        let result = complete()
            .reading(SensorReading::new(SensorKind::Humidity, 45.0))
            .build();
        assert!(matches!(
            result,
            Err(GardenHubError::Validation(ValidationError::DuplicateReading(
                SensorKind::Humidity
            )))
        ));
    }

    #[test]
    fn should_list_readings_in_kind_order() {
        let set = complete().build().unwrap();
        let kinds: Vec<_> = set.readings().iter().map(|r| r.kind).collect();
        assert_eq!(kinds, SensorKind::ALL.to_vec());
    }
}
