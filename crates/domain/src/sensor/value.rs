//! Sensor values — integer or real, unified as a real number for rules.

use serde::{Deserialize, Serialize};

/// A single sampled value.
///
/// Serialised untagged so telemetry shows `40` for integer sensors and
/// `31.7` for real ones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SensorValue {
    Int(i64),
    Float(f64),
}

impl SensorValue {
    /// The value as a real number.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(v) => v as f64,
            Self::Float(v) => v,
        }
    }
}

impl From<i64> for SensorValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for SensorValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl std::fmt::Display for SensorValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(v) => v.fmt(f),
            Self::Float(v) => v.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_serialize_int_variant_as_whole_number() {
        let json = serde_json::to_string(&SensorValue::Int(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn should_serialize_float_variant_as_number() {
        let json = serde_json::to_string(&SensorValue::Float(21.5)).unwrap();
        assert_eq!(json, "21.5");
    }

    #[test]
    fn should_unify_both_variants_as_real() {
        assert!((SensorValue::Int(40).as_f64() - 40.0).abs() < f64::EPSILON);
        assert!((SensorValue::Float(39.5).as_f64() - 39.5).abs() < f64::EPSILON);
    }

    #[test]
    fn should_convert_from_primitives() {
        assert_eq!(SensorValue::from(7_i64), SensorValue::Int(7));
        assert_eq!(SensorValue::from(7.5), SensorValue::Float(7.5));
    }
}
