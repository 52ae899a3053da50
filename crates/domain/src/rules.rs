//! Threshold rules — turn one cycle's readings into actuator states.
//!
//! Each rule is a pure function of the [`ReadingSet`] and the current
//! [`Tick`] and decides exactly one actuator. The fan is targeted by both
//! the temperature and the humidity conditions; they are OR-ed before the
//! fan state is written so neither can clobber the other.

use serde::{Deserialize, Serialize};

use crate::actuator::ActuatorDecision;
use crate::sensor::ReadingSet;
use crate::tick::Tick;

/// Fan runs when the temperature is strictly above this.
pub const FAN_TEMPERATURE_ABOVE: f64 = 30.0;

/// Fan and humidifier run when humidity is strictly below this.
pub const HUMIDITY_BELOW: f64 = 40.0;

/// LED light runs when light is strictly below this.
pub const LIGHT_BELOW: f64 = 50.0;

/// Sprinkler runs when soil moisture is strictly below this.
pub const MOISTURE_BELOW: f64 = 20.0;

/// When the LED light is allowed to compensate for low light.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedPolicy {
    /// Only during the daytime window.
    #[default]
    DaylightOnly,
    /// Whenever light is low, day or night (grow-light behaviour).
    AnyTime,
}

#[must_use]
pub fn fan_rule(readings: &ReadingSet) -> bool {
    readings.temperature.as_f64() > FAN_TEMPERATURE_ABOVE
        || readings.humidity.as_f64() < HUMIDITY_BELOW
}

#[must_use]
pub fn humidifier_rule(readings: &ReadingSet) -> bool {
    readings.humidity.as_f64() < HUMIDITY_BELOW
}

#[must_use]
pub fn led_light_rule(readings: &ReadingSet, tick: Tick, policy: LedPolicy) -> bool {
    let low_light = readings.light.as_f64() < LIGHT_BELOW;
    match policy {
        LedPolicy::DaylightOnly => low_light && tick.is_daytime(),
        LedPolicy::AnyTime => low_light,
    }
}

#[must_use]
pub fn sprinkler_rule(readings: &ReadingSet) -> bool {
    readings.moisture.as_f64() < MOISTURE_BELOW
}

/// The full rule set applied once per cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlRules {
    pub led_policy: LedPolicy,
}

impl ControlRules {
    #[must_use]
    pub const fn new(led_policy: LedPolicy) -> Self {
        Self { led_policy }
    }

    /// Evaluate every rule against `readings` sampled at `tick`.
    #[must_use]
    pub fn decide(&self, readings: &ReadingSet, tick: Tick) -> ActuatorDecision {
        ActuatorDecision {
            fan: fan_rule(readings),
            humidifier: humidifier_rule(readings),
            led_light: led_light_rule(readings, tick, self.led_policy),
            sprinkler: sprinkler_rule(readings),
        }
    }
}
