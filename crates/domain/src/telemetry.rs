//! Telemetry — the immutable per-cycle snapshot published to the broker.
//!
//! The JSON field names and nesting are fixed; downstream consumers key on
//! them.

use serde::{Deserialize, Serialize};

use crate::actuator::{ActuatorBank, ActuatorKind};
use crate::error::{GardenHubError, ValidationError};
use crate::sensor::{ReadingSet, SensorValue};

/// Maximum MQTT topic length in bytes.
pub const MAX_TOPIC_LEN: usize = 65_535;

/// Identifier the device reports itself under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeviceName(String);

impl DeviceName {
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyDeviceId`] for a blank name.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyDeviceId);
        }
        Ok(Self(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DeviceName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DeviceName> for String {
    fn from(value: DeviceName) -> Self {
        value.0
    }
}

impl std::fmt::Display for DeviceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A concrete publish destination (no subscription wildcards).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Topic(String);

impl Topic {
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the topic is empty, longer than
    /// [`MAX_TOPIC_LEN`], or contains `+`, `#` or NUL.
    pub fn new(topic: impl Into<String>) -> Result<Self, ValidationError> {
        let topic = topic.into();
        if topic.is_empty() {
            return Err(ValidationError::EmptyTopic);
        }
        if topic.len() > MAX_TOPIC_LEN {
            return Err(ValidationError::TopicTooLong { max: MAX_TOPIC_LEN });
        }
        if topic.contains(['+', '#', '\0']) {
            return Err(ValidationError::InvalidTopic);
        }
        Ok(Self(topic))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSensor {
    pub temperature: SensorValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumiditySensor {
    pub humidity: SensorValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightSensor {
    pub light_condition: SensorValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoistureSensor {
    pub moisture: SensorValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorsSection {
    pub temperature_sensor: TemperatureSensor,
    pub humidity_sensor: HumiditySensor,
    pub light_sensor: LightSensor,
    pub moisture_sensor: MoistureSensor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumidifierState {
    pub humidifier_state: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SprinklerState {
    pub sprinkler_state: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedLightState {
    pub led_light_state: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanState {
    pub fan_state: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActuatorsSection {
    pub humidifier: HumidifierState,
    pub sprinkler: SprinklerState,
    #[serde(rename = "LED_light")]
    pub led_light: LedLightState,
    pub fan: FanState,
}

/// Device identity plus every reading and actuator state of one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryPayload {
    pub device_id: String,
    pub sensors: SensorsSection,
    pub actuators: ActuatorsSection,
}

impl TelemetryPayload {
    /// Snapshot `readings` and `actuators`; later mutations of the bank are
    /// not observed.
    #[must_use]
    pub fn new(device: &DeviceName, readings: &ReadingSet, actuators: &ActuatorBank) -> Self {
        Self {
            device_id: device.as_str().to_string(),
            sensors: SensorsSection {
                temperature_sensor: TemperatureSensor {
                    temperature: readings.temperature,
                },
                humidity_sensor: HumiditySensor {
                    humidity: readings.humidity,
                },
                light_sensor: LightSensor {
                    light_condition: readings.light,
                },
                moisture_sensor: MoistureSensor {
                    moisture: readings.moisture,
                },
            },
            actuators: ActuatorsSection {
                humidifier: HumidifierState {
                    humidifier_state: actuators.is_on(ActuatorKind::Humidifier),
                },
                sprinkler: SprinklerState {
                    sprinkler_state: actuators.is_on(ActuatorKind::Sprinkler),
                },
                led_light: LedLightState {
                    led_light_state: actuators.is_on(ActuatorKind::LedLight),
                },
                fan: FanState {
                    fan_state: actuators.is_on(ActuatorKind::Fan),
                },
            },
        }
    }

    /// Serialise to the JSON bytes handed to the publisher.
    ///
    /// # Errors
    ///
    /// Returns [`GardenHubError::Serialization`] if encoding fails.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, GardenHubError> {
        serde_json::to_vec(self).map_err(GardenHubError::Serialization)
    }
}
