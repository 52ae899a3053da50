//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `gardenhub.toml` in the working directory (or the path in
//! `GARDENHUB_CONFIG`). Every field has a default so the file is optional,
//! but the telemetry endpoint and topic must be set somewhere. Environment
//! variables take precedence over file values.

use std::time::Duration;

use serde::Deserialize;

use gardenhub_adapter_mqtt::MqttConfig;
use gardenhub_app::control_loop::ControlLoopConfig;
use gardenhub_domain::error::ValidationError;
use gardenhub_domain::rules::{ControlRules, LedPolicy};
use gardenhub_domain::telemetry::{DeviceName, Topic};
use gardenhub_domain::tick::Tick;

const DEFAULT_CONFIG_PATH: &str = "gardenhub.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub device: DeviceConfig,
    pub telemetry: TelemetryConfig,
    pub control: ControlConfig,
    pub logging: LoggingConfig,
    /// Broker connection settings.
    pub mqtt: MqttConfig,
}

/// Device identity.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Reported as `device_id` in every payload.
    pub id: String,
}

/// Where telemetry goes.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Broker host name.
    pub endpoint: String,
    /// Topic every payload is published on.
    pub topic: String,
    /// Payloads buffered between the control loop and the broker.
    pub queue_capacity: usize,
}

/// Control loop tuning.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Seconds between two cycles.
    pub cycle_interval_secs: u64,
    pub led_policy: LedPolicy,
    /// Tick the first cycle runs at.
    pub start_tick: u64,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from the config file (if present), apply
    /// environment-variable overrides and validate the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if the resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var("GARDENHUB_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("GARDENHUB_DEVICE_ID") {
            self.device.id = val;
        }
        if let Some(val) = lookup("GARDENHUB_ENDPOINT") {
            self.telemetry.endpoint = val;
        }
        if let Some(val) = lookup("GARDENHUB_TOPIC") {
            self.telemetry.topic = val;
        }
        if let Some(val) = lookup("GARDENHUB_CYCLE_INTERVAL_SECS") {
            if let Ok(secs) = val.parse() {
                self.control.cycle_interval_secs = secs;
            }
        }
        if let Some(val) = lookup("GARDENHUB_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = lookup("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.telemetry.endpoint.trim().is_empty() {
            return Err(ValidationError::EmptyEndpoint.into());
        }
        if self.telemetry.queue_capacity == 0 {
            return Err(ConfigError::Validation(
                "telemetry queue capacity must be non-zero".to_string(),
            ));
        }
        self.control_loop_config().map(|_| ())
    }

    /// The control loop settings derived from this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Domain`] for an empty device id, an empty or
    /// wildcard topic, or a zero cycle interval.
    pub fn control_loop_config(&self) -> Result<ControlLoopConfig, ConfigError> {
        let device = DeviceName::new(self.device.id.as_str())?;
        let topic = Topic::new(self.telemetry.topic.as_str())?;
        if self.control.cycle_interval_secs == 0 {
            return Err(ValidationError::ZeroInterval.into());
        }

        Ok(ControlLoopConfig::new(device, topic)
            .with_cycle_interval(Duration::from_secs(self.control.cycle_interval_secs))
            .with_rules(ControlRules::new(self.control.led_policy))
            .with_start_tick(Tick::new(self.control.start_tick)))
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            id: "garden-monitor".to_string(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            topic: String::new(),
            queue_capacity: 16,
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            cycle_interval_secs: 5,
            led_policy: LedPolicy::default(),
            start_tick: 0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "gardenhubd=info,gardenhub=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// A value rejected by the domain model.
    #[error("invalid configuration")]
    Domain(#[from] ValidationError),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
