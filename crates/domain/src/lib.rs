//! # gardenhub-domain
//!
//! Pure domain model for the gardenhub monitoring device.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps, the simulation [`tick::Tick`]
//! - Define **Sensors** (kinds, daytime/nighttime range tables, readings)
//! - Define **Actuators** (boolean devices: fan, humidifier, LED light, sprinkler)
//! - Define the **threshold rules** turning a reading set into actuator states
//! - Define the **telemetry payload** published once per cycle
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod tick;

pub mod actuator;
pub mod rules;
pub mod sensor;
pub mod telemetry;
