//! # gardenhub-adapter-virtual
//!
//! Virtual integration that provides simulated sensors for running the
//! device without hardware.
//!
//! ## Provided sensors
//!
//! | Sensor | Daytime | Nighttime | Values |
//! |--------|---------|-----------|--------|
//! | Temperature | 25–35 | 20–25 | real |
//! | Humidity | 40–60 | 30–40 | real |
//! | Light | 50–100 | 0–50 | integer |
//! | Moisture | 60–80 | 40–60 | integer |
//!
//! Each reading is drawn uniformly from the inclusive range selected by the
//! daytime window of the tick.
//!
//! ## Dependency rule
//!
//! Depends on `gardenhub-app` (port traits) and `gardenhub-domain` only.

mod sensor;

pub use sensor::{SimulatedSensor, sample_range};

use gardenhub_app::ports::Sensor;
use gardenhub_domain::sensor::SensorKind;

/// One entropy-seeded simulated sensor per kind.
#[must_use]
pub fn virtual_sensors() -> Vec<Box<dyn Sensor>> {
    SensorKind::ALL
        .into_iter()
        .map(|kind| Box::new(SimulatedSensor::new(kind)) as Box<dyn Sensor>)
        .collect()
}

/// One reproducible simulated sensor per kind, derived from `seed`.
#[must_use]
pub fn seeded_virtual_sensors(seed: u64) -> Vec<Box<dyn Sensor>> {
    SensorKind::ALL
        .into_iter()
        .zip(0_u64..)
        .map(|(kind, offset)| {
            Box::new(SimulatedSensor::seeded(kind, seed.wrapping_add(offset))) as Box<dyn Sensor>
        })
        .collect()
}
