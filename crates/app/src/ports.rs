//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the control loop and the outside world.
//! They are defined here (in `app`) so that both the loop and the adapter
//! layer can depend on them without creating circular dependencies.

pub mod sensor;
pub mod telemetry;

pub use sensor::Sensor;
pub use telemetry::TelemetryPublisher;
