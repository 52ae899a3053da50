//! Sensor port — anything that can produce a reading for a tick.

use gardenhub_domain::sensor::{SensorKind, SensorReading};
use gardenhub_domain::tick::Tick;

/// A source of readings for one [`SensorKind`].
///
/// Reads never fail; the only side effect allowed is consuming entropy.
pub trait Sensor: Send {
    /// The kind of reading this sensor produces.
    fn kind(&self) -> SensorKind;

    /// Sample the sensor at `tick`.
    fn read(&mut self, tick: Tick) -> SensorReading;
}

impl<S: Sensor + ?Sized> Sensor for Box<S> {
    fn kind(&self) -> SensorKind {
        (**self).kind()
    }

    fn read(&mut self, tick: Tick) -> SensorReading {
        (**self).read(tick)
    }
}
