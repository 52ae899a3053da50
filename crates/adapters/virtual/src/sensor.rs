//! Simulated sensor — one type for every kind, parameterised by its range table.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use gardenhub_app::ports::Sensor;
use gardenhub_domain::sensor::{
    RangeTable, SensorKind, SensorReading, SensorValue, ValueRange, ValueType,
};
use gardenhub_domain::tick::Tick;

/// Draw a value uniformly from the inclusive `range`.
///
/// Integer sensors get whole numbers between the (whole) bounds.
#[allow(clippy::cast_possible_truncation)]
pub fn sample_range<R: Rng>(
    rng: &mut R,
    range: ValueRange,
    value_type: ValueType,
) -> SensorValue {
    match value_type {
        ValueType::Real => SensorValue::Float(rng.gen_range(range.min..=range.max)),
        ValueType::Integer => {
            let min = range.min.ceil() as i64;
            let max = range.max.floor() as i64;
            SensorValue::Int(rng.gen_range(min..=max))
        }
    }
}

/// A randomised sensor following the daytime/nighttime table of its kind.
pub struct SimulatedSensor<R = StdRng> {
    kind: SensorKind,
    table: RangeTable,
    rng: R,
}

impl SimulatedSensor<StdRng> {
    /// A sensor seeded from OS entropy.
    #[must_use]
    pub fn new(kind: SensorKind) -> Self {
        Self::with_rng(kind, StdRng::from_entropy())
    }

    /// A sensor whose readings are reproducible for a given `seed`.
    #[must_use]
    pub fn seeded(kind: SensorKind, seed: u64) -> Self {
        Self::with_rng(kind, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> SimulatedSensor<R> {
    #[must_use]
    pub fn with_rng(kind: SensorKind, rng: R) -> Self {
        Self {
            kind,
            table: kind.range_table(),
            rng,
        }
    }
}

impl<R: Rng + Send> Sensor for SimulatedSensor<R> {
    fn kind(&self) -> SensorKind {
        self.kind
    }

    fn read(&mut self, tick: Tick) -> SensorReading {
        let range = self.table.range_for(tick);
        let value = sample_range(&mut self.rng, range, self.table.value_type);
        SensorReading::new(self.kind, value)
    }
}
