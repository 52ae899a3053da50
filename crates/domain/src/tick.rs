//! Clock — the simulation tick and the daytime window derived from it.
//!
//! A [`Tick`] stands in for an hour of the day. It advances once per control
//! cycle and is interpreted modulo [`HOURS_PER_DAY`], so the day/night cycle
//! repeats indefinitely. The raw value is kept for logging.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GardenHubError;

/// Number of ticks in one simulated day.
pub const HOURS_PER_DAY: u64 = 24;

/// First hour of the daytime window (inclusive).
pub const DAYTIME_START: u64 = 6;

/// End of the daytime window (exclusive).
pub const DAYTIME_END: u64 = 18;

/// UTC timestamp used for cycle completion times.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Monotonic cycle counter, the sole notion of time inside the control loop.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Tick(u64);

impl Tick {
    /// The first tick of a freshly started device.
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw, never-wrapping tick value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Position of this tick inside its simulated day, in `0..24`.
    #[must_use]
    pub const fn hour_of_day(self) -> u64 {
        self.0 % HOURS_PER_DAY
    }

    /// Whether this tick falls in the daytime window `[06, 18)`.
    #[must_use]
    pub fn is_daytime(self) -> bool {
        (DAYTIME_START..DAYTIME_END).contains(&self.hour_of_day())
    }

    /// The following tick.
    ///
    /// # Errors
    ///
    /// Returns [`GardenHubError::TickOverflow`] instead of wrapping around.
    pub fn next(self) -> Result<Self, GardenHubError> {
        self.0
            .checked_add(1)
            .map(Self)
            .ok_or(GardenHubError::TickOverflow)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Shared daytime predicate used by sensors and rules.
#[must_use]
pub fn is_daytime(tick: Tick) -> bool {
    tick.is_daytime()
}
