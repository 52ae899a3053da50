//! Actuators — boolean devices driven by the control loop.
//!
//! Fan, humidifier, LED light and sprinkler behave identically and differ
//! only by [`ActuatorKind`]. Their on/off state is the only state that
//! survives from one cycle to the next.

use serde::{Deserialize, Serialize};

/// The four actuators fitted to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActuatorKind {
    Fan,
    Humidifier,
    LedLight,
    Sprinkler,
}

impl ActuatorKind {
    pub const ALL: [Self; 4] = [Self::Fan, Self::Humidifier, Self::LedLight, Self::Sprinkler];
}

impl std::fmt::Display for ActuatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fan => f.write_str("fan"),
            Self::Humidifier => f.write_str("humidifier"),
            Self::LedLight => f.write_str("led_light"),
            Self::Sprinkler => f.write_str("sprinkler"),
        }
    }
}

/// A simulated on/off device. Starts off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actuator {
    kind: ActuatorKind,
    on: bool,
}

impl Actuator {
    #[must_use]
    pub const fn new(kind: ActuatorKind) -> Self {
        Self { kind, on: false }
    }

    #[must_use]
    pub const fn kind(&self) -> ActuatorKind {
        self.kind
    }

    pub fn turn_on(&mut self) {
        self.on = true;
    }

    pub fn turn_off(&mut self) {
        self.on = false;
    }

    /// Turn on or off depending on `on`.
    pub fn set(&mut self, on: bool) {
        if on {
            self.turn_on();
        } else {
            self.turn_off();
        }
    }

    #[must_use]
    pub const fn is_on(&self) -> bool {
        self.on
    }
}

/// Target states decided for one cycle, one per actuator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct ActuatorDecision {
    pub fan: bool,
    pub humidifier: bool,
    pub led_light: bool,
    pub sprinkler: bool,
}

impl ActuatorDecision {
    #[must_use]
    pub const fn get(&self, kind: ActuatorKind) -> bool {
        match kind {
            ActuatorKind::Fan => self.fan,
            ActuatorKind::Humidifier => self.humidifier,
            ActuatorKind::LedLight => self.led_light,
            ActuatorKind::Sprinkler => self.sprinkler,
        }
    }
}

/// Exactly one [`Actuator`] per kind, owned by the control loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActuatorBank {
    fan: Actuator,
    humidifier: Actuator,
    led_light: Actuator,
    sprinkler: Actuator,
}

impl Default for ActuatorBank {
    fn default() -> Self {
        Self {
            fan: Actuator::new(ActuatorKind::Fan),
            humidifier: Actuator::new(ActuatorKind::Humidifier),
            led_light: Actuator::new(ActuatorKind::LedLight),
            sprinkler: Actuator::new(ActuatorKind::Sprinkler),
        }
    }
}

impl ActuatorBank {
    #[must_use]
    pub const fn get(&self, kind: ActuatorKind) -> &Actuator {
        match kind {
            ActuatorKind::Fan => &self.fan,
            ActuatorKind::Humidifier => &self.humidifier,
            ActuatorKind::LedLight => &self.led_light,
            ActuatorKind::Sprinkler => &self.sprinkler,
        }
    }

    pub fn get_mut(&mut self, kind: ActuatorKind) -> &mut Actuator {
        match kind {
            ActuatorKind::Fan => &mut self.fan,
            ActuatorKind::Humidifier => &mut self.humidifier,
            ActuatorKind::LedLight => &mut self.led_light,
            ActuatorKind::Sprinkler => &mut self.sprinkler,
        }
    }

    #[must_use]
    pub const fn is_on(&self, kind: ActuatorKind) -> bool {
        self.get(kind).is_on()
    }

    /// Write every decided state, exactly once per actuator.
    pub fn apply(&mut self, decision: &ActuatorDecision) {
        for kind in ActuatorKind::ALL {
            self.get_mut(kind).set(decision.get(kind));
        }
    }

    /// Current states as a decision-shaped snapshot.
    #[must_use]
    pub const fn snapshot(&self) -> ActuatorDecision {
        ActuatorDecision {
            fan: self.fan.is_on(),
            humidifier: self.humidifier.is_on(),
            led_light: self.led_light.is_on(),
            sprinkler: self.sprinkler.is_on(),
        }
    }
}
