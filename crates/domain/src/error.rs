//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`GardenHubError`] at port boundaries.

use crate::sensor::SensorKind;

/// Base error for every gardenhub crate.
#[derive(Debug, thiserror::Error)]
pub enum GardenHubError {
    /// A domain invariant was violated (bad configuration, incomplete readings).
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// The tick counter reached `u64::MAX`.
    #[error("tick counter overflowed")]
    TickOverflow,

    /// The telemetry payload could not be serialised.
    #[error("failed to serialize telemetry payload")]
    Serialization(#[source] serde_json::Error),

    /// The telemetry queue is at capacity; the payload was dropped.
    #[error("telemetry queue is full")]
    QueueFull,

    /// The telemetry queue worker is gone.
    #[error("telemetry queue is closed")]
    QueueClosed,

    /// A transport-level failure reported by a telemetry publisher.
    #[error("transport error")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Reasons a value or a set of values fails domain validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("device id must not be empty")]
    EmptyDeviceId,

    #[error("telemetry topic must not be empty")]
    EmptyTopic,

    #[error("telemetry topic must not contain wildcards or NUL characters")]
    InvalidTopic,

    #[error("telemetry topic exceeds {max} bytes")]
    TopicTooLong { max: usize },

    #[error("telemetry endpoint must not be empty")]
    EmptyEndpoint,

    #[error("telemetry endpoint must be a bare host name")]
    InvalidEndpoint,

    #[error("cycle interval must be non-zero")]
    ZeroInterval,

    #[error("no reading for the {0} sensor")]
    MissingReading(SensorKind),

    #[error("more than one reading for the {0} sensor")]
    DuplicateReading(SensorKind),

    #[error("no {0} sensor registered")]
    MissingSensor(SensorKind),

    #[error("more than one {0} sensor registered")]
    DuplicateSensor(SensorKind),
}
