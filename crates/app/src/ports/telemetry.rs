//! Telemetry port — hand a serialised payload to the messaging collaborator.

use std::future::Future;

use gardenhub_domain::error::GardenHubError;
use gardenhub_domain::telemetry::Topic;

/// Delivers telemetry payloads to a topic.
///
/// Connection management, retries and transport security belong to the
/// implementation; callers only learn whether the handoff succeeded.
pub trait TelemetryPublisher {
    /// Publish `payload` on `topic`.
    fn publish(
        &self,
        topic: &Topic,
        payload: Vec<u8>,
    ) -> impl Future<Output = Result<(), GardenHubError>> + Send;
}

impl<T: TelemetryPublisher + Send + Sync> TelemetryPublisher for std::sync::Arc<T> {
    fn publish(
        &self,
        topic: &Topic,
        payload: Vec<u8>,
    ) -> impl Future<Output = Result<(), GardenHubError>> + Send {
        (**self).publish(topic, payload)
    }
}
