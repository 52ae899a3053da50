//! Bounded, non-blocking telemetry handoff backed by a tokio mpsc channel.

use std::future::Future;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

use gardenhub_domain::error::GardenHubError;
use gardenhub_domain::telemetry::Topic;

use crate::ports::TelemetryPublisher;

/// An owned payload waiting for delivery.
struct QueuedPayload {
    topic: Topic,
    payload: Vec<u8>,
}

/// [`TelemetryPublisher`] that never waits on the network.
///
/// Payloads are copied into a bounded queue and delivered in order by a
/// worker task. When the queue is full the payload is rejected with
/// [`GardenHubError::QueueFull`] instead of stalling the caller.
#[derive(Clone)]
pub struct TelemetryQueue {
    sender: mpsc::Sender<QueuedPayload>,
}

impl TelemetryQueue {
    /// Spawn the delivery worker in front of `publisher`.
    ///
    /// The worker stops once every [`TelemetryQueue`] handle has been dropped
    /// and the queue is drained. A zero `capacity` is raised to one.
    pub fn spawn<P>(publisher: P, capacity: usize) -> (Self, JoinHandle<()>)
    where
        P: TelemetryPublisher + Send + Sync + 'static,
    {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let handle = tokio::spawn(deliver(publisher, receiver));
        (Self { sender }, handle)
    }
}

impl TelemetryPublisher for TelemetryQueue {
    fn publish(
        &self,
        topic: &Topic,
        payload: Vec<u8>,
    ) -> impl Future<Output = Result<(), GardenHubError>> + Send {
        let result = match self.sender.try_send(QueuedPayload {
            topic: topic.clone(),
            payload,
        }) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(GardenHubError::QueueFull),
            Err(TrySendError::Closed(_)) => Err(GardenHubError::QueueClosed),
        };
        async move { result }
    }
}

async fn deliver<P: TelemetryPublisher>(publisher: P, mut receiver: mpsc::Receiver<QueuedPayload>) {
    while let Some(QueuedPayload { topic, payload }) = receiver.recv().await {
        let size = payload.len();
        match publisher.publish(&topic, payload).await {
            Ok(()) => tracing::trace!(%topic, size, "telemetry delivered"),
            Err(err) => tracing::warn!(%err, %topic, "telemetry delivery failed, dropping payload"),
        }
    }
    tracing::debug!("telemetry queue closed");
}
