//! # gardenhub-adapter-mqtt
//!
//! MQTT adapter — delivers telemetry payloads to a broker.
//!
//! ## Responsibilities
//! - Build the client options (endpoint, client id, keep-alive, mutual TLS)
//! - Drive the rumqttc event loop in a background task; reconnects are
//!   handled there and never surface to the control loop
//! - Implement the [`TelemetryPublisher`] port with a non-blocking handoff
//!   into the client's bounded request channel
//!
//! ## Dependency rule
//! Same as other adapters: depends on `gardenhub-app` and `gardenhub-domain`.

mod config;
mod error;

pub use config::{MqttConfig, PLAIN_PORT, TLS_PORT, TlsConfig};
pub use error::MqttError;

use std::future::Future;
use std::net::IpAddr;
use std::path::Path;
use std::time::Duration;

use rumqttc::{
    AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS, TlsConfiguration, Transport,
};
use tokio::task::JoinHandle;

use gardenhub_app::ports::TelemetryPublisher;
use gardenhub_domain::error::{GardenHubError, ValidationError};
use gardenhub_domain::telemetry::{DeviceName, Topic};

/// [`TelemetryPublisher`] backed by a rumqttc [`AsyncClient`].
pub struct MqttPublisher {
    client: AsyncClient,
    qos: QoS,
    poll_handle: JoinHandle<()>,
}

impl MqttPublisher {
    /// Configure the client and start polling its event loop.
    ///
    /// Must be called from within a tokio runtime. The connection itself is
    /// established lazily by the event loop.
    ///
    /// # Errors
    ///
    /// Returns [`MqttError`] when the endpoint is invalid, the QoS is not
    /// supported, or TLS material cannot be read.
    pub fn connect(
        endpoint: &str,
        device: &DeviceName,
        config: &MqttConfig,
    ) -> Result<Self, MqttError> {
        let qos = qos_from_level(config.qos)?;
        let options = mqtt_options(endpoint, device, config)?;
        let (client, eventloop) = AsyncClient::new(options, config.request_capacity.max(1));

        let reconnect_delay = Duration::from_secs(u64::from(config.reconnect_delay_secs));
        let poll_handle = tokio::spawn(poll_loop(eventloop, reconnect_delay));

        tracing::info!(
            endpoint,
            port = config.port(),
            tls = config.tls.is_some(),
            "MQTT publisher started"
        );

        Ok(Self {
            client,
            qos,
            poll_handle,
        })
    }

    /// Disconnect from the broker and stop the event-loop task.
    ///
    /// Publishing after shutdown fails with a transport error.
    ///
    /// # Errors
    ///
    /// Returns [`MqttError::Client`] if the disconnect request cannot be queued.
    pub async fn shutdown(&self) -> Result<(), MqttError> {
        let result = self.client.disconnect().await.map_err(MqttError::Client);
        self.poll_handle.abort();
        tracing::info!("MQTT publisher stopped");
        result
    }
}

impl TelemetryPublisher for MqttPublisher {
    fn publish(
        &self,
        topic: &Topic,
        payload: Vec<u8>,
    ) -> impl Future<Output = Result<(), GardenHubError>> + Send {
        let result = self
            .client
            .try_publish(topic.as_str(), self.qos, false, payload)
            .map_err(|err| MqttError::Client(err).into_domain());
        async move { result }
    }
}

/// Build the rumqttc options for `endpoint`.
///
/// # Errors
///
/// Returns [`MqttError::Domain`] for an invalid endpoint and
/// [`MqttError::Tls`] / [`MqttError::IncompleteClientAuth`] for bad TLS
/// settings.
pub fn mqtt_options(
    endpoint: &str,
    device: &DeviceName,
    config: &MqttConfig,
) -> Result<MqttOptions, MqttError> {
    validate_endpoint(endpoint).map_err(|err| MqttError::Domain(err.into()))?;

    let client_id = config
        .client_id
        .clone()
        .unwrap_or_else(|| device.as_str().to_string());
    let mut options = MqttOptions::new(client_id, endpoint, config.port());
    options.set_keep_alive(Duration::from_secs(u64::from(config.keep_alive_secs)));

    if let Some(tls) = &config.tls {
        options.set_transport(Transport::tls_with_config(tls_configuration(tls)?));
    }

    Ok(options)
}

/// Map a numeric QoS level onto rumqttc's enum.
///
/// # Errors
///
/// Returns [`MqttError::InvalidQos`] for anything but 0, 1 or 2.
pub fn qos_from_level(level: u8) -> Result<QoS, MqttError> {
    match level {
        0 => Ok(QoS::AtMostOnce),
        1 => Ok(QoS::AtLeastOnce),
        2 => Ok(QoS::ExactlyOnce),
        other => Err(MqttError::InvalidQos(other)),
    }
}

/// The broker endpoint must be a bare host name or address. The port is
/// configured separately, so a `:` is only allowed inside an IPv6 literal.
fn validate_endpoint(endpoint: &str) -> Result<(), ValidationError> {
    if endpoint.trim().is_empty() {
        return Err(ValidationError::EmptyEndpoint);
    }
    if endpoint.contains("://") || endpoint.contains(['/', ' ', '\t']) {
        return Err(ValidationError::InvalidEndpoint);
    }
    if endpoint.contains(':') && endpoint.parse::<IpAddr>().is_err() {
        return Err(ValidationError::InvalidEndpoint);
    }
    Ok(())
}

fn tls_configuration(tls: &TlsConfig) -> Result<TlsConfiguration, MqttError> {
    let ca = read_pem(&tls.ca_path)?;
    let client_auth = match (&tls.client_cert_path, &tls.client_key_path) {
        (Some(cert), Some(key)) => Some((read_pem(cert)?, read_pem(key)?)),
        (None, None) => None,
        _ => return Err(MqttError::IncompleteClientAuth),
    };
    Ok(TlsConfiguration::Simple {
        ca,
        alpn: None,
        client_auth,
    })
}

fn read_pem(path: &Path) -> Result<Vec<u8>, MqttError> {
    std::fs::read(path).map_err(|source| MqttError::Tls {
        path: path.to_path_buf(),
        source,
    })
}

/// Poll the event loop forever; rumqttc reconnects on the next poll after
/// an error.
async fn poll_loop(mut eventloop: EventLoop, reconnect_delay: Duration) {
    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(_))) => tracing::info!("MQTT connected"),
            Ok(Event::Incoming(Packet::Disconnect)) => tracing::warn!("MQTT broker disconnected"),
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(%err, "MQTT connection error, retrying");
                tokio::time::sleep(reconnect_delay).await;
            }
        }
    }
}
