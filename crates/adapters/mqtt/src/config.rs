//! MQTT publisher configuration.

use std::path::PathBuf;

use serde::Deserialize;

/// Standard port for MQTT over plain TCP.
pub const PLAIN_PORT: u16 = 1883;

/// Standard port for MQTT over TLS.
pub const TLS_PORT: u16 = 8883;

/// Configuration for the MQTT telemetry publisher.
///
/// The broker host itself is the telemetry `endpoint`, configured next to
/// the topic.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    /// MQTT broker port. Defaults to [`TLS_PORT`] when `tls` is set and
    /// [`PLAIN_PORT`] otherwise.
    pub broker_port: Option<u16>,
    /// MQTT client identifier. Defaults to the device id.
    pub client_id: Option<String>,
    /// Keep-alive interval in seconds.
    pub keep_alive_secs: u16,
    /// Capacity of the client's outgoing request channel.
    pub request_capacity: usize,
    /// Quality of service for telemetry (0, 1 or 2).
    pub qos: u8,
    /// Pause after a connection error before polling again, in seconds.
    pub reconnect_delay_secs: u16,
    /// Mutual TLS material. Plain TCP when absent.
    pub tls: Option<TlsConfig>,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker_port: None,
            client_id: None,
            keep_alive_secs: 30,
            request_capacity: 10,
            qos: 0,
            reconnect_delay_secs: 2,
            tls: None,
        }
    }
}

impl MqttConfig {
    /// The port to connect to.
    #[must_use]
    pub fn port(&self) -> u16 {
        match (self.broker_port, &self.tls) {
            (Some(port), _) => port,
            (None, Some(_)) => TLS_PORT,
            (None, None) => PLAIN_PORT,
        }
    }
}

/// PEM files for a TLS connection.
#[derive(Debug, Clone, Deserialize)]
pub struct TlsConfig {
    /// Root CA certificate.
    pub ca_path: PathBuf,
    /// Client certificate, required together with `client_key_path`.
    pub client_cert_path: Option<PathBuf>,
    /// Client private key, required together with `client_cert_path`.
    pub client_key_path: Option<PathBuf>,
}
