//! MQTT adapter error types.

use std::path::PathBuf;

use gardenhub_domain::error::GardenHubError;

/// Errors specific to the MQTT adapter.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// The rumqttc client rejected a request.
    #[error("MQTT client error")]
    Client(#[source] rumqttc::ClientError),

    /// A TLS certificate or key could not be read.
    #[error("failed to read TLS material from {}", path.display())]
    Tls {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Only one of client certificate and client key was configured.
    #[error("client certificate and key must be configured together")]
    IncompleteClientAuth,

    /// The configured QoS is not 0, 1 or 2.
    #[error("unsupported QoS level {0}")]
    InvalidQos(u8),

    /// A domain-level error (validation, etc.).
    #[error("domain error")]
    Domain(#[source] GardenHubError),
}

impl MqttError {
    /// Convert into a [`GardenHubError::Transport`] for propagation across
    /// port boundaries.
    #[must_use]
    pub fn into_domain(self) -> GardenHubError {
        match self {
            Self::Domain(err) => err,
            other => GardenHubError::Transport(Box::new(other)),
        }
    }
}

impl From<MqttError> for GardenHubError {
    fn from(err: MqttError) -> Self {
        err.into_domain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gardenhub_domain::error::ValidationError;

    #[test]
    fn should_display_invalid_qos_error() {
        let err = MqttError::InvalidQos(3);
        assert_eq!(err.to_string(), "unsupported QoS level 3");
    }

    #[test]
    fn should_display_tls_path() {
        let err = MqttError::Tls {
            path: PathBuf::from("/etc/gardenhub/ca.pem"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(
            err.to_string(),
            "failed to read TLS material from /etc/gardenhub/ca.pem"
        );
    }

    #[test]
    fn should_convert_invalid_qos_to_transport_error() {
        let err: GardenHubError = MqttError::InvalidQos(7).into();
        assert!(matches!(err, GardenHubError::Transport(_)));
    }

    #[test]
    fn should_convert_domain_error_back_to_domain() {
        let domain_err = GardenHubError::Validation(ValidationError::EmptyEndpoint);
        let back: GardenHubError = MqttError::Domain(domain_err).into();
        assert!(matches!(
            back,
            GardenHubError::Validation(ValidationError::EmptyEndpoint)
        ));
    }
}
