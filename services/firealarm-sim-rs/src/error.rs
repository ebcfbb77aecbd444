use thiserror::Error;

/// Fatal problems found while building the emitter at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] figment::Error),

    #[error("device list is empty")]
    NoDevices,

    #[error("device id at position {0} is empty")]
    EmptyDeviceId(usize),

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,

    #[error("tick interval must be greater than zero")]
    ZeroInterval,

    #[error("invalid target url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build http client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Anything that goes wrong while attempting a single POST.
///
/// Never escapes the send path: the emitter prints it next to the device id
/// and moves on.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_name_the_problem() {
        assert_eq!(ConfigError::NoDevices.to_string(), "device list is empty");
        assert_eq!(
            ConfigError::EmptyDeviceId(2).to_string(),
            "device id at position 2 is empty"
        );

        let source = url::Url::parse("not a url").unwrap_err();
        let err = ConfigError::InvalidUrl {
            url: "not a url".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("invalid target url not a url: "));
    }

    #[test]
    fn other_transport_error_is_printed_verbatim() {
        let err = TransportError::Other("connection refused".to_string());
        assert_eq!(err.to_string(), "connection refused");
    }
}
