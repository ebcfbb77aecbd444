use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use tracing::debug;

use crate::config::{EmitterConfig, Variant};
use crate::error::{ConfigError, TransportError};
use crate::payload::AlarmPayload;

/// Status and raw body of whatever the endpoint answered, 2xx or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

#[async_trait]
pub trait AlarmTransport: Send + Sync {
    /// Issue exactly one POST; no retries.
    async fn post(&self, payload: &AlarmPayload) -> Result<HttpReply, TransportError>;
}

pub struct HttpTransport {
    client: Client,
    url: String,
    explicit_content_type: bool,
}

impl HttpTransport {
    pub fn new(config: &EmitterConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            client,
            url: config.url.clone(),
            explicit_content_type: config.variant == Variant::Button,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl AlarmTransport for HttpTransport {
    async fn post(&self, payload: &AlarmPayload) -> Result<HttpReply, TransportError> {
        let request = if self.explicit_content_type {
            self.client
                .post(&self.url)
                .header(CONTENT_TYPE, "application/json")
                .body(serde_json::to_vec(payload)?)
        } else {
            // reqwest fills in the json content type on its own here
            self.client.post(&self.url).json(payload)
        };

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(devid = payload.devid(), status, "alarm posted");

        Ok(HttpReply { status, body })
    }
}
