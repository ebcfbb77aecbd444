use std::time::Duration;

use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

pub const ENV_PREFIX: &str = "FIREALARM_";

/// Which device family the emitter impersonates.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Smoke/fire sensor, local `YYYY-MM-DD HH:MM:SS` timestamps.
    #[default]
    Sensor,
    /// Manual call point, UTC `YYYY-MM-DDTHH:MM:SSZ` timestamps.
    Button,
}

impl Variant {
    pub fn default_url(self) -> &'static str {
        match self {
            Variant::Sensor => "http://localhost:3300/api/alarms/firealm",
            Variant::Button => "https://api.snipcol.com/api/alarms/firealm",
        }
    }

    pub fn default_devices(self) -> Vec<String> {
        match self {
            Variant::Sensor => vec!["DEV001".to_string(), "DEV002".to_string()],
            Variant::Button => vec!["dev201".to_string()],
        }
    }
}

/// Raw layered settings as read from defaults and `FIREALARM_*` env vars.
#[derive(Debug, Deserialize, Serialize, Clone)]
struct Settings {
    variant: Variant,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    devices: Option<Vec<String>>,
    interval_secs: u64,
    timeout_secs: u64,
    #[serde(default)]
    max_ticks: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            variant: Variant::Sensor,
            url: None,
            devices: None,
            interval_secs: 5,
            timeout_secs: 5,
            max_ticks: None,
        }
    }
}

/// Everything the emitter needs, resolved and validated.
#[derive(Debug, Clone, PartialEq)]
pub struct EmitterConfig {
    pub variant: Variant,
    pub url: String,
    pub devices: Vec<String>,
    pub interval: Duration,
    pub timeout: Duration,
    /// Stop after this many ticks; `None` runs until cancelled.
    pub max_ticks: Option<u64>,
}

impl EmitterConfig {
    /// Compiled-in defaults for a variant.
    pub fn for_variant(variant: Variant) -> Self {
        Self {
            variant,
            url: variant.default_url().to_string(),
            devices: variant.default_devices(),
            interval: Duration::from_secs(5),
            timeout: Duration::from_secs(5),
            max_ticks: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_devices<I, S>(mut self, devices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.devices = devices.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }

    /// Defaults overlaid with `FIREALARM_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Settings::default())).merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let settings: Settings = figment.extract()?;
        let variant = settings.variant;

        let config = Self {
            variant,
            url: settings
                .url
                .unwrap_or_else(|| variant.default_url().to_string()),
            devices: settings
                .devices
                .unwrap_or_else(|| variant.default_devices()),
            interval: Duration::from_secs(settings.interval_secs),
            timeout: Duration::from_secs(settings.timeout_secs),
            max_ticks: settings.max_ticks,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.devices.is_empty() {
            return Err(ConfigError::NoDevices);
        }
        if let Some(idx) = self.devices.iter().position(|d| d.trim().is_empty()) {
            return Err(ConfigError::EmptyDeviceId(idx));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        Url::parse(&self.url).map_err(|source| ConfigError::InvalidUrl {
            url: self.url.clone(),
            source,
        })?;
        Ok(())
    }
}
