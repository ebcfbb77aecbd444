use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

pub const SENSOR_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const BUTTON_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Request body for `POST /api/alarms/firealm`.
///
/// Serialized untagged: the wire shape is a flat object whose keys depend on
/// the device family. `devid` stays lowercase for both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AlarmPayload {
    Sensor {
        devid: String,
        smoke: bool,
        fire: bool,
        time: String,
    },
    Button {
        devid: String,
        button: bool,
        time: String,
    },
}

impl AlarmPayload {
    pub fn sensor(devid: impl Into<String>, smoke: bool, fire: bool, now: DateTime<Local>) -> Self {
        AlarmPayload::Sensor {
            devid: devid.into(),
            smoke,
            fire,
            time: now.format(SENSOR_TIME_FORMAT).to_string(),
        }
    }

    pub fn button(devid: impl Into<String>, now: DateTime<Utc>) -> Self {
        AlarmPayload::Button {
            devid: devid.into(),
            button: true,
            time: now.format(BUTTON_TIME_FORMAT).to_string(),
        }
    }

    pub fn devid(&self) -> &str {
        match self {
            AlarmPayload::Sensor { devid, .. } | AlarmPayload::Button { devid, .. } => devid,
        }
    }

    pub fn time(&self) -> &str {
        match self {
            AlarmPayload::Sensor { time, .. } | AlarmPayload::Button { time, .. } => time,
        }
    }
}

/// Reply of the alarm endpoint, when it answers in its usual JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmAck {
    pub success: bool,
    #[serde(default)]
    pub ack: bool,
    #[serde(default)]
    pub ack_user: String,
    #[serde(default)]
    pub date_time: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl AlarmAck {
    pub fn decode(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }
}
