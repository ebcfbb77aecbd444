use std::time::Duration;

use chrono::{DateTime, Local, TimeZone, Utc};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use firealarm_sim::{
    Emitter, EmitterConfig, FixedClock, HttpTransport, ScriptedCoins, SendOutcome, Variant,
};

const ALARM_PATH: &str = "/api/alarms/firealm";

fn instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 11, 5, 18, 4, 9).unwrap()
}

fn emitter_for(
    config: EmitterConfig,
    flips: impl IntoIterator<Item = bool>,
) -> Emitter<HttpTransport, ScriptedCoins, FixedClock> {
    let transport = HttpTransport::new(&config).unwrap();
    Emitter::new(config, transport, ScriptedCoins::new(flips), FixedClock(instant()))
}

#[tokio::test]
async fn smoke_alarm_is_posted_as_json() {
    let server = MockServer::start().await;
    let time = instant()
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string();

    Mock::given(method("POST"))
        .and(path(ALARM_PATH))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "devid": "DEV001",
            "smoke": true,
            "fire": false,
            "time": time,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"success":true,"ack":false,"ackUser":"","dateTime":"2024-11-05T18:04:09.000Z"}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let config = EmitterConfig::for_variant(Variant::Sensor)
        .with_url(format!("{}{ALARM_PATH}", server.uri()))
        .with_devices(["DEV001"]);
    let mut emitter = emitter_for(config, [true, false]);

    let outcomes = emitter.tick(&CancellationToken::new()).await;

    assert_eq!(outcomes.len(), 1);
    assert_eq!(
        outcomes[0].to_string(),
        r#"[DEV001] 200 -> {"success":true,"ack":false,"ackUser":"","dateTime":"2024-11-05T18:04:09.000Z"}"#
    );
}

#[tokio::test]
async fn quiet_tick_issues_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = EmitterConfig::for_variant(Variant::Sensor)
        .with_url(format!("{}{ALARM_PATH}", server.uri()))
        .with_devices(["DEV001"]);
    let mut emitter = emitter_for(config, [false, false]);

    assert!(emitter.tick(&CancellationToken::new()).await.is_empty());
}

#[tokio::test]
async fn unreachable_endpoint_prints_error_and_keeps_running() {
    let config = EmitterConfig::for_variant(Variant::Sensor)
        .with_url(format!("http://127.0.0.1:1{ALARM_PATH}"))
        .with_devices(["DEV001"])
        .with_timeout(Duration::from_secs(1))
        .with_interval(Duration::from_millis(10))
        .with_max_ticks(2);
    let mut emitter = emitter_for(config.clone(), [true, true, true, false]);

    let outcome = emitter
        .send_one("DEV001", firealarm_sim::Trigger::SmokeFire { smoke: true, fire: true })
        .await;
    assert!(outcome.is_failure());
    assert!(outcome.to_string().starts_with("[DEV001] ERROR: "));

    let mut emitter = emitter_for(config, [true, true, true, false]);
    let summary = emitter.run(CancellationToken::new()).await;
    assert_eq!(summary.ticks, 2);
    assert_eq!(summary.attempted, 2);
    assert_eq!(summary.failed, 2);
}

#[tokio::test]
async fn server_error_is_reported_not_raised() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ALARM_PATH))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_string(r#"{"success":false,"message":"Internal server error"}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = EmitterConfig::for_variant(Variant::Sensor)
        .with_url(format!("{}{ALARM_PATH}", server.uri()))
        .with_devices(["DEV002"]);
    let mut emitter = emitter_for(config, [false, true]);

    let outcomes = emitter.tick(&CancellationToken::new()).await;
    assert_eq!(
        outcomes,
        vec![SendOutcome::Delivered {
            devid: "DEV002".to_string(),
            status: 500,
            body: r#"{"success":false,"message":"Internal server error"}"#.to_string(),
        }]
    );
}

#[tokio::test]
async fn button_press_carries_content_type_and_utc_time() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ALARM_PATH))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({ "devid": "dev201", "button": true })))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"success\":true}"))
        .expect(1)
        .mount(&server)
        .await;

    let config = EmitterConfig::for_variant(Variant::Button)
        .with_url(format!("{}{ALARM_PATH}", server.uri()))
        .with_devices(["dev201"]);
    let mut emitter = emitter_for(config, [true]);

    let outcomes = emitter.tick(&CancellationToken::new()).await;
    assert_eq!(outcomes.len(), 1);

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let time = body["time"].as_str().unwrap();
    assert_eq!(time, "2024-11-05T18:04:09Z");
    assert!(time.ends_with('Z'));
    assert!(body.get("smoke").is_none());
}

#[tokio::test]
async fn slow_endpoint_hits_the_request_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ALARM_PATH))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let config = EmitterConfig::for_variant(Variant::Sensor)
        .with_url(format!("{}{ALARM_PATH}", server.uri()))
        .with_devices(["DEV001"])
        .with_timeout(Duration::from_secs(1));
    let mut emitter = emitter_for(config, [true, true]);

    let started = std::time::Instant::now();
    let outcomes = emitter.tick(&CancellationToken::new()).await;

    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].is_failure());
    assert!(outcomes[0].to_string().starts_with("[DEV001] ERROR: "));
    assert!(started.elapsed() < Duration::from_secs(3));
}
