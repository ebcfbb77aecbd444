use std::fmt;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::config::{EmitterConfig, Variant};
use crate::payload::{AlarmAck, AlarmPayload};
use crate::source::CoinSource;
use crate::transport::AlarmTransport;

/// What the coins decided for one device on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    SmokeFire { smoke: bool, fire: bool },
    Button,
}

/// Result of one attempted send. `Display` gives the stdout line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Delivered {
        devid: String,
        status: u16,
        body: String,
    },
    Failed {
        devid: String,
        error: String,
    },
}

impl SendOutcome {
    pub fn devid(&self) -> &str {
        match self {
            SendOutcome::Delivered { devid, .. } | SendOutcome::Failed { devid, .. } => devid,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, SendOutcome::Failed { .. })
    }
}

impl fmt::Display for SendOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendOutcome::Delivered {
                devid,
                status,
                body,
            } => write!(f, "[{devid}] {status} -> {body}"),
            SendOutcome::Failed { devid, error } => write!(f, "[{devid}] ERROR: {error}"),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub attempted: u64,
    pub failed: u64,
}

impl RunSummary {
    fn record(&mut self, outcomes: &[SendOutcome]) {
        self.ticks += 1;
        self.attempted += outcomes.len() as u64;
        self.failed += outcomes.iter().filter(|o| o.is_failure()).count() as u64;
    }
}

pub struct Emitter<T, C, K> {
    config: EmitterConfig,
    transport: T,
    coins: C,
    clock: K,
}

impl<T, C, K> Emitter<T, C, K>
where
    T: AlarmTransport,
    C: CoinSource,
    K: Clock,
{
    pub fn new(config: EmitterConfig, transport: T, coins: C, clock: K) -> Self {
        Self {
            config,
            transport,
            coins,
            clock,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Flip the coins for one device. `None` means no alarm this tick.
    pub fn sample(&mut self) -> Option<Trigger> {
        match self.config.variant {
            Variant::Sensor => {
                let smoke = self.coins.flip();
                let fire = self.coins.flip();
                (smoke || fire).then_some(Trigger::SmokeFire { smoke, fire })
            }
            Variant::Button => self.coins.flip().then_some(Trigger::Button),
        }
    }

    pub fn build_payload(&self, devid: &str, trigger: Trigger) -> AlarmPayload {
        match trigger {
            Trigger::SmokeFire { smoke, fire } => {
                AlarmPayload::sensor(devid, smoke, fire, self.clock.now_local())
            }
            Trigger::Button => AlarmPayload::button(devid, self.clock.now_utc()),
        }
    }

    /// Build, POST and print a single alarm. Transport failures are printed
    /// and swallowed.
    pub async fn send_one(&self, devid: &str, trigger: Trigger) -> SendOutcome {
        let payload = self.build_payload(devid, trigger);

        let outcome = match self.transport.post(&payload).await {
            Ok(reply) => {
                if let Some(ack) = AlarmAck::decode(&reply.body) {
                    debug!(
                        devid,
                        success = ack.success,
                        ack = ack.ack,
                        ack_user = %ack.ack_user,
                        message = ack.message.as_deref().unwrap_or(""),
                        "endpoint acknowledged"
                    );
                }
                SendOutcome::Delivered {
                    devid: devid.to_string(),
                    status: reply.status,
                    body: reply.body,
                }
            }
            Err(e) => SendOutcome::Failed {
                devid: devid.to_string(),
                error: e.to_string(),
            },
        };

        println!("{outcome}");
        outcome
    }

    /// One pass over the device list, in order, one send at a time. Devices
    /// not yet reached when `shutdown` fires are left out.
    pub async fn tick(&mut self, shutdown: &CancellationToken) -> Vec<SendOutcome> {
        let mut outcomes = Vec::new();
        for idx in 0..self.config.devices.len() {
            if shutdown.is_cancelled() {
                debug!(skipped = self.config.devices.len() - idx, "tick cut short");
                break;
            }
            let Some(trigger) = self.sample() else {
                continue;
            };
            let devid = self.config.devices[idx].clone();
            outcomes.push(self.send_one(&devid, trigger).await);
        }
        outcomes
    }

    fn limit_reached(&self, summary: &RunSummary) -> bool {
        self.config.max_ticks.is_some_and(|max| summary.ticks >= max)
    }

    /// Tick, sleep, repeat until `shutdown` fires or `max_ticks` is reached.
    pub async fn run(&mut self, shutdown: CancellationToken) -> RunSummary {
        let mut summary = RunSummary::default();
        info!(
            variant = ?self.config.variant,
            url = %self.config.url,
            devices = self.config.devices.len(),
            interval = ?self.config.interval,
            "emitter started"
        );

        loop {
            if shutdown.is_cancelled() {
                break;
            }
            if self.limit_reached(&summary) {
                info!(ticks = summary.ticks, "tick limit reached");
                break;
            }

            let outcomes = self.tick(&shutdown).await;
            summary.record(&outcomes);
            debug!(tick = summary.ticks, sent = outcomes.len(), "tick finished");

            if shutdown.is_cancelled() {
                break;
            }
            // skip the sleep after the last permitted tick
            if self.limit_reached(&summary) {
                info!(ticks = summary.ticks, "tick limit reached");
                break;
            }

            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(self.config.interval) => {}
            }
        }

        info!(
            ticks = summary.ticks,
            attempted = summary.attempted,
            failed = summary.failed,
            "emitter stopped"
        );
        summary
    }
}
