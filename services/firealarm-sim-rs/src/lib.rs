//! Fire alarm dummy generator: posts randomized alarm events for a fixed set
//! of simulated devices to the alarm monitoring API.

pub mod clock;
pub mod config;
pub mod emitter;
pub mod error;
pub mod payload;
pub mod shutdown;
pub mod source;
pub mod transport;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{EmitterConfig, Variant};
pub use emitter::{Emitter, RunSummary, SendOutcome, Trigger};
pub use error::{ConfigError, TransportError};
pub use payload::{AlarmAck, AlarmPayload};
pub use source::{CoinSource, RandomCoins, ScriptedCoins};
pub use transport::{AlarmTransport, HttpReply, HttpTransport};
