use dotenvy::dotenv;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use firealarm_sim::{
    shutdown, ConfigError, Emitter, EmitterConfig, HttpTransport, RandomCoins, SystemClock,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ConfigError> {
    dotenv().ok();
    // stdout carries the alarm lines, diagnostics go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = EmitterConfig::load()?;
    let transport = HttpTransport::new(&config)?;

    println!("🔥 Fire Alarm Dummy Generator Started");
    println!("Press CTRL+C to stop\n");

    let stop = CancellationToken::new();
    tokio::spawn(shutdown::cancel_on_signal(stop.clone()));

    let mut emitter = Emitter::new(config, transport, RandomCoins::from_entropy(), SystemClock);
    let summary = emitter.run(stop).await;
    info!("done after {} ticks, {} sends", summary.ticks, summary.attempted);
    Ok(())
}
