use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Cancel `token` on Ctrl+C, or SIGTERM on unix.
pub async fn cancel_on_signal(token: CancellationToken) {
    if let Some(signal) = wait_for_signal().await {
        info!("received {signal}, stopping once the in-flight send returns");
        token.cancel();
    }
}

#[cfg(unix)]
async fn wait_for_signal() -> Option<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            warn!("failed to install SIGTERM handler: {e}");
            return ctrl_c().await;
        }
    };

    tokio::select! {
        name = ctrl_c() => name,
        _ = sigterm.recv() => Some("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> Option<&'static str> {
    ctrl_c().await
}

async fn ctrl_c() -> Option<&'static str> {
    match tokio::signal::ctrl_c().await {
        Ok(()) => Some("Ctrl+C"),
        Err(e) => {
            warn!("failed to listen for Ctrl+C: {e}");
            None
        }
    }
}
