//! Signal handling for graceful shutdown.

use anyhow::{Context, Result};
use tokio::signal::unix::{SignalKind, signal};
use tracing::{info, warn};

/// Watch for SIGTERM and SIGINT on a background thread.
///
/// The main thread belongs to the CoreFoundation run loop, so the signals
/// are awaited on a dedicated current-thread runtime. `on_shutdown` runs
/// once, on that thread, when the first signal arrives.
pub fn spawn_shutdown_watcher<F>(on_shutdown: F) -> Result<()>
where
    F: FnOnce() + Send + 'static,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build signal runtime")?;

    std::thread::Builder::new()
        .name("volknob-signals".to_string())
        .spawn(move || {
            if runtime.block_on(wait_for_shutdown()) {
                on_shutdown();
            }
        })
        .context("Failed to spawn signal thread")?;

    Ok(())
}

/// Resolve on the first shutdown signal. `false` means no signal can be
/// received at all.
async fn wait_for_shutdown() -> bool {
    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(e) => {
            warn!(error = %e, "Unable to listen for SIGTERM");
            return wait_for_interrupt().await;
        }
    };

    tokio::select! {
        _ = terminate.recv() => {
            info!("Received SIGTERM");
            true
        }
        interrupted = wait_for_interrupt() => {
            if !interrupted {
                terminate.recv().await;
                info!("Received SIGTERM");
            }
            true
        }
    }
}

async fn wait_for_interrupt() -> bool {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            info!("Received SIGINT");
            true
        }
        Err(e) => {
            warn!(error = %e, "Unable to listen for SIGINT");
            false
        }
    }
}
