// Signal handling module
//
// Supported signals:
// - SIGHUP:  Reload routes from the configuration file
// - SIGTERM: Stop accepting connections
// - SIGINT:  Stop accepting connections (Ctrl+C)

use std::sync::Arc;

use crate::config::AppState;
use crate::logger;

/// Start signal handlers (Unix)
///
/// Signal streams are registered before this returns, so a failure to
/// install them is reported to the caller instead of the background task.
#[cfg(unix)]
pub fn start_signal_handler(state: Arc<AppState>) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sighup = signal(SignalKind::hangup())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    logger::log_info(&format!(
        "Signals: SIGHUP reloads routes, SIGTERM/SIGINT shut down (pid {})",
        std::process::id()
    ));

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = sighup.recv() => {
                    logger::log_info("SIGHUP received, reloading routes");
                    if let Err(e) = state.reload_routes() {
                        logger::log_error(&format!("Reload failed, keeping current routes: {e}"));
                    }
                }

                _ = sigterm.recv() => {
                    logger::log_info("SIGTERM received");
                    state.shutdown.notify_one();
                    break;
                }

                _ = sigint.recv() => {
                    logger::log_info("SIGINT received");
                    state.shutdown.notify_one();
                    break;
                }
            }
        }
    });

    Ok(())
}

/// Fallback for platforms without Unix signals - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(state: Arc<AppState>) -> std::io::Result<()> {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            logger::log_info("Ctrl+C received");
            state.shutdown.notify_one();
        }
    });
    Ok(())
}
