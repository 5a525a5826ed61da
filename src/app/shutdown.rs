//! Graceful shutdown handling.

use tokio_util::sync::CancellationToken;

/// Returns a token that is cancelled when the process receives Ctrl-C.
///
/// In-flight requests finish before the server future resolves.
pub fn shutdown_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => log::info!("Shutdown signal received, draining requests"),
            Err(e) => {
                log::error!("Failed to listen for shutdown signal: {}", e);
                return;
            }
        }
        trigger.cancel();
    });
    token
}
