//! HTTP server for the proxy endpoint.
//!
//! Mounts one route (default `/api/proxy`) with three methods:
//! - `GET ?url=...` - proxy the URL from the query string
//! - `POST {"url": ...}` - proxy the URL from a JSON body
//! - `OPTIONS` - CORS preflight
//!
//! Each request runs as its own task with no shared mutable state.

mod handlers;
mod types;

use axum::routing::get;
use axum::Router;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error_handling::InitializationError;
use handlers::{preflight, proxy_get, proxy_post};
pub use types::ProxyState;

/// Builds the router serving the proxy endpoint at `route_path`.
///
/// # Panics
///
/// Panics if `route_path` is not a valid axum path (it must start with `/`).
/// [`start_proxy_server`] validates the path before calling this.
pub fn proxy_router(state: ProxyState, route_path: &str) -> Router {
    Router::new()
        .route(
            route_path,
            get(proxy_get).post(proxy_post).options(preflight),
        )
        .with_state(state)
}

/// Binds the configured address and serves the proxy until `shutdown` fires.
///
/// # Errors
///
/// Returns an error if the route path is invalid, the address cannot be
/// bound, or the server fails while running.
pub async fn start_proxy_server(
    config: &Config,
    state: ProxyState,
    shutdown: CancellationToken,
) -> Result<(), anyhow::Error> {
    if !config.route_path.starts_with('/') {
        return Err(anyhow::anyhow!(
            "Route path must start with '/': {}",
            config.route_path
        ));
    }

    let app = proxy_router(state, &config.route_path);

    let address = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|source| InitializationError::BindError {
            address: address.clone(),
            source,
        })?;

    log::info!(
        "Proxy listening on http://{}{}",
        listener.local_addr().map(|a| a.to_string()).unwrap_or(address),
        config.route_path
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| anyhow::anyhow!("Proxy server error: {}", e))?;

    log::info!("Proxy server stopped");
    Ok(())
}
