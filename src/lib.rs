//! fetch_proxy library: an SSRF-guarded HTTP forwarding proxy
//!
//! Lets a browser fetch an arbitrary public URL through the server while
//! refusing any hop (including redirect targets) that resolves into a
//! private, loopback, link-local, or multicast/reserved range.
//!
//! # Example
//!
//! ```no_run
//! use fetch_proxy::{run_server, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     port: 9000,
//!     ..Default::default()
//! };
//! run_server(config).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

mod app;
pub mod config;
pub mod error_handling;
pub mod fetch;
pub mod initialization;
pub mod proxy_server;
pub mod security;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::{ErrorKind, ProxyError};
pub use fetch::{fetch_with_redirects, ProxyOutcome, UpstreamContent};
pub use proxy_server::{proxy_router, start_proxy_server, ProxyState};

use anyhow::{Context, Result};

use crate::app::shutdown_on_ctrl_c;
use crate::initialization::{init_host_resolver, init_proxy_client};

/// Runs the proxy server with the provided configuration until Ctrl-C.
///
/// Builds the outbound client and DNS resolver, binds the listener and
/// serves requests. Logging and the TLS crypto provider are left to the
/// caller (see [`initialization`]).
///
/// # Errors
///
/// This function will return an error if:
/// - The HTTP client cannot be built (e.g. invalid User-Agent)
/// - The listen address cannot be bound
/// - The server fails while running
pub async fn run_server(config: Config) -> Result<()> {
    let client = init_proxy_client(&config).context("Failed to initialize HTTP client")?;
    let state =
        ProxyState::new(client, init_host_resolver()).with_max_body_bytes(config.max_body_bytes);

    let shutdown = shutdown_on_ctrl_c();
    start_proxy_server(&config, state, shutdown).await
}
