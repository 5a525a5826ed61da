//! HTTP client initialization.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::Config;
use crate::error_handling::InitializationError;
use crate::security::GuardedResolver;

/// Initializes the outbound HTTP client.
///
/// Creates a `reqwest::Client` with redirects disabled so the fetch pipeline
/// sees every 3xx response and can classify each hop before following it.
/// Name lookups go through [`GuardedResolver`], so the connector never dials
/// a blocked address even if DNS answers differently than it did during
/// classification. Proxies from the environment are ignored for the same
/// reason: the address classified must be the address dialed.
/// The transport timeouts here are the only upper bound on a stalled upstream.
///
/// # Arguments
///
/// * `config` - Proxy configuration containing user-agent and timeout settings
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails.
pub fn init_proxy_client(config: &Config) -> Result<reqwest::Client, InitializationError> {
    let client = ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::none())
        .dns_resolver(Arc::new(GuardedResolver))
        .no_proxy()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(client)
}
