//! Proxy server types.

use crate::config::DEFAULT_MAX_BODY_BYTES;
use crate::security::HostResolver;

/// Shared state for the proxy handlers.
///
/// Immutable after start-up; cloning is cheap (`reqwest::Client` and
/// `HostResolver` are reference-counted).
#[derive(Clone, Debug)]
pub struct ProxyState {
    /// Outbound client with redirects disabled
    pub client: reqwest::Client,
    /// Resolver used to classify each hop
    pub resolver: HostResolver,
    /// Largest upstream body relayed to the caller
    pub max_body_bytes: usize,
}

impl ProxyState {
    /// Bundles a client and resolver into handler state with the default body limit.
    pub fn new(client: reqwest::Client, resolver: HostResolver) -> Self {
        Self {
            client,
            resolver,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Overrides the relayed body limit.
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}
