//! Configuration constants.
//!
//! This module defines the fixed limits and header values used by the proxy
//! pipeline, plus the defaults for the tunable settings in [`Config`](super::Config).

// Redirect handling
/// Maximum number of outbound requests issued for one proxied URL.
///
/// Each hop of a redirect chain (including the first request) consumes one
/// slot. A chain that would need a sixth request fails with `Too many redirects`.
pub const MAX_REDIRECT_HOPS: usize = 5;

/// Content type reported when the upstream omits `Content-Type`.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

// CORS headers attached by the proxy
/// `Access-Control-Allow-Origin` value for relayed content and preflight.
pub const CORS_ALLOW_ORIGIN: &str = "*";
/// `Access-Control-Allow-Methods` value on relayed content.
pub const CORS_ALLOW_METHODS: &str = "GET, POST";
/// `Access-Control-Allow-Methods` value on preflight responses.
pub const CORS_PREFLIGHT_ALLOW_METHODS: &str = "GET, POST, OPTIONS";
/// `Access-Control-Allow-Headers` value for relayed content and preflight.
pub const CORS_ALLOW_HEADERS: &str = "Content-Type";

// Network operation timeouts
/// DNS query timeout in seconds
/// Classification only needs one answer, so fail fast on slow name servers
pub const DNS_TIMEOUT_SECS: u64 = 3;

// Defaults for `Config`
/// Default bind address for the proxy server
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
/// Default listen port
pub const DEFAULT_PORT: u16 = 8787;
/// Default route the proxy endpoint is mounted on
pub const DEFAULT_ROUTE_PATH: &str = "/api/proxy";
/// Default transport timeout for one outbound request, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default TCP/TLS connect timeout, in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Default cap on a relayed upstream body (10 MiB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Default User-Agent string for outbound requests.
///
/// Can be overridden with the `--user-agent` CLI flag.
pub const DEFAULT_USER_AGENT: &str = concat!("fetch_proxy/", env!("CARGO_PKG_VERSION"));
