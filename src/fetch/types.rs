//! Fetch pipeline value types.

use axum::body::Bytes;
use axum::http::HeaderValue;
use reqwest::Url;

use crate::error_handling::ProxyError;

/// A successful upstream response, ready to relay.
#[derive(Debug, Clone)]
pub struct UpstreamContent {
    /// Raw upstream body
    pub body: Bytes,
    /// Upstream `Content-Type` byte for byte, or `application/octet-stream` when absent
    pub content_type: HeaderValue,
}

/// Result of driving one proxied URL through the pipeline.
pub type ProxyOutcome = Result<UpstreamContent, ProxyError>;

/// What a single hop produced.
#[derive(Debug)]
pub(crate) enum HopOutcome {
    /// The hop answered with a followable redirect.
    Redirected(Url),
    /// The hop answered with content.
    Content(UpstreamContent),
}
