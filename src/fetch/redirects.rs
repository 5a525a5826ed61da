//! Redirect-following fetch with per-hop SSRF checks.
//!
//! The HTTP client never follows redirects itself (see
//! [`init_proxy_client`](crate::initialization::init_proxy_client)), so every
//! 3xx response comes back here. Each hop is resolved and classified before a
//! request is sent to it, so a chain cannot hop from an allowed host to a
//! blocked one.

use axum::body::Bytes;
use reqwest::header::{HeaderValue, CONTENT_TYPE, LOCATION};
use reqwest::Url;

use super::types::{HopOutcome, ProxyOutcome, UpstreamContent};
use crate::config::{DEFAULT_CONTENT_TYPE, MAX_REDIRECT_HOPS};
use crate::error_handling::ProxyError;
use crate::security::{classify, Classification, HostResolver};

/// Fetches `start_url`, following redirects manually up to [`MAX_REDIRECT_HOPS`] requests.
///
/// # Arguments
///
/// * `start_url` - Caller-supplied target URL (untrusted)
/// * `client` - HTTP client with redirects disabled
/// * `resolver` - Host resolver used for classification
/// * `max_body_bytes` - Largest upstream body that will be relayed
///
/// # Returns
///
/// The final upstream body and content type, or a [`ProxyError`]:
/// - `TooManyRedirects` when the chain needs more than [`MAX_REDIRECT_HOPS`] requests
/// - `PrivateAddressBlocked` when any hop resolves into a blocked range
/// - `UpstreamFailure` for a non-2xx status that is not a followable redirect
/// - `BodyTooLarge` when the final body exceeds `max_body_bytes`
/// - `ProxyFailure` for malformed URLs and transport errors
pub async fn fetch_with_redirects(
    start_url: &str,
    client: &reqwest::Client,
    resolver: &HostResolver,
    max_body_bytes: usize,
) -> ProxyOutcome {
    let mut current = Url::parse(start_url)?;

    for hop in 0..MAX_REDIRECT_HOPS {
        ensure_allowed(&current, resolver).await?;

        log::debug!("Fetching {} (hop {})", current, hop);
        match fetch_hop(&current, client, max_body_bytes).await? {
            HopOutcome::Redirected(next) => {
                log::debug!("Hop {}: {} redirected to {}", hop, current, next);
                current = next;
            }
            HopOutcome::Content(content) => return Ok(content),
        }
    }

    log::warn!(
        "Giving up on {} after {} requests (last target: {})",
        start_url,
        MAX_REDIRECT_HOPS,
        current
    );
    Err(ProxyError::TooManyRedirects)
}

/// Resolves and classifies the host of `url`, failing if it is blocked.
async fn ensure_allowed(url: &Url, resolver: &HostResolver) -> Result<(), ProxyError> {
    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(ProxyError::failure(anyhow::anyhow!(
                "Unsupported URL scheme '{}': {}",
                scheme,
                url
            )))
        }
    }

    let host = url
        .host_str()
        .ok_or_else(|| ProxyError::failure(anyhow::anyhow!("URL has no host: {}", url)))?;

    let address = resolver.resolve(host).await;
    match classify(&address) {
        Classification::Allowed => Ok(()),
        Classification::Blocked(reason) => {
            log::warn!(
                "Blocked request to {} (resolved to {}, reason: {})",
                url,
                address,
                reason
            );
            Err(ProxyError::PrivateAddressBlocked {
                host: host.to_string(),
                reason,
            })
        }
    }
}

/// Issues one request and inspects the response.
async fn fetch_hop(
    url: &Url,
    client: &reqwest::Client,
    max_body_bytes: usize,
) -> Result<HopOutcome, ProxyError> {
    let mut response = client.get(url.clone()).send().await?;
    let status = response.status();

    if (301..=308).contains(&status.as_u16()) {
        if let Some(location) = response.headers().get(LOCATION) {
            let location = location.to_str().map_err(ProxyError::failure)?;
            // Url::join handles both absolute and relative Location values
            let next = url.join(location)?;
            return Ok(HopOutcome::Redirected(next));
        }
        log::warn!("Redirect status {} for {} but no Location header", status, url);
    }

    if !status.is_success() {
        return Err(ProxyError::UpstreamFailure {
            status,
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    let body = read_capped(&mut response, max_body_bytes).await?;

    Ok(HopOutcome::Content(UpstreamContent { body, content_type }))
}

/// Reads the body chunk by chunk, giving up once it exceeds `limit` bytes.
async fn read_capped(response: &mut reqwest::Response, limit: usize) -> Result<Bytes, ProxyError> {
    if let Some(declared) = response.content_length() {
        if declared > limit as u64 {
            log::warn!(
                "Upstream {} declares {} bytes, over the {} byte limit",
                response.url(),
                declared,
                limit
            );
            return Err(ProxyError::BodyTooLarge { limit });
        }
    }

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if body.len() + chunk.len() > limit {
            log::warn!("Upstream {} exceeded the {} byte limit", response.url(), limit);
            return Err(ProxyError::BodyTooLarge { limit });
        }
        body.extend_from_slice(&chunk);
    }
    Ok(Bytes::from(body))
}
