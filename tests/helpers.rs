// Shared test helpers for driving the proxy router against a mock upstream.
//
// The proxy refuses loopback addresses, but wiremock only listens on
// 127.0.0.1. Tests therefore use made-up hostnames: the static DNS table tells
// the classifier what they "resolve" to, and reqwest's resolve override sends
// the actual connection to the mock server.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;
use wiremock::MockServer;

use fetch_proxy::security::{DnsLookup, HostResolver, LookupFuture};
use fetch_proxy::{proxy_router, ProxyState};

/// Route the test router is mounted on.
pub const ROUTE: &str = "/api/proxy";

/// Hostname classified as a public address.
pub const PUBLIC_HOST: &str = "public.test";

/// Hostname whose DNS answer is a private address.
#[allow(dead_code)]
pub const INTERNAL_HOST: &str = "internal.test";

/// Hostname the DNS table does not know.
#[allow(dead_code)]
pub const UNRESOLVABLE_HOST: &str = "unresolvable.test";

/// Static DNS table that counts lookups.
pub struct StaticDns {
    entries: HashMap<String, IpAddr>,
    calls: AtomicUsize,
}

impl StaticDns {
    fn standard() -> Self {
        let mut entries = HashMap::new();
        entries.insert(PUBLIC_HOST.to_string(), "93.184.216.34".parse().unwrap());
        entries.insert(INTERNAL_HOST.to_string(), "10.0.0.5".parse().unwrap());
        Self {
            entries,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of DNS lookups performed so far.
    #[allow(dead_code)]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DnsLookup for StaticDns {
    fn lookup<'a>(&'a self, host: &'a str) -> LookupFuture<'a> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.entries
                .get(host)
                .copied()
                .map(Some)
                .ok_or_else(|| anyhow::anyhow!("NXDOMAIN {}", host))
        })
    }
}

/// Builds a proxy router whose test hostnames all connect to `server`.
pub fn test_router(server: &MockServer) -> (Router, Arc<StaticDns>) {
    test_router_with_limit(server, fetch_proxy::config::DEFAULT_MAX_BODY_BYTES)
}

/// Like [`test_router`], with a custom relayed body limit.
pub fn test_router_with_limit(
    server: &MockServer,
    max_body_bytes: usize,
) -> (Router, Arc<StaticDns>) {
    let dns = Arc::new(StaticDns::standard());
    let resolver = HostResolver::new(dns.clone());

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .resolve(PUBLIC_HOST, *server.address())
        .resolve(INTERNAL_HOST, *server.address())
        .resolve(UNRESOLVABLE_HOST, *server.address())
        .build()
        .expect("Failed to build test client");

    let state = ProxyState::new(client, resolver).with_max_body_bytes(max_body_bytes);
    (proxy_router(state, ROUTE), dns)
}

/// URL on the mock server reached through `host`.
pub fn upstream_url(server: &MockServer, host: &str, path: &str) -> String {
    format!("http://{}:{}{}", host, server.address().port(), path)
}

/// `GET /api/proxy?url=<target>` with the target percent-encoded.
pub fn get_request(target: &str) -> Request<Body> {
    let encoded: String = url::form_urlencoded::byte_serialize(target.as_bytes()).collect();
    Request::builder()
        .method("GET")
        .uri(format!("{}?url={}", ROUTE, encoded))
        .body(Body::empty())
        .expect("Failed to build GET request")
}

/// `POST /api/proxy` with a raw body.
#[allow(dead_code)]
pub fn post_request(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(ROUTE)
        .header("content-type", "application/json")
        .body(body.into())
        .expect("Failed to build POST request")
}

/// Sends a request through the router and collects the response.
pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
    let response = router
        .oneshot(request)
        .await
        .expect("Router is infallible");
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    (status, headers, body)
}

/// Extracts the `error` string from a JSON error body.
#[allow(dead_code)]
pub fn error_message(body: &Bytes) -> String {
    let value: serde_json::Value =
        serde_json::from_slice(body).expect("Error body should be JSON");
    value["error"]
        .as_str()
        .expect("Error body should carry an error string")
        .to_string()
}
