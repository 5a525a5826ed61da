//! End-to-end tests for the proxy endpoint.
//!
//! Each test drives the axum router directly (no listening socket) against a
//! wiremock upstream and checks status, headers, body, and how many upstream
//! requests were made.

mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use helpers::{
    error_message, get_request, post_request, send, test_router, test_router_with_limit,
    upstream_url, INTERNAL_HOST, PUBLIC_HOST, ROUTE, UNRESOLVABLE_HOST,
};

/// Mounts a catch-all that must never be hit.
async fn forbid_any_request(server: &MockServer) {
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("leaked"))
        .expect(0)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_get_relays_public_content() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0x89, b'P', b'N', b'G'], "image/png"))
        .expect(1)
        .mount(&server)
        .await;

    let (router, _) = test_router(&server);
    let (status, headers, body) = send(
        router,
        get_request(&upstream_url(&server, PUBLIC_HOST, "/logo.png")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_ref(), &[0x89, b'P', b'N', b'G']);
    assert_eq!(headers["content-type"], "image/png");
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "GET, POST");
    assert_eq!(headers["access-control-allow-headers"], "Content-Type");
}

#[tokio::test]
async fn test_non_200_success_is_relayed_as_200() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/created"))
        .respond_with(ResponseTemplate::new(203).set_body_raw("partial", "text/plain"))
        .mount(&server)
        .await;

    let (router, _) = test_router(&server);
    let (status, _, body) = send(
        router,
        get_request(&upstream_url(&server, PUBLIC_HOST, "/created")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_ref(), b"partial");
}

#[tokio::test]
async fn test_post_relays_public_content() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<rss/>", "application/rss+xml"))
        .expect(1)
        .mount(&server)
        .await;

    let (router, _) = test_router(&server);
    let body = serde_json::json!({ "url": upstream_url(&server, PUBLIC_HOST, "/feed.xml") });
    let (status, headers, body) = send(router, post_request(body.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_ref(), b"<rss/>");
    assert_eq!(headers["content-type"], "application/rss+xml");
}

#[tokio::test]
async fn test_localhost_is_blocked_without_dns_or_fetch() {
    let server = MockServer::start().await;
    forbid_any_request(&server).await;

    let (router, dns) = test_router(&server);
    let target = format!("http://localhost:{}/anything", server.address().port());
    let (status, _, body) = send(router, get_request(&target)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        error_message(&body),
        "Access to private/internal addresses not allowed"
    );
    assert_eq!(dns.calls(), 0);
}

#[tokio::test]
async fn test_private_literals_are_blocked() {
    let server = MockServer::start().await;
    forbid_any_request(&server).await;

    for target in [
        format!("http://127.0.0.1:{}/", server.address().port()),
        "http://10.1.2.3/".to_string(),
        "http://172.20.0.1/".to_string(),
        "http://192.168.0.1/admin".to_string(),
        "http://169.254.169.254/latest/meta-data/".to_string(),
        "http://0.0.0.0/".to_string(),
        "http://239.1.1.1/".to_string(),
        "http://[::1]/".to_string(),
    ] {
        let (router, _) = test_router(&server);
        let (status, _, _) = send(router, get_request(&target)).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{} should be blocked", target);
    }
}

#[tokio::test]
async fn test_hostname_resolving_to_private_address_is_blocked() {
    let server = MockServer::start().await;
    forbid_any_request(&server).await;

    let (router, dns) = test_router(&server);
    let (status, _, _) = send(
        router,
        get_request(&upstream_url(&server, INTERNAL_HOST, "/")),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(dns.calls(), 1);
}

#[tokio::test]
async fn test_redirect_into_loopback_is_blocked_at_second_hop() {
    let server = MockServer::start().await;
    let secret = format!("http://127.0.0.1:{}/secret", server.address().port());
    Mock::given(method("GET"))
        .and(path("/bounce"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", secret.as_str()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/secret"))
        .respond_with(ResponseTemplate::new(200).set_body_string("secret"))
        .expect(0)
        .mount(&server)
        .await;

    let (router, _) = test_router(&server);
    let (status, _, body) = send(
        router,
        get_request(&upstream_url(&server, PUBLIC_HOST, "/bounce")),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        error_message(&body),
        "Access to private/internal addresses not allowed"
    );
}

#[tokio::test]
async fn test_redirect_to_internal_hostname_is_blocked() {
    let server = MockServer::start().await;
    let internal = upstream_url(&server, INTERNAL_HOST, "/admin");
    Mock::given(method("GET"))
        .and(path("/go"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", internal.as_str()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (router, dns) = test_router(&server);
    let (status, _, _) = send(
        router,
        get_request(&upstream_url(&server, PUBLIC_HOST, "/go")),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    // One lookup per hop
    assert_eq!(dns.calls(), 2);
}

#[tokio::test]
async fn test_redirects_are_followed_and_reclassified_per_hop() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/one"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/two"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/two"))
        .respond_with(ResponseTemplate::new(308).insert_header("Location", "/three"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/three"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("arrived", "text/plain"))
        .expect(1)
        .mount(&server)
        .await;

    let (router, dns) = test_router(&server);
    let (status, _, body) = send(
        router,
        get_request(&upstream_url(&server, PUBLIC_HOST, "/one")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_ref(), b"arrived");
    assert_eq!(dns.calls(), 3);
}

#[tokio::test]
async fn test_redirect_loop_returns_too_many_redirects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/again"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/again"))
        .expect(5)
        .mount(&server)
        .await;

    let (router, _) = test_router(&server);
    let (status, _, body) = send(
        router,
        get_request(&upstream_url(&server, PUBLIC_HOST, "/again")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Too many redirects");
}

#[tokio::test]
async fn test_upstream_error_status_is_mirrored() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let (router, _) = test_router(&server);
    let (status, headers, body) = send(
        router,
        get_request(&upstream_url(&server, PUBLIC_HOST, "/broken")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(headers["content-type"], "application/json");
    assert_eq!(error_message(&body), "Failed to fetch: Bad Gateway");
}

#[tokio::test]
async fn test_dns_failure_falls_back_to_hostname() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lenient"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("fetched", "text/plain"))
        .expect(1)
        .mount(&server)
        .await;

    let (router, dns) = test_router(&server);
    let (status, _, body) = send(
        router,
        get_request(&upstream_url(&server, UNRESOLVABLE_HOST, "/lenient")),
    )
    .await;

    // Unresolvable names are not blocked; the fetch decides
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_ref(), b"fetched");
    assert_eq!(dns.calls(), 1);
}

#[tokio::test]
async fn test_get_without_url_is_rejected() {
    let server = MockServer::start().await;
    forbid_any_request(&server).await;

    for uri in [ROUTE.to_string(), format!("{}?url=", ROUTE), format!("{}?other=1", ROUTE)] {
        let (router, _) = test_router(&server);
        let request = Request::builder()
            .method("GET")
            .uri(uri.as_str())
            .body(Body::empty())
            .unwrap();
        let (status, _, body) = send(router, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(error_message(&body), "URL parameter is required");
    }
}

#[tokio::test]
async fn test_post_without_url_is_rejected() {
    let server = MockServer::start().await;
    forbid_any_request(&server).await;

    for body in ["{}", "{\"url\":\"\"}", "{\"url\":null}", "{\"target\":\"http://x\"}"] {
        let (router, _) = test_router(&server);
        let (status, _, response) = send(router, post_request(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
        assert_eq!(error_message(&response), "URL is required in request body");
    }
}

#[tokio::test]
async fn test_post_with_invalid_json_is_rejected_before_fetch() {
    let server = MockServer::start().await;
    forbid_any_request(&server).await;

    for body in ["not json", "{\"url\": ", ""] {
        let (router, dns) = test_router(&server);
        let (status, _, response) = send(router, post_request(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{:?}", body);
        assert_eq!(error_message(&response), "Invalid request body");
        assert_eq!(dns.calls(), 0);
    }
}

#[tokio::test]
async fn test_malformed_url_is_generic_failure() {
    let server = MockServer::start().await;
    forbid_any_request(&server).await;

    for target in ["not a url", "ftp://public.test/file", "http://"] {
        let (router, _) = test_router(&server);
        let (status, _, body) = send(router, get_request(target)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{}", target);
        assert_eq!(error_message(&body), "Failed to proxy request");
    }
}

#[tokio::test]
async fn test_preflight_always_succeeds() {
    let server = MockServer::start().await;
    forbid_any_request(&server).await;

    for body in ["", "garbage", "{\"url\":\"http://127.0.0.1/\"}"] {
        let (router, dns) = test_router(&server);
        let request = Request::builder()
            .method("OPTIONS")
            .uri(ROUTE)
            .body(Body::from(body))
            .unwrap();
        let (status, headers, response) = send(router, request).await;

        assert_eq!(status, StatusCode::OK);
        assert!(response.is_empty());
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(
            headers["access-control-allow-methods"],
            "GET, POST, OPTIONS"
        );
        assert_eq!(headers["access-control-allow-headers"], "Content-Type");
        assert_eq!(dns.calls(), 0);
    }
}

#[tokio::test]
async fn test_oversized_upstream_body_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/big"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 2048]))
        .mount(&server)
        .await;

    let (router, _) = test_router_with_limit(&server, 512);
    let (status, _, body) = send(
        router,
        get_request(&upstream_url(&server, PUBLIC_HOST, "/big")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(error_message(&body), "Upstream response too large");
}
