//! Proxy endpoint handlers.

use axum::body::Bytes;
use axum::extract::{RawQuery, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_TYPE,
};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use super::types::ProxyState;
use crate::config::{
    CORS_ALLOW_HEADERS, CORS_ALLOW_METHODS, CORS_ALLOW_ORIGIN, CORS_PREFLIGHT_ALLOW_METHODS,
};
use crate::error_handling::ProxyError;
use crate::fetch::{fetch_with_redirects, UpstreamContent};

const MISSING_QUERY_URL: &str = "URL parameter is required";
const MISSING_BODY_URL: &str = "URL is required in request body";

/// `GET ?url=<target>`
pub async fn proxy_get(State(state): State<ProxyState>, RawQuery(query): RawQuery) -> Response {
    match query.as_deref().and_then(query_target) {
        Some(target) => relay(&state, &target).await,
        None => ProxyError::MissingParameter(MISSING_QUERY_URL).into_response(),
    }
}

/// `POST {"url": "<target>"}`
pub async fn proxy_post(State(state): State<ProxyState>, body: Bytes) -> Response {
    let value: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => return ProxyError::InvalidBody(e).into_response(),
    };

    match body_target(&value) {
        Some(target) => relay(&state, target).await,
        None => ProxyError::MissingParameter(MISSING_BODY_URL).into_response(),
    }
}

/// `OPTIONS` preflight. Proxies nothing, so it never classifies anything.
pub async fn preflight() -> Response {
    (
        StatusCode::OK,
        [
            (ACCESS_CONTROL_ALLOW_ORIGIN, CORS_ALLOW_ORIGIN),
            (ACCESS_CONTROL_ALLOW_METHODS, CORS_PREFLIGHT_ALLOW_METHODS),
            (ACCESS_CONTROL_ALLOW_HEADERS, CORS_ALLOW_HEADERS),
        ],
    )
        .into_response()
}

/// First non-empty `url` parameter of a raw query string.
fn query_target(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "url")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Non-empty string `url` key of a JSON body.
fn body_target(value: &Value) -> Option<&str> {
    value
        .get("url")
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
}

async fn relay(state: &ProxyState, target: &str) -> Response {
    log::debug!("Proxying {}", target);
    let outcome =
        fetch_with_redirects(target, &state.client, &state.resolver, state.max_body_bytes).await;
    match outcome {
        Ok(content) => content_response(content),
        Err(e) => e.into_response(),
    }
}

fn content_response(content: UpstreamContent) -> Response {
    (
        StatusCode::OK,
        [(CONTENT_TYPE, content.content_type)],
        [
            (ACCESS_CONTROL_ALLOW_ORIGIN, CORS_ALLOW_ORIGIN),
            (ACCESS_CONTROL_ALLOW_METHODS, CORS_ALLOW_METHODS),
            (ACCESS_CONTROL_ALLOW_HEADERS, CORS_ALLOW_HEADERS),
        ],
        content.body,
    )
        .into_response()
}
