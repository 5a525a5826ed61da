//! HTTP rendering of proxy errors.

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use super::types::ProxyError;

/// JSON body for every error response: `{"error": "<message>"}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Caller-facing message
    pub error: String,
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        match &self {
            ProxyError::ProxyFailure(source) => log::error!("Proxy request failed: {:#}", source),
            other => log::debug!(
                "Proxy request rejected ({}): {}",
                <&str>::from(other.kind()),
                other
            ),
        }

        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
