//! Error type definitions.
//!
//! This module defines the initialization errors and the request-level error
//! taxonomy returned to proxy callers.

use axum::http::StatusCode;
use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::{EnumIter as EnumIterMacro, IntoStaticStr};
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// Error binding the listening socket.
    #[error("Failed to bind {address}: {source}")]
    BindError {
        /// The address that could not be bound
        address: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Categories of proxy failures.
///
/// Every [`ProxyError`] maps to exactly one kind; the kind decides the default
/// HTTP status shown to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro, IntoStaticStr)]
pub enum ErrorKind {
    /// The request did not carry a target URL.
    MissingParameter,
    /// The POST body was not valid JSON.
    InvalidBody,
    /// The redirect chain needed more requests than allowed.
    TooManyRedirects,
    /// A hop resolved to a blocked address.
    PrivateAddressBlocked,
    /// The upstream answered with a non-success status.
    UpstreamFailure,
    /// The upstream body was larger than the relay limit.
    BodyTooLarge,
    /// Catch-all for unexpected faults (bad URL, transport errors).
    ProxyFailure,
}

/// A proxy request failure, rendered to the caller as `{"error": "<message>"}`.
///
/// The `Display` text of each variant is exactly the message the caller sees,
/// so internal details (the source of a `ProxyFailure`, the blocked host) stay
/// in the server log.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// The target URL was absent or empty.
    #[error("{0}")]
    MissingParameter(&'static str),

    /// The POST body could not be parsed as JSON.
    #[error("Invalid request body")]
    InvalidBody(#[source] serde_json::Error),

    /// The redirect bound was reached.
    #[error("Too many redirects")]
    TooManyRedirects,

    /// A hop's host resolved into a blocked range.
    #[error("Access to private/internal addresses not allowed")]
    PrivateAddressBlocked {
        /// Host of the blocked hop
        host: String,
        /// Reason code from the classifier
        reason: crate::security::BlockReason,
    },

    /// The upstream returned a non-success status that was not followed.
    #[error("Failed to fetch: {status_text}")]
    UpstreamFailure {
        /// Upstream status, mirrored to the caller
        status: StatusCode,
        /// Upstream reason phrase
        status_text: String,
    },

    /// The upstream body exceeded the configured relay limit.
    #[error("Upstream response too large")]
    BodyTooLarge {
        /// Limit that was exceeded, in bytes
        limit: usize,
    },

    /// Anything unexpected: malformed URLs, transport errors, body read errors.
    #[error("Failed to proxy request")]
    ProxyFailure(#[source] anyhow::Error),
}

impl ProxyError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProxyError::MissingParameter(_) => ErrorKind::MissingParameter,
            ProxyError::InvalidBody(_) => ErrorKind::InvalidBody,
            ProxyError::TooManyRedirects => ErrorKind::TooManyRedirects,
            ProxyError::PrivateAddressBlocked { .. } => ErrorKind::PrivateAddressBlocked,
            ProxyError::UpstreamFailure { .. } => ErrorKind::UpstreamFailure,
            ProxyError::BodyTooLarge { .. } => ErrorKind::BodyTooLarge,
            ProxyError::ProxyFailure(_) => ErrorKind::ProxyFailure,
        }
    }

    /// Returns the HTTP status sent to the caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::MissingParameter(_)
            | ProxyError::InvalidBody(_)
            | ProxyError::TooManyRedirects => StatusCode::BAD_REQUEST,
            ProxyError::PrivateAddressBlocked { .. } => StatusCode::FORBIDDEN,
            ProxyError::UpstreamFailure { status, .. } => *status,
            ProxyError::BodyTooLarge { .. } => StatusCode::BAD_GATEWAY,
            ProxyError::ProxyFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Wraps an unexpected fault as a `ProxyFailure`.
    pub fn failure(err: impl Into<anyhow::Error>) -> Self {
        ProxyError::ProxyFailure(err.into())
    }
}

impl From<ReqwestError> for ProxyError {
    fn from(err: ReqwestError) -> Self {
        ProxyError::failure(err)
    }
}

impl From<url::ParseError> for ProxyError {
    fn from(err: url::ParseError) -> Self {
        ProxyError::failure(err)
    }
}
