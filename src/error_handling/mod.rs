//! Error handling.
//!
//! This module provides:
//! - Initialization errors (logger, HTTP client, listener)
//! - The request-level error taxonomy and its HTTP rendering
//!
//! Classification and redirect-bound failures are detected up front and
//! returned as structured errors. Unexpected faults convert into
//! `ProxyFailure` through `From`, so `?` inside the pipeline never lets one
//! escape to the transport layer.

mod response;
mod types;

// Re-export public API
pub use response::ErrorBody;
pub use types::{ErrorKind, InitializationError, ProxyError};
