//! Outbound fetching.
//!
//! Drives a caller-supplied URL through resolution, classification and the
//! manual redirect walk, producing a [`ProxyOutcome`].

mod redirects;
mod types;

pub use redirects::fetch_with_redirects;
pub use types::{ProxyOutcome, UpstreamContent};
