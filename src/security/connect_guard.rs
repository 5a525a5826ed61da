//! Connect-time address guard for the outbound client.
//!
//! Implements `reqwest::dns::Resolve` over the system resolver and drops every
//! address the classifier blocks. Hop classification happens before each
//! request; this second check covers the lookup reqwest makes when it
//! actually connects, so a name that answers differently the second time
//! (DNS rebinding, or a fallback hostname the classifier could not resolve)
//! still never reaches a blocked address.

use std::io;
use std::net::SocketAddr;

use reqwest::dns::{Addrs, Name, Resolve, Resolving};

use super::classifier::{classify, Classification, ResolvedAddress};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// System resolver that only hands allowed addresses to the connector.
///
/// Fails the connection when every address for a name is blocked.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuardedResolver;

impl Resolve for GuardedResolver {
    fn resolve(&self, name: Name) -> Resolving {
        Box::pin(async move {
            let host = name.as_str().to_string();
            let addrs: Vec<SocketAddr> = tokio::net::lookup_host((host.as_str(), 0))
                .await
                .map_err(|e| -> BoxError { Box::new(e) })?
                .collect();

            let allowed = allowed_addrs(&host, addrs);
            if allowed.is_empty() {
                return Err(Box::new(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    format!("all resolved addresses for '{}' are blocked", host),
                )) as BoxError);
            }

            let addrs: Addrs = Box::new(allowed.into_iter());
            Ok(addrs)
        })
    }
}

/// Keeps the addresses the classifier allows.
fn allowed_addrs(host: &str, addrs: Vec<SocketAddr>) -> Vec<SocketAddr> {
    addrs
        .into_iter()
        .filter(|addr| match classify(&ResolvedAddress::Ip(addr.ip())) {
            Classification::Allowed => true,
            Classification::Blocked(reason) => {
                log::warn!(
                    "Refusing connection to {} for {} (reason: {})",
                    addr.ip(),
                    host,
                    reason
                );
                false
            }
        })
        .collect()
}
