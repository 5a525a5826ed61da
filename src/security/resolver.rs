//! Hostname resolution for classification.
//!
//! Turns the host of a proxied URL into exactly one address for the
//! classifier. Literals and `localhost` are answered without touching DNS;
//! everything else costs a single lookup, with no retries.
//!
//! Production lookups go through [`SystemDns`], the same system resolver
//! (`getaddrinfo`, `/etc/hosts`, `resolv.conf`) the outbound client connects
//! with. Names that only internal DNS knows are therefore classified by their
//! internal address.

use std::future::Future;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use super::classifier::ResolvedAddress;
use crate::config::DNS_TIMEOUT_SECS;

/// Future returned by [`DnsLookup::lookup`].
pub type LookupFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Option<IpAddr>, anyhow::Error>> + Send + 'a>>;

/// A forward DNS lookup returning the first address for a name.
///
/// `Ok(None)` means the name exists but has no address records.
pub trait DnsLookup: Send + Sync {
    /// Looks up `host`.
    fn lookup<'a>(&'a self, host: &'a str) -> LookupFuture<'a>;
}

/// Looks names up through the operating system resolver.
///
/// Wraps `tokio::net::lookup_host` with a [`DNS_TIMEOUT_SECS`] deadline.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemDns;

impl DnsLookup for SystemDns {
    fn lookup<'a>(&'a self, host: &'a str) -> LookupFuture<'a> {
        Box::pin(async move {
            let lookup = tokio::net::lookup_host((host, 0));
            let mut addrs = tokio::time::timeout(Duration::from_secs(DNS_TIMEOUT_SECS), lookup)
                .await
                .map_err(|_| anyhow::anyhow!("DNS lookup for {} timed out", host))??;
            Ok(addrs.next().map(|addr| addr.ip()))
        })
    }
}

/// Resolves hostnames to the address used for classification.
#[derive(Clone)]
pub struct HostResolver {
    dns: Arc<dyn DnsLookup>,
}

impl HostResolver {
    /// Creates a resolver backed by the given DNS lookup.
    pub fn new(dns: Arc<dyn DnsLookup>) -> Self {
        Self { dns }
    }

    /// Resolves `hostname` to a single address.
    ///
    /// - `localhost` maps to `127.0.0.1` without a lookup
    /// - IPv4 literals and the `::1` literal are returned as-is
    /// - anything else is looked up once; on failure the raw hostname is
    ///   returned as [`ResolvedAddress::Unresolved`]
    ///
    /// The fallback keeps unresolvable names from being blocked outright. The
    /// fetch that follows will almost always fail for them anyway.
    pub async fn resolve(&self, hostname: &str) -> ResolvedAddress {
        // url::Url renders IPv6 hosts in brackets
        let host = hostname
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(hostname);

        if host.eq_ignore_ascii_case("localhost") {
            return ResolvedAddress::Ip(IpAddr::V4(Ipv4Addr::LOCALHOST));
        }
        if let Ok(ip) = host.parse::<Ipv4Addr>() {
            return ResolvedAddress::Ip(IpAddr::V4(ip));
        }
        if host == "::1" {
            return ResolvedAddress::Ip(IpAddr::V6(Ipv6Addr::LOCALHOST));
        }

        match self.dns.lookup(host).await {
            Ok(Some(ip)) => {
                log::debug!("Resolved {} to {}", host, ip);
                ResolvedAddress::Ip(ip)
            }
            Ok(None) => {
                log::warn!("DNS lookup for {} returned no addresses, using hostname", host);
                ResolvedAddress::Unresolved(host.to_string())
            }
            Err(e) => {
                log::warn!("DNS lookup for {} failed, using hostname: {}", host, e);
                ResolvedAddress::Unresolved(host.to_string())
            }
        }
    }
}

impl std::fmt::Debug for HostResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostResolver").finish_non_exhaustive()
    }
}
