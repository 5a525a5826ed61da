//! Address classification for SSRF protection.
//!
//! Decides whether a resolved address lies in a range the proxy must never
//! contact. The decision is a pure function of the address: no state, no I/O.
//!
//! Blocked IPv4 ranges (checked on the first two octets):
//! - 10.0.0.0/8 (private)
//! - 127.0.0.0/8 (loopback)
//! - 0.0.0.0/8 (this network)
//! - 172.16.0.0/12 (private)
//! - 192.168.0.0/16 (private)
//! - 169.254.0.0/16 (link-local)
//! - 224.0.0.0 and above (multicast and reserved)
//!
//! IPv6 coverage is limited to the `::1` loopback. Unique-local (`fc00::/7`)
//! and link-local (`fe80::/10`) addresses are currently allowed.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use strum_macros::{Display, EnumIter};

/// The address a hostname resolved to, as seen by the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedAddress {
    /// A concrete IP address (literal, `localhost`, or DNS answer).
    Ip(IpAddr),
    /// DNS lookup failed; the raw hostname stands in for the address.
    Unresolved(String),
}

impl fmt::Display for ResolvedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedAddress::Ip(ip) => write!(f, "{}", ip),
            ResolvedAddress::Unresolved(host) => write!(f, "{} (unresolved)", host),
        }
    }
}

/// Why an address was blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum BlockReason {
    /// 10.0.0.0/8
    Private10,
    /// 127.0.0.0/8
    Loopback,
    /// 0.0.0.0/8
    ThisNetwork,
    /// 172.16.0.0/12
    Private172,
    /// 192.168.0.0/16
    Private192,
    /// 169.254.0.0/16
    LinkLocal,
    /// 224.0.0.0 and above
    MulticastReserved,
    /// ::1
    Ipv6Loopback,
}

/// Outcome of classifying one address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The proxy may contact this address.
    Allowed,
    /// The address is in a blocked range.
    Blocked(BlockReason),
}

impl Classification {
    /// Returns `true` if the address was blocked.
    pub fn is_blocked(&self) -> bool {
        matches!(self, Classification::Blocked(_))
    }
}

/// Classifies a resolved address.
///
/// An [`ResolvedAddress::Unresolved`] hostname is allowed: it is not an IP
/// literal, so none of the range checks can match it.
///
/// # Examples
///
/// ```
/// use fetch_proxy::security::{classify, BlockReason, Classification, ResolvedAddress};
/// use std::net::{IpAddr, Ipv4Addr};
///
/// let private = ResolvedAddress::Ip(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1)));
/// assert_eq!(classify(&private), Classification::Blocked(BlockReason::Private192));
///
/// let public = ResolvedAddress::Ip(IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)));
/// assert_eq!(classify(&public), Classification::Allowed);
/// ```
pub fn classify(address: &ResolvedAddress) -> Classification {
    match address {
        ResolvedAddress::Ip(IpAddr::V4(ip)) => classify_ipv4(*ip),
        ResolvedAddress::Ip(IpAddr::V6(ip)) => classify_ipv6(*ip),
        ResolvedAddress::Unresolved(_) => Classification::Allowed,
    }
}

fn classify_ipv4(ip: Ipv4Addr) -> Classification {
    let [a, b, _, _] = ip.octets();

    let reason = match (a, b) {
        (10, _) => BlockReason::Private10,
        (127, _) => BlockReason::Loopback,
        (0, _) => BlockReason::ThisNetwork,
        (172, 16..=31) => BlockReason::Private172,
        (192, 168) => BlockReason::Private192,
        (169, 254) => BlockReason::LinkLocal,
        (224..=255, _) => BlockReason::MulticastReserved,
        _ => return Classification::Allowed,
    };
    Classification::Blocked(reason)
}

fn classify_ipv6(ip: Ipv6Addr) -> Classification {
    if ip == Ipv6Addr::LOCALHOST {
        Classification::Blocked(BlockReason::Ipv6Loopback)
    } else {
        Classification::Allowed
    }
}
