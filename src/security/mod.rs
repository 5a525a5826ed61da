//! SSRF protection.
//!
//! This module decides whether the proxy may contact a host:
//! - `resolver`: hostname -> one address (literal, `localhost`, or DNS)
//! - `classifier`: address -> allowed / blocked with a reason
//! - `connect_guard`: the outbound client's resolver, re-applying the
//!   classifier to the addresses it is about to connect to
//!
//! The first two run once per redirect hop, before any request to that hop is
//! sent.

mod classifier;
mod connect_guard;
mod resolver;

pub use classifier::{classify, BlockReason, Classification, ResolvedAddress};
pub use connect_guard::GuardedResolver;
pub use resolver::{DnsLookup, HostResolver, LookupFuture, SystemDns};
