//! DNS resolver initialization.

use std::sync::Arc;

use crate::security::{HostResolver, SystemDns};

/// Builds the [`HostResolver`] used to classify each hop.
///
/// Backed by the system resolver, the same one the outbound client's
/// [`GuardedResolver`](crate::security::GuardedResolver) connects through.
pub fn init_host_resolver() -> HostResolver {
    HostResolver::new(Arc::new(SystemDns))
}
