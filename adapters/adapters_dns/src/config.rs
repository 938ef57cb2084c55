//! Resolver Configuration Module

use adapters_socket::AddressFamily;
use std::time::Duration;

/// Native timeout of each sub-query
pub const DNS_QUERY_TIMEOUT: Duration = Duration::from_millis(3000);

/// Resolver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Timeout handed to the resolver with every sub-query
    pub query_timeout: Duration,
    /// Family hint used when `getaddrinfo` is called without one.
    /// `None` tries IPv6, then IPv4.
    pub default_family: Option<AddressFamily>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            query_timeout: DNS_QUERY_TIMEOUT,
            default_family: Some(AddressFamily::Ipv4),
        }
    }
}
