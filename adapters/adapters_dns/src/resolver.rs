//! Resolver Module
//!
//! The asynchronous resolver interface consumed by `getaddrinfo`, and the
//! address records it produces.

use crate::status::DnsStatus;
use adapters_socket::{address, AddressFamily, Protocol, SocketType};
use entities_objects::{Errno, Obj};
use std::net::SocketAddr;
use std::time::Duration;

/// DNS record type of a sub-query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    /// IPv4 address record
    A,
    /// IPv6 address record
    Aaaa,
}

impl QueryType {
    pub fn family(self) -> AddressFamily {
        match self {
            QueryType::A => AddressFamily::Ipv4,
            QueryType::Aaaa => AddressFamily::Ipv6,
        }
    }

    /// Sub-queries issued for a family hint, in order
    ///
    /// No hint tries IPv6 first, then IPv4. Any hint other than IPv6 asks for A records.
    pub fn passes(hint: Option<AddressFamily>) -> &'static [QueryType] {
        match hint {
            None => &[QueryType::Aaaa, QueryType::A],
            Some(AddressFamily::Ipv6) => &[QueryType::Aaaa],
            Some(_) => &[QueryType::A],
        }
    }
}

/// Family hint for an interpreter family code; `0` means any family
pub fn family_hint(code: i64) -> Option<AddressFamily> {
    match code {
        0 => None,
        code => Some(AddressFamily::from_code(code).unwrap_or(AddressFamily::Ipv4)),
    }
}

/// Resolver callback
///
/// Called once per address with `Some(addr)`, then once with `None` and the
/// final status. Runs on the resolver's thread.
pub type DnsCallback = Box<dyn FnMut(DnsStatus, Option<&SocketAddr>) + Send>;

/// Asynchronous DNS resolver
#[cfg_attr(test, mockall::automock)]
pub trait DnsResolver: Send + Sync {
    /// Start a query and return without waiting for it
    ///
    /// On success the resolver owns `callback` and must eventually make the
    /// terminating call, at the latest when `timeout` expires. On error the
    /// callback is dropped without being called.
    fn get_addr_info(
        &self,
        host: &str,
        query: QueryType,
        callback: DnsCallback,
        timeout: Duration,
    ) -> Result<(), Errno>;
}

/// One `getaddrinfo` result entry
#[derive(Debug, Clone, PartialEq)]
pub struct AddrInfo {
    pub family: AddressFamily,
    pub socket_type: SocketType,
    pub protocol: Protocol,
    pub canonname: String,
    /// Address tuple carrying the caller's port object
    pub sockaddr: Obj,
}

impl AddrInfo {
    /// Entry for an address delivered by the resolver
    ///
    /// The resolver reports neither socket type nor protocol, so every entry is
    /// stream/TCP.
    pub fn from_record(addr: &SocketAddr, port: Obj) -> Self {
        Self {
            family: AddressFamily::of(addr),
            socket_type: SocketType::Stream,
            protocol: Protocol::Tcp,
            canonname: String::new(),
            sockaddr: address::decode(addr, port),
        }
    }

    /// `(family, type, proto, canonname, sockaddr)`
    pub fn to_obj(&self) -> Obj {
        Obj::tuple(vec![
            Obj::Int(self.family.code() as i64),
            Obj::Int(self.socket_type.code() as i64),
            Obj::Int(self.protocol.code() as i64),
            Obj::Str(self.canonname.clone()),
            self.sockaddr.clone(),
        ])
    }
}
