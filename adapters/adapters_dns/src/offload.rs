//! Offloaded Resolution Module
//!
//! On offload builds the co-processor resolves names synchronously and
//! returns the whole result list at once; no callback or semaphore is involved.

use crate::resolver::AddrInfo;
use crate::status::DnsStatus;
use adapters_socket::{address, AddressFamily, Protocol, SocketType};
use entities_objects::{Obj, ObjError};
use log::debug;
use std::net::SocketAddr;

/// Entry of the native result list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeAddrInfo {
    pub addr: SocketAddr,
    pub socket_type: SocketType,
    pub protocol: Protocol,
}

/// Synchronous resolver of the offloaded stack
#[cfg_attr(test, mockall::automock)]
pub trait SyncResolver: Send + Sync {
    /// Resolve `host`, restricted to `family` when given
    fn get_addr_info(
        &self,
        host: &str,
        family: Option<AddressFamily>,
    ) -> Result<Vec<NativeAddrInfo>, DnsStatus>;
}

/// Resolve `host` into a list of address entries
///
/// The family hint is passed to the native call as is; socket type and
/// protocol come from each native entry.
pub fn getaddrinfo(
    resolver: &dyn SyncResolver,
    host: &str,
    port: &Obj,
    family: Option<AddressFamily>,
) -> Result<Vec<AddrInfo>, ObjError> {
    port.get_int()?;

    let entries = resolver
        .get_addr_info(host, family)
        .map_err(|status| ObjError::os(status.code()))?;
    debug!("offloaded getaddrinfo({}) = {} entries", host, entries.len());

    Ok(entries
        .iter()
        .map(|entry| AddrInfo {
            family: AddressFamily::of(&entry.addr),
            socket_type: entry.socket_type,
            protocol: entry.protocol,
            canonname: String::new(),
            sockaddr: address::decode(&entry.addr, port.clone()),
        })
        .collect())
}
