//! Resolver Bridge Module
//!
//! Blocking `getaddrinfo` over the asynchronous resolver. Each sub-query hands
//! the resolver a callback bound to a shared [`ResolutionQuery`]; the caller
//! blocks on the query's semaphore until the callback's terminating call
//! signals it, then issues the next sub-query.
//!
//! Results are appended only before the signal and read only after it.

use crate::config::ResolverConfig;
use crate::rendezvous::Semaphore;
use crate::resolver::{AddrInfo, DnsResolver, QueryType};
use crate::status::DnsStatus;
use adapters_socket::AddressFamily;
use entities_objects::{Obj, ObjError};
use log::{debug, warn};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

struct QueryState {
    results: Vec<AddrInfo>,
    status: DnsStatus,
}

/// Accumulator shared between the caller and the resolver callbacks
pub struct ResolutionQuery {
    state: Mutex<QueryState>,
    done: Semaphore,
}

impl ResolutionQuery {
    fn new() -> Self {
        Self {
            state: Mutex::new(QueryState {
                results: Vec::new(),
                status: DnsStatus::OK,
            }),
            done: Semaphore::new(),
        }
    }

    fn state(&self) -> MutexGuard<'_, QueryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Block until the current sub-query finishes, returning its status
    fn wait(&self) -> DnsStatus {
        self.done.take();
        self.state().status
    }

    fn take_results(&self) -> Vec<AddrInfo> {
        std::mem::take(&mut self.state().results)
    }
}

/// Callback context of one sub-query
///
/// Signals the query exactly once: on the terminating call, or from `Drop`
/// with `FAIL` if the resolver discards the callback without making it.
struct SubQuery {
    query: Arc<ResolutionQuery>,
    port: Obj,
    finished: bool,
}

impl SubQuery {
    fn new(query: Arc<ResolutionQuery>, port: Obj) -> Self {
        Self {
            query,
            port,
            finished: false,
        }
    }

    fn deliver(&mut self, status: DnsStatus, addr: Option<&SocketAddr>) {
        if self.finished {
            warn!("dns callback after completion ignored (status {})", status);
            return;
        }
        match addr {
            Some(addr) => {
                debug!("dns result: {}", addr.ip());
                let info = AddrInfo::from_record(addr, self.port.clone());
                self.query.state().results.push(info);
            }
            None => self.finish(status),
        }
    }

    fn finish(&mut self, status: DnsStatus) {
        debug!("dns status: {}", status);
        self.query.state().status = status.normalized();
        self.finished = true;
        self.query.done.give();
    }
}

impl Drop for SubQuery {
    fn drop(&mut self) {
        if !self.finished {
            warn!("dns callback released without completion");
            self.finish(DnsStatus::FAIL);
        }
    }
}

/// Resolve `host` into a list of address entries
///
/// # Arguments
///
/// * `resolver` - Asynchronous resolver
/// * `config` - Resolver configuration (sub-query timeout)
/// * `host` - Host name or address literal
/// * `port` - Port object, carried unchanged into every address tuple
/// * `family` - Family hint, `None` to try IPv6 then IPv4
///
/// # Returns
///
/// * `Ok(entries)` - Every address delivered, in delivery order. A failed
///   sub-query is ignored when another one produced addresses.
/// * `Err(ObjError::Os)` - Issuing a query failed, or nothing was found and the
///   last sub-query failed (its status is carried)
/// * `Err(ObjError::Type)` - `port` is not an integer
pub fn getaddrinfo(
    resolver: &dyn DnsResolver,
    config: &ResolverConfig,
    host: &str,
    port: &Obj,
    family: Option<AddressFamily>,
) -> Result<Vec<AddrInfo>, ObjError> {
    port.get_int()?;

    let query = Arc::new(ResolutionQuery::new());
    let mut failure = None;

    for &query_type in QueryType::passes(family) {
        let mut sub = SubQuery::new(Arc::clone(&query), port.clone());
        debug!("dns query {:?} for {}", query_type, host);
        resolver.get_addr_info(
            host,
            query_type,
            Box::new(move |status: DnsStatus, addr: Option<&SocketAddr>| {
                sub.deliver(status, addr)
            }),
            config.query_timeout,
        )?;

        // only the last pass decides whether an empty result is an error
        let status = query.wait();
        failure = if status.is_error() { Some(status) } else { None };
    }

    let results = query.take_results();
    match failure {
        Some(status) if results.is_empty() => Err(ObjError::os(status.code())),
        _ => Ok(results),
    }
}
