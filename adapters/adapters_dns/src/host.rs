//! Host Resolver Module
//!
//! Resolvers backed by the host's name service, for running the binding on a
//! development machine.
//!
//! [`HostResolver`] reproduces the asynchronous contract: queries are queued to
//! a dedicated `dns_resolve` thread, which runs each lookup and makes the
//! callbacks. A lookup outliving its timeout completes with `CANCELED`.

use crate::resolver::{DnsCallback, DnsResolver, QueryType};
use crate::status::DnsStatus;
use adapters_socket::AddressFamily;
use entities_objects::Errno;
use log::{debug, warn};
use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Mutex;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Blocking lookup of every address of `host`, in system order
fn lookup(host: &str) -> io::Result<Vec<SocketAddr>> {
    Ok((host, 0u16).to_socket_addrs()?.collect())
}

/// Addresses of `family`, without duplicates
fn filter_family(addrs: Vec<SocketAddr>, family: Option<AddressFamily>) -> Vec<SocketAddr> {
    let mut filtered: Vec<SocketAddr> = Vec::new();
    for addr in addrs {
        if family.map_or(true, |f| AddressFamily::of(&addr) == f) && !filtered.contains(&addr) {
            filtered.push(addr);
        }
    }
    filtered
}

struct Job {
    host: String,
    query: QueryType,
    callback: DnsCallback,
    timeout: Duration,
}

/// Asynchronous resolver over the host's name service
pub struct HostResolver {
    jobs: Mutex<Option<mpsc::Sender<Job>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl HostResolver {
    /// Start the resolver thread
    pub fn new() -> Result<Self, Errno> {
        let (jobs, queue) = mpsc::channel::<Job>();
        let worker = thread::Builder::new()
            .name("dns_resolve".to_string())
            .spawn(move || {
                for job in queue {
                    Self::run(job);
                }
                debug!("dns_resolve thread exiting");
            })
            .map_err(|e| Errno(e.raw_os_error().unwrap_or(Errno::EIO.0)))?;

        Ok(Self {
            jobs: Mutex::new(Some(jobs)),
            worker: Mutex::new(Some(worker)),
        })
    }

    fn run(mut job: Job) {
        let (done, result) = mpsc::channel();
        let host = job.host.clone();
        // the name service call cannot be interrupted; a timed out lookup finishes detached
        let spawned = thread::Builder::new()
            .name("dns_lookup".to_string())
            .spawn(move || {
                let _ = done.send(lookup(&host));
            });
        if let Err(e) = spawned {
            warn!("dns lookup thread failed to start: {}", e);
            (job.callback)(DnsStatus::SYSTEM, None);
            return;
        }

        let status = match result.recv_timeout(job.timeout) {
            Ok(Ok(addrs)) => {
                let addrs = filter_family(addrs, Some(job.query.family()));
                for addr in &addrs {
                    (job.callback)(DnsStatus::OK, Some(addr));
                }
                if addrs.is_empty() {
                    DnsStatus::NO_DATA
                } else {
                    DnsStatus::ALL_DONE
                }
            }
            Ok(Err(e)) => {
                debug!("dns lookup of {} failed: {}", job.host, e);
                DnsStatus::NO_NAME
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!("dns lookup of {} timed out after {:?}", job.host, job.timeout);
                DnsStatus::CANCELED
            }
            Err(RecvTimeoutError::Disconnected) => DnsStatus::SYSTEM,
        };
        (job.callback)(status, None);
    }
}

impl DnsResolver for HostResolver {
    fn get_addr_info(
        &self,
        host: &str,
        query: QueryType,
        callback: DnsCallback,
        timeout: Duration,
    ) -> Result<(), Errno> {
        if host.is_empty() {
            return Err(Errno::EINVAL);
        }
        let jobs = self.jobs.lock().unwrap_or_else(|e| e.into_inner());
        let sender = jobs.as_ref().ok_or(Errno::EIO)?;
        sender
            .send(Job {
                host: host.to_string(),
                query,
                callback,
                timeout,
            })
            .map_err(|_| Errno::EIO)
    }
}

impl Drop for HostResolver {
    fn drop(&mut self) {
        // closing the queue ends the worker loop
        self.jobs.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(worker) = self.worker.lock().unwrap_or_else(|e| e.into_inner()).take() {
            if worker.join().is_err() {
                warn!("dns_resolve thread panicked");
            }
        }
    }
}

#[cfg(feature = "offload")]
pub use sync::HostSyncResolver;

#[cfg(feature = "offload")]
mod sync {
    use super::{filter_family, lookup};
    use crate::offload::{NativeAddrInfo, SyncResolver};
    use crate::status::DnsStatus;
    use adapters_socket::{AddressFamily, Protocol, SocketType};

    /// Synchronous resolver over the host's name service
    #[derive(Debug, Default)]
    pub struct HostSyncResolver;

    impl SyncResolver for HostSyncResolver {
        fn get_addr_info(
            &self,
            host: &str,
            family: Option<AddressFamily>,
        ) -> Result<Vec<NativeAddrInfo>, DnsStatus> {
            let addrs = lookup(host).map_err(|_| DnsStatus::NO_NAME)?;
            let addrs = filter_family(addrs, family);
            if addrs.is_empty() {
                return Err(DnsStatus::NO_DATA);
            }
            Ok(addrs
                .into_iter()
                .map(|addr| NativeAddrInfo {
                    addr,
                    socket_type: SocketType::Stream,
                    protocol: Protocol::Tcp,
                })
                .collect())
        }
    }
}
