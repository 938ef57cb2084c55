//! Adapters Layer: Name Resolution
//!
//! Provides `getaddrinfo` for the socket binding. The RTOS resolver is
//! asynchronous: it reports each address through a callback running on the
//! network stack's own thread. This crate turns that into a blocking call that
//! returns the complete, ordered result list.
//!
//! ## Overview
//!
//! - **[`bridge`](bridge/index.html)**: Callback-driven `getaddrinfo` with one
//!   semaphore-gated sub-query per address family
//! - **[`offload`](offload/index.html)** (`offload` feature): Synchronous
//!   `getaddrinfo` served by an offloaded stack; replaces the bridge
//! - **[`resolver`](resolver/index.html)**: The [`DnsResolver`] trait, its
//!   callback type and the [`AddrInfo`] entries
//! - **[`host`](host/index.html)**: Resolvers over the host's name service
//! - **[`rendezvous`](rendezvous/index.html)**: Counting semaphore
//! - **[`status`](status/index.html)**: Resolver status codes
//!
//! ## Architecture
//!
//! This crate is part of the adapters layer. It depends on:
//! - `entities_objects`: Interpreter values and exceptions
//! - `adapters_socket`: Address families and the address codec

#[cfg(not(feature = "offload"))]
pub mod bridge;
pub mod config;
pub mod host;
#[cfg(feature = "offload")]
pub mod offload;
pub mod rendezvous;
pub mod resolver;
pub mod status;

#[cfg(not(feature = "offload"))]
pub use bridge::getaddrinfo;
pub use config::{ResolverConfig, DNS_QUERY_TIMEOUT};
pub use host::HostResolver;
#[cfg(feature = "offload")]
pub use host::HostSyncResolver;
#[cfg(feature = "offload")]
pub use offload::{getaddrinfo, NativeAddrInfo, SyncResolver};
pub use resolver::{family_hint, AddrInfo, DnsCallback, DnsResolver, QueryType};
pub use status::DnsStatus;
