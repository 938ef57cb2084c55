//! Adapters Layer: Socket Binding
//!
//! Provides the interpreter's `socket` object on top of an RTOS network stack.
//! Script calls are checked and converted here, then forwarded one-to-one to a
//! [`NetStack`] implementation.
//!
//! ## Overview
//!
//! The `adapters_socket` crate provides:
//! - **Socket objects**: [`SocketHandle`] with bind, connect, listen, accept,
//!   send, recv, setblocking, setsockopt, makefile, getsockname and close
//! - **Address codec**: Conversion between `(host, port)` / `(host, port,
//!   flow_info, scope_id)` tuples and native address records
//! - **Stream integration**: Sockets implement [`entities_stream::Stream`], so
//!   `read`, `readinto`, `readline` and `write` are shared with other streams
//! - **Host stack**: [`HostStack`](host::HostStack), a `socket2`-backed
//!   [`NetStack`] for running on a development host
//! - **Offloaded TLS** (`offload` feature): `tlswrap`, and `pdn` with the `pdn`
//!   feature
//!
//! ## Architecture
//!
//! This crate is part of the adapters layer. It depends on:
//! - `entities_objects`: Interpreter values and exceptions
//! - `entities_stream`: The stream protocol and its helpers
//!
//! ## See Also
//!
//! - [`adapters_dns`](../adapters_dns/index.html): Name resolution for `getaddrinfo`
//! - [`api_facades`](../api_facades/index.html): The `socket` module registry

pub mod address;
pub mod config;
#[cfg(unix)]
pub mod host;
pub mod native;
pub mod socket;
pub mod stream;
#[cfg(feature = "offload")]
pub mod tls;

pub use config::{SocketConfig, LISTEN_BACKLOG_DEFAULT};
#[cfg(unix)]
pub use host::HostStack;
pub use native::{
    AddressFamily, NetStack, Protocol, RawDescriptor, SocketOption, SocketType, TlsPeerVerify,
    CLOSED,
};
pub use socket::{SocketHandle, SocketState};
