//! API Facades Layer
//!
//! Provides the `socket` module as the interpreter registers it. Entry points
//! take raw positional argument slices, check counts and types, and call into
//! the adapters layer.
//!
//! ## Architecture
//!
//! The facade is the outermost layer. It depends on:
//! - `adapters_socket`: Socket objects and the network stack interface
//! - `adapters_dns`: `getaddrinfo` over the configured resolver
//! - `entities_objects`: Interpreter values and exceptions

pub mod socket_module;

pub use socket_module::{Global, ModuleResolver, SocketModule};
