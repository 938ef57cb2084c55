//! Entities Layer: Byte Streams
//!
//! Provides the interpreter's generic byte-stream contract and the helpers that
//! consume it. Any object implementing [`Stream`] (a socket, a UART, a file) gets
//! `read`, `readinto`, `readline`, `write` and `close` behavior for free.
//!
//! ## Modules
//!
//! - **[`protocol`](protocol/index.html)**: The [`Stream`] trait, the three
//!   operations a stream object registers (`read`, `write`, `ioctl`), and
//!   [`StreamRequest`].
//! - **[`helpers`](helpers/index.html)**: Generic stream methods built on the
//!   protocol, returning interpreter objects.
//!
//! ## See Also
//!
//! - [`entities_objects`](../entities_objects/index.html): Objects and errors
//!   returned by the helpers

pub mod helpers;
pub mod protocol;

pub use helpers::{stream_close, stream_read, stream_readinto, stream_unbuffered_readline, stream_write};
pub use protocol::{Stream, StreamRequest};
