//! Socket Module
//!
//! Provides the socket object exposed to scripts. A [`SocketHandle`] owns one
//! native descriptor; every operation first checks that the descriptor is still
//! open and fails with `EBADF` otherwise, without reaching the network stack.

use crate::address;
use crate::config::SocketConfig;
use crate::native::{
    AddressFamily, NetStack, Protocol, RawDescriptor, SocketType, CLOSED, O_NONBLOCK,
};
use entities_objects::{Errno, Obj, ObjError};
use entities_stream::{stream_close, Stream};
use log::{debug, warn};
use std::fmt;
use std::sync::Arc;

/// Lifecycle tag of a socket
///
/// Informational only: no operation is refused because of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketState {
    New,
    Connecting,
    Connected,
    PeerClosed,
}

/// Socket object
pub struct SocketHandle {
    pub(crate) stack: Arc<dyn NetStack>,
    pub(crate) descriptor: RawDescriptor,
    pub(crate) family: AddressFamily,
    pub(crate) state: SocketState,
    pub(crate) config: SocketConfig,
}

impl SocketHandle {
    /// Create a new socket
    ///
    /// # Arguments
    ///
    /// * `stack` - Network stack that owns the descriptor
    /// * `family` - Address family
    /// * `socket_type` - Socket type
    /// * `protocol` - Protocol, or `None` for TCP on stream sockets and UDP otherwise
    /// * `config` - Socket configuration
    ///
    /// # Returns
    ///
    /// * `Ok(SocketHandle)` - Socket in state `New`
    /// * `Err(ObjError::Os)` - The stack refused to allocate a socket
    pub fn new(
        stack: Arc<dyn NetStack>,
        family: AddressFamily,
        socket_type: SocketType,
        protocol: Option<Protocol>,
        config: SocketConfig,
    ) -> Result<Self, ObjError> {
        let protocol = protocol.unwrap_or_else(|| Protocol::auto_for(socket_type));
        let descriptor = stack.socket(family, socket_type, protocol)?;
        debug!(
            "socket {} created: family={:?} type={:?} protocol={:?}",
            descriptor, family, socket_type, protocol
        );

        Ok(Self {
            stack,
            descriptor,
            family,
            state: SocketState::New,
            config,
        })
    }

    pub(crate) fn check_closed(&self) -> Result<(), ObjError> {
        if self.descriptor == CLOSED {
            return Err(ObjError::os(Errno::EBADF));
        }
        Ok(())
    }

    /// Bind to an address tuple
    pub fn bind(&mut self, addr: &Obj) -> Result<(), ObjError> {
        self.check_closed()?;
        let sockaddr = address::encode(self.family, addr)?;
        self.stack.bind(self.descriptor, &sockaddr)?;
        Ok(())
    }

    /// Connect to an address tuple
    ///
    /// A failed connect leaves the descriptor open and usable.
    pub fn connect(&mut self, addr: &Obj) -> Result<(), ObjError> {
        self.check_closed()?;
        let sockaddr = address::encode(self.family, addr)?;

        self.state = SocketState::Connecting;
        match self.stack.connect(self.descriptor, &sockaddr) {
            Ok(()) => {
                self.state = SocketState::Connected;
                Ok(())
            }
            Err(e) => {
                self.state = SocketState::New;
                Err(e.into())
            }
        }
    }

    /// Listen for connections
    ///
    /// Negative backlogs are clamped to 0; `None` uses the configured default.
    pub fn listen(&mut self, backlog: Option<i64>) -> Result<(), ObjError> {
        self.check_closed()?;
        let backlog = match backlog {
            Some(b) => b.clamp(0, i32::MAX as i64) as i32,
            None => self.config.listen_backlog,
        };
        self.stack.listen(self.descriptor, backlog)?;
        Ok(())
    }

    /// Accept a connection
    ///
    /// Blocks until a peer connects. The peer address is not decoded: the second
    /// element is always `Obj::None`.
    pub fn accept(&mut self) -> Result<(SocketHandle, Obj), ObjError> {
        self.check_closed()?;
        let (descriptor, _peer) = self.stack.accept(self.descriptor)?;
        debug!("socket {} accepted connection {}", self.descriptor, descriptor);

        let client = SocketHandle {
            stack: Arc::clone(&self.stack),
            descriptor,
            family: self.family,
            state: SocketState::Connected,
            config: self.config,
        };
        Ok((client, Obj::None))
    }

    /// Send a bytes-like object, returning how many bytes the stack took
    pub fn send(&mut self, data: &Obj) -> Result<usize, ObjError> {
        let buf = data.get_buffer()?;
        Ok(Stream::write(self, buf)?)
    }

    /// Receive at most `max_len` bytes
    ///
    /// Returns empty bytes once the peer has closed the connection.
    /// A size the allocator cannot satisfy is `ENOMEM`.
    pub fn recv(&mut self, max_len: i64) -> Result<Vec<u8>, ObjError> {
        self.check_closed()?;
        if max_len < 0 {
            return Err(ObjError::value_error("negative buffer size"));
        }
        let max_len = usize::try_from(max_len).map_err(|_| ObjError::os(Errno::ENOMEM))?;
        let mut buf = Vec::new();
        buf.try_reserve_exact(max_len.saturating_add(1))
            .map_err(|_| ObjError::os(Errno::ENOMEM))?;
        buf.resize(max_len, 0);

        let len = Stream::read(self, &mut buf)?;
        if len == 0 {
            // an empty read into an empty buffer says nothing about the peer
            if max_len > 0 {
                self.state = SocketState::PeerClosed;
            }
            return Ok(Vec::new());
        }

        buf.truncate(len);
        Ok(buf)
    }

    /// Switch between blocking and non-blocking mode
    ///
    /// Any object is accepted as the flag and tested for truth.
    pub fn setblocking(&mut self, flag: &Obj) -> Result<(), ObjError> {
        self.check_closed()?;
        let blocking = flag.is_true();
        let flags = self.stack.get_flags(self.descriptor)?;
        let flags = if blocking {
            flags & !O_NONBLOCK
        } else {
            flags | O_NONBLOCK
        };
        self.stack.set_flags(self.descriptor, flags)?;
        Ok(())
    }

    /// Accepted for compatibility; options are not applied
    pub fn setsockopt(&mut self, level: &Obj, option: &Obj, _value: &Obj) -> Result<(), ObjError> {
        warn!(
            "setsockopt() not implemented (level={:?}, option={:?})",
            level, option
        );
        Ok(())
    }

    /// File object for the socket: the socket itself
    pub fn makefile(&mut self) -> &mut Self {
        self
    }

    /// Local address tuple, port included
    pub fn getsockname(&self) -> Result<Obj, ObjError> {
        self.check_closed()?;
        let local = self.stack.local_addr(self.descriptor)?;
        Ok(address::decode(&local, Obj::Int(local.port() as i64)))
    }

    /// Close the socket
    ///
    /// Closing an already closed socket does nothing. If the stack fails to
    /// close the descriptor the socket stays open.
    pub fn close(&mut self) -> Result<(), ObjError> {
        stream_close(self)
    }

    /// Native descriptor, or [`CLOSED`]
    pub fn descriptor(&self) -> RawDescriptor {
        self.descriptor
    }

    pub fn is_closed(&self) -> bool {
        self.descriptor == CLOSED
    }

    pub fn family(&self) -> AddressFamily {
        self.family
    }

    pub fn state(&self) -> SocketState {
        self.state
    }
}

impl Drop for SocketHandle {
    fn drop(&mut self) {
        if self.descriptor != CLOSED {
            if let Err(e) = self.stack.close(self.descriptor) {
                warn!("socket {} close on finalize failed: {}", self.descriptor, e);
            }
            self.descriptor = CLOSED;
        }
    }
}

impl fmt::Display for SocketHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descriptor == CLOSED {
            write!(f, "<socket NULL>")
        } else {
            write!(f, "<socket {} family={}>", self.descriptor, self.family.code())
        }
    }
}

impl fmt::Debug for SocketHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SocketHandle")
            .field("descriptor", &self.descriptor)
            .field("family", &self.family)
            .field("state", &self.state)
            .finish()
    }
}
