//! Native Network Stack Module
//!
//! The synchronous socket calls the binding consumes from the network stack,
//! and the numbering the interpreter sees for families, types and protocols.

use entities_objects::Errno;
use std::net::SocketAddr;

/// Native socket descriptor
pub type RawDescriptor = i32;

/// Descriptor value of a closed socket
pub const CLOSED: RawDescriptor = -1;

/// Non-blocking bit of the descriptor status flags
#[cfg(unix)]
pub const O_NONBLOCK: i32 = libc::O_NONBLOCK;
#[cfg(not(unix))]
pub const O_NONBLOCK: i32 = 0x4000;

/// Address family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    /// IPv4
    Ipv4,
    /// IPv6
    Ipv6,
    /// Raw link-layer
    Packet,
}

impl AddressFamily {
    /// `AF_*` value exposed to scripts
    pub fn code(self) -> i32 {
        match self {
            AddressFamily::Ipv4 => 1,
            AddressFamily::Ipv6 => 2,
            AddressFamily::Packet => 3,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(AddressFamily::Ipv4),
            2 => Some(AddressFamily::Ipv6),
            3 => Some(AddressFamily::Packet),
            _ => None,
        }
    }

    /// Family of a native address record
    pub fn of(addr: &SocketAddr) -> Self {
        match addr {
            SocketAddr::V4(_) => AddressFamily::Ipv4,
            SocketAddr::V6(_) => AddressFamily::Ipv6,
        }
    }
}

/// Socket type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocketType {
    /// Stream socket
    Stream,
    /// Datagram socket
    Datagram,
    /// Raw socket
    Raw,
}

impl SocketType {
    /// `SOCK_*` value exposed to scripts
    pub fn code(self) -> i32 {
        match self {
            SocketType::Stream => 1,
            SocketType::Datagram => 2,
            SocketType::Raw => 3,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(SocketType::Stream),
            2 => Some(SocketType::Datagram),
            3 => Some(SocketType::Raw),
            _ => None,
        }
    }
}

/// Protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// TCP
    Tcp,
    /// UDP
    Udp,
    /// TLS 1.2 terminated by the offloaded stack
    Tls12,
    /// Any other protocol number, passed through
    Other(i32),
}

impl Protocol {
    /// `IPPROTO_*` value
    pub fn code(self) -> i32 {
        match self {
            Protocol::Tcp => 6,
            Protocol::Udp => 17,
            Protocol::Tls12 => 258,
            Protocol::Other(code) => code,
        }
    }

    pub fn from_code(code: i64) -> Self {
        match code {
            6 => Protocol::Tcp,
            17 => Protocol::Udp,
            258 => Protocol::Tls12,
            other => Protocol::Other(other as i32),
        }
    }

    /// Protocol chosen when the caller leaves it unspecified
    pub fn auto_for(socket_type: SocketType) -> Self {
        if socket_type == SocketType::Stream {
            Protocol::Tcp
        } else {
            Protocol::Udp
        }
    }
}

/// Peer verification mode for offloaded TLS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsPeerVerify {
    None,
    Optional,
    Required,
}

impl TlsPeerVerify {
    pub fn code(self) -> i32 {
        match self {
            TlsPeerVerify::None => 0,
            TlsPeerVerify::Optional => 1,
            TlsPeerVerify::Required => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(TlsPeerVerify::None),
            1 => Some(TlsPeerVerify::Optional),
            2 => Some(TlsPeerVerify::Required),
            _ => None,
        }
    }
}

/// Socket option applied through [`NetStack::set_option`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketOption {
    /// `TLS_SEC_TAG_LIST` with a single credential tag
    TlsSecTag(u32),
    /// `TLS_PEER_VERIFY`
    TlsPeerVerify(TlsPeerVerify),
    /// `TLS_HOSTNAME`
    TlsHostname(String),
    /// `SO_BINDTOPDN`
    BindToPdn(i32),
}

/// Synchronous socket calls of the network stack
///
/// Every call may block the calling thread. Failures carry the stack's errno.
#[cfg_attr(test, mockall::automock)]
pub trait NetStack: Send + Sync {
    fn socket(
        &self,
        family: AddressFamily,
        socket_type: SocketType,
        protocol: Protocol,
    ) -> Result<RawDescriptor, Errno>;

    fn bind(&self, fd: RawDescriptor, addr: &SocketAddr) -> Result<(), Errno>;

    fn connect(&self, fd: RawDescriptor, addr: &SocketAddr) -> Result<(), Errno>;

    fn listen(&self, fd: RawDescriptor, backlog: i32) -> Result<(), Errno>;

    /// Returns the accepted descriptor and, when the stack reports one, the peer address
    fn accept(&self, fd: RawDescriptor) -> Result<(RawDescriptor, Option<SocketAddr>), Errno>;

    fn send(&self, fd: RawDescriptor, buf: &[u8]) -> Result<usize, Errno>;

    fn recv(&self, fd: RawDescriptor, buf: &mut [u8]) -> Result<usize, Errno>;

    fn close(&self, fd: RawDescriptor) -> Result<(), Errno>;

    /// `fcntl(F_GETFL)`
    fn get_flags(&self, fd: RawDescriptor) -> Result<i32, Errno>;

    /// `fcntl(F_SETFL)`
    fn set_flags(&self, fd: RawDescriptor, flags: i32) -> Result<(), Errno>;

    fn set_option(&self, fd: RawDescriptor, option: &SocketOption) -> Result<(), Errno>;

    fn local_addr(&self, fd: RawDescriptor) -> Result<SocketAddr, Errno>;
}
