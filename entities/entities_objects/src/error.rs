//! Error Module
//!
//! Exceptions raised across the interpreter boundary and the native error
//! numbers they carry.

use std::fmt;

/// Native error number, carried verbatim from the network stack or resolver.
///
/// Resolver status codes are negative and are carried unchanged as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Errno(pub i32);

impl Errno {
    /// I/O error
    pub const EIO: Errno = Errno(5);
    /// Bad file descriptor
    pub const EBADF: Errno = Errno(9);
    /// Resource temporarily unavailable (would block)
    pub const EAGAIN: Errno = Errno(11);
    /// Out of memory
    pub const ENOMEM: Errno = Errno(12);
    /// Invalid argument
    pub const EINVAL: Errno = Errno(22);
    /// Protocol wrong type for socket
    pub const EPROTOTYPE: Errno = Errno(91);
    /// Address family not supported
    pub const EAFNOSUPPORT: Errno = Errno(97);

    /// Raw numeric code
    pub fn code(self) -> i32 {
        self.0
    }

    /// Whether this is the "would block" code returned by non-blocking descriptors
    pub fn is_would_block(self) -> bool {
        self == Errno::EAGAIN
    }
}

impl From<i32> for Errno {
    fn from(code: i32) -> Self {
        Errno(code)
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Errno {}]", self.0)
    }
}

/// Exception raised by a binding call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjError {
    /// OSError carrying a native error number
    Os(Errno),
    /// TypeError: wrong object type or argument count
    Type(String),
    /// ValueError: right type, wrong value (e.g. wrong tuple length)
    Value(String),
}

impl ObjError {
    /// OSError from an error number
    pub fn os(errno: impl Into<Errno>) -> Self {
        ObjError::Os(errno.into())
    }

    pub fn type_error(msg: impl Into<String>) -> Self {
        ObjError::Type(msg.into())
    }

    pub fn value_error(msg: impl Into<String>) -> Self {
        ObjError::Value(msg.into())
    }

    /// The carried error number, if this is an OSError
    pub fn errno(&self) -> Option<Errno> {
        match self {
            ObjError::Os(errno) => Some(*errno),
            _ => None,
        }
    }
}

impl From<Errno> for ObjError {
    fn from(errno: Errno) -> Self {
        ObjError::Os(errno)
    }
}

impl fmt::Display for ObjError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjError::Os(errno) => write!(f, "OSError: {}", errno),
            ObjError::Type(msg) => write!(f, "TypeError: {}", msg),
            ObjError::Value(msg) => write!(f, "ValueError: {}", msg),
        }
    }
}

impl std::error::Error for ObjError {}
