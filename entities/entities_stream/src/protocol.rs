//! Stream Protocol Module
//!
//! The three operations a stream object provides to the interpreter's I/O layer.

use entities_objects::Errno;

/// Control request passed to [`Stream::ioctl`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamRequest {
    /// Release the underlying resource
    Close,
    /// Flush buffered output
    Flush,
    /// Any other numeric request
    Other(u32),
}

/// Byte-stream contract
///
/// Implementations perform no buffering of their own; errors are native error
/// numbers which the helpers turn into OSError.
pub trait Stream {
    /// Read at most `buf.len()` bytes; `Ok(0)` means end of stream
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Errno>;

    /// Write some prefix of `buf`, returning how many bytes were taken
    fn write(&mut self, buf: &[u8]) -> Result<usize, Errno>;

    /// Control operation
    fn ioctl(&mut self, request: StreamRequest, arg: usize) -> Result<usize, Errno>;
}
