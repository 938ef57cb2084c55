//! Stream Adapter Module
//!
//! Registers [`SocketHandle`] with the generic stream layer so `read`,
//! `readinto`, `readline` and `write` work on sockets like on any other stream.

use crate::native::CLOSED;
use crate::socket::SocketHandle;
use entities_objects::Errno;
use entities_stream::{Stream, StreamRequest};
use log::debug;

impl Stream for SocketHandle {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Errno> {
        if self.descriptor == CLOSED {
            return Err(Errno::EBADF);
        }
        self.stack.recv(self.descriptor, buf)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize, Errno> {
        if self.descriptor == CLOSED {
            return Err(Errno::EBADF);
        }
        self.stack.send(self.descriptor, buf)
    }

    fn ioctl(&mut self, request: StreamRequest, _arg: usize) -> Result<usize, Errno> {
        match request {
            StreamRequest::Close => {
                if self.descriptor != CLOSED {
                    self.stack.close(self.descriptor)?;
                    debug!("socket {} closed", self.descriptor);
                    self.descriptor = CLOSED;
                }
                Ok(0)
            }
            _ => Err(Errno::EINVAL),
        }
    }
}
