//! Stream Helpers Module
//!
//! Generic stream methods shared by every [`Stream`] object. Reads and writes
//! loop until the requested amount is transferred, end of stream is reached, or
//! the stream reports an error. A non-blocking stream that would block before
//! any byte moved yields `Obj::None`; after a partial transfer it yields what
//! was transferred.

use crate::protocol::{Stream, StreamRequest};
use entities_objects::{Errno, Obj, ObjError};

/// Chunk size used when reading to end of stream
const READ_ALL_CHUNK: usize = 256;

enum Transfer {
    Done(usize),
    WouldBlock(usize),
}

fn read_loop<S: Stream + ?Sized>(stream: &mut S, buf: &mut [u8]) -> Result<Transfer, Errno> {
    let mut done = 0;
    while done < buf.len() {
        match stream.read(&mut buf[done..]) {
            Ok(0) => break,
            Ok(n) => done += n,
            Err(e) if e.is_would_block() => return Ok(Transfer::WouldBlock(done)),
            Err(e) => return Err(e),
        }
    }
    Ok(Transfer::Done(done))
}

/// `read([size])`
///
/// With `size` None the stream is read until end of stream.
pub fn stream_read<S: Stream + ?Sized>(stream: &mut S, size: Option<usize>) -> Result<Obj, ObjError> {
    match size {
        Some(size) => {
            let mut buf = vec![0u8; size];
            match read_loop(stream, &mut buf)? {
                Transfer::WouldBlock(0) => Ok(Obj::None),
                Transfer::Done(n) | Transfer::WouldBlock(n) => {
                    buf.truncate(n);
                    Ok(Obj::Bytes(buf))
                }
            }
        }
        None => {
            let mut out = Vec::new();
            let mut chunk = [0u8; READ_ALL_CHUNK];
            loop {
                match stream.read(&mut chunk) {
                    Ok(0) => break,
                    Ok(n) => out.extend_from_slice(&chunk[..n]),
                    Err(e) if e.is_would_block() => {
                        if out.is_empty() {
                            return Ok(Obj::None);
                        }
                        break;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            Ok(Obj::Bytes(out))
        }
    }
}

/// `readinto(buf)`, returning the number of bytes stored
pub fn stream_readinto<S: Stream + ?Sized>(stream: &mut S, buf: &mut [u8]) -> Result<Obj, ObjError> {
    match read_loop(stream, buf)? {
        Transfer::WouldBlock(0) if !buf.is_empty() => Ok(Obj::None),
        Transfer::Done(n) | Transfer::WouldBlock(n) => Ok(Obj::Int(n as i64)),
    }
}

/// `readline([max])` without any read-ahead: one byte per native read
pub fn stream_unbuffered_readline<S: Stream + ?Sized>(
    stream: &mut S,
    max: Option<usize>,
) -> Result<Obj, ObjError> {
    let mut line = Vec::new();
    let mut byte = [0u8; 1];
    while max.map_or(true, |max| line.len() < max) {
        match stream.read(&mut byte) {
            Ok(0) => break,
            Ok(_) => {
                line.push(byte[0]);
                if byte[0] == b'\n' {
                    break;
                }
            }
            Err(e) if e.is_would_block() => {
                if line.is_empty() {
                    return Ok(Obj::None);
                }
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(Obj::Bytes(line))
}

/// `write(data)`, returning the number of bytes written
pub fn stream_write<S: Stream + ?Sized>(stream: &mut S, data: &[u8]) -> Result<Obj, ObjError> {
    let mut done = 0;
    while done < data.len() {
        match stream.write(&data[done..]) {
            Ok(0) => break,
            Ok(n) => done += n,
            Err(e) if e.is_would_block() => {
                if done == 0 {
                    return Ok(Obj::None);
                }
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(Obj::Int(done as i64))
}

/// `close()`
pub fn stream_close<S: Stream + ?Sized>(stream: &mut S) -> Result<(), ObjError> {
    stream.ioctl(StreamRequest::Close, 0)?;
    Ok(())
}
