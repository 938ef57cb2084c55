//! Host Network Stack Module
//!
//! [`NetStack`] over the host's BSD sockets using `socket2`. Descriptors handed
//! out are the host file descriptors; the table keeps the owning `socket2`
//! sockets alive until `close`.

use crate::native::{
    AddressFamily, NetStack, Protocol, RawDescriptor, SocketOption, SocketType,
};
use entities_objects::Errno;
use log::trace;
use socket2::{Domain, Protocol as Socket2Protocol, SockAddr, Socket as Socket2, Type};
use std::collections::HashMap;
use std::io::{self, Read};
use std::net::SocketAddr;
use std::os::unix::io::AsRawFd;
use std::sync::{Arc, Mutex, MutexGuard};

/// Host codes that differ from the interpreter's numbering
const HOST_ERRNOS: [(i32, Errno); 8] = [
    (libc::EIO, Errno::EIO),
    (libc::EBADF, Errno::EBADF),
    (libc::EAGAIN, Errno::EAGAIN),
    (libc::EWOULDBLOCK, Errno::EAGAIN),
    (libc::ENOMEM, Errno::ENOMEM),
    (libc::EINVAL, Errno::EINVAL),
    (libc::EPROTOTYPE, Errno::EPROTOTYPE),
    (libc::EAFNOSUPPORT, Errno::EAFNOSUPPORT),
];

/// Translate a host errno so callers can compare against the `Errno` constants
fn host_errno(code: i32) -> Errno {
    HOST_ERRNOS
        .iter()
        .find(|(host, _)| *host == code)
        .map(|(_, errno)| *errno)
        .unwrap_or(Errno(code))
}

fn errno_of(err: io::Error) -> Errno {
    err.raw_os_error().map(host_errno).unwrap_or(Errno::EIO)
}

fn last_errno() -> Errno {
    host_errno(nix::errno::Errno::last() as i32)
}

fn domain_of(family: AddressFamily) -> Result<Domain, Errno> {
    match family {
        AddressFamily::Ipv4 => Ok(Domain::IPV4),
        AddressFamily::Ipv6 => Ok(Domain::IPV6),
        #[cfg(any(target_os = "linux", target_os = "android"))]
        AddressFamily::Packet => Ok(Domain::PACKET),
        #[cfg(not(any(target_os = "linux", target_os = "android")))]
        AddressFamily::Packet => Err(Errno::EAFNOSUPPORT),
    }
}

fn type_of(socket_type: SocketType) -> Type {
    match socket_type {
        SocketType::Stream => Type::STREAM,
        SocketType::Datagram => Type::DGRAM,
        SocketType::Raw => Type::RAW,
    }
}

/// Network stack backed by host sockets
pub struct HostStack {
    sockets: Mutex<HashMap<RawDescriptor, Arc<Socket2>>>,
}

impl HostStack {
    pub fn new() -> Self {
        Self {
            sockets: Mutex::new(HashMap::new()),
        }
    }

    fn table(&self) -> MutexGuard<'_, HashMap<RawDescriptor, Arc<Socket2>>> {
        self.sockets.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Socket for `fd`; cloned out so blocking calls run without the table lock
    fn lookup(&self, fd: RawDescriptor) -> Result<Arc<Socket2>, Errno> {
        self.table().get(&fd).cloned().ok_or(Errno::EBADF)
    }

    fn register(&self, socket: Socket2) -> RawDescriptor {
        let fd = socket.as_raw_fd();
        self.table().insert(fd, Arc::new(socket));
        fd
    }

    /// Number of open descriptors
    pub fn open_count(&self) -> usize {
        self.table().len()
    }
}

impl Default for HostStack {
    fn default() -> Self {
        Self::new()
    }
}

impl NetStack for HostStack {
    fn socket(
        &self,
        family: AddressFamily,
        socket_type: SocketType,
        protocol: Protocol,
    ) -> Result<RawDescriptor, Errno> {
        let domain = domain_of(family)?;
        let protocol = match protocol {
            Protocol::Tls12 => return Err(Errno(libc::EPROTONOSUPPORT)),
            other => Socket2Protocol::from(other.code()),
        };
        let socket = Socket2::new(domain, type_of(socket_type), Some(protocol)).map_err(errno_of)?;
        let fd = self.register(socket);
        trace!("host socket({:?}, {:?}) = {}", family, socket_type, fd);
        Ok(fd)
    }

    fn bind(&self, fd: RawDescriptor, addr: &SocketAddr) -> Result<(), Errno> {
        trace!("host bind({}, {})", fd, addr);
        self.lookup(fd)?.bind(&SockAddr::from(*addr)).map_err(errno_of)
    }

    fn connect(&self, fd: RawDescriptor, addr: &SocketAddr) -> Result<(), Errno> {
        trace!("host connect({}, {})", fd, addr);
        self.lookup(fd)?.connect(&SockAddr::from(*addr)).map_err(errno_of)
    }

    fn listen(&self, fd: RawDescriptor, backlog: i32) -> Result<(), Errno> {
        trace!("host listen({}, {})", fd, backlog);
        self.lookup(fd)?.listen(backlog).map_err(errno_of)
    }

    fn accept(&self, fd: RawDescriptor) -> Result<(RawDescriptor, Option<SocketAddr>), Errno> {
        let (socket, peer) = self.lookup(fd)?.accept().map_err(errno_of)?;
        let client = self.register(socket);
        trace!("host accept({}) = {}", fd, client);
        Ok((client, peer.as_socket()))
    }

    fn send(&self, fd: RawDescriptor, buf: &[u8]) -> Result<usize, Errno> {
        let n = self.lookup(fd)?.send(buf).map_err(errno_of)?;
        trace!("host send({}, {} bytes) = {}", fd, buf.len(), n);
        Ok(n)
    }

    fn recv(&self, fd: RawDescriptor, buf: &mut [u8]) -> Result<usize, Errno> {
        let socket = self.lookup(fd)?;
        let n = (&*socket).read(buf).map_err(errno_of)?;
        trace!("host recv({}, {} bytes) = {}", fd, buf.len(), n);
        Ok(n)
    }

    fn close(&self, fd: RawDescriptor) -> Result<(), Errno> {
        trace!("host close({})", fd);
        // dropping the last reference closes the host descriptor
        self.table().remove(&fd).map(|_| ()).ok_or(Errno::EBADF)
    }

    fn get_flags(&self, fd: RawDescriptor) -> Result<i32, Errno> {
        let socket = self.lookup(fd)?;
        let flags = unsafe { libc::fcntl(socket.as_raw_fd(), libc::F_GETFL) };
        if flags == -1 {
            return Err(last_errno());
        }
        Ok(flags)
    }

    fn set_flags(&self, fd: RawDescriptor, flags: i32) -> Result<(), Errno> {
        let socket = self.lookup(fd)?;
        trace!("host fcntl({}, F_SETFL, {:#x})", fd, flags);
        let res = unsafe { libc::fcntl(socket.as_raw_fd(), libc::F_SETFL, flags) };
        if res == -1 {
            return Err(last_errno());
        }
        Ok(())
    }

    fn set_option(&self, fd: RawDescriptor, option: &SocketOption) -> Result<(), Errno> {
        self.lookup(fd)?;
        trace!("host setsockopt({}, {:?}) unsupported", fd, option);
        // credentials and PDN contexts only exist on offloaded modems
        Err(Errno(libc::ENOPROTOOPT))
    }

    fn local_addr(&self, fd: RawDescriptor) -> Result<SocketAddr, Errno> {
        let addr = self.lookup(fd)?.local_addr().map_err(errno_of)?;
        addr.as_socket().ok_or(Errno::EAFNOSUPPORT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use std::thread;

    fn loopback() -> SocketAddr {
        SocketAddr::new(Ipv4Addr::LOCALHOST.into(), 0)
    }

    #[test]
    fn test_socket_and_close() {
        let stack = HostStack::new();
        let fd = stack
            .socket(AddressFamily::Ipv4, SocketType::Stream, Protocol::Tcp)
            .unwrap();
        assert!(fd >= 0);
        assert_eq!(stack.open_count(), 1);
        stack.close(fd).unwrap();
        assert_eq!(stack.open_count(), 0);
        assert_eq!(stack.close(fd), Err(Errno::EBADF));
    }

    #[test]
    fn test_unknown_descriptor() {
        let stack = HostStack::new();
        assert_eq!(stack.listen(12345, 1), Err(Errno::EBADF));
        assert_eq!(stack.get_flags(12345), Err(Errno::EBADF));
    }

    #[test]
    fn test_tls_protocol_not_supported() {
        let stack = HostStack::new();
        assert_eq!(
            stack.socket(AddressFamily::Ipv4, SocketType::Stream, Protocol::Tls12),
            Err(Errno(libc::EPROTONOSUPPORT))
        );
    }

    #[test]
    fn test_flags_round_trip() {
        let stack = HostStack::new();
        let fd = stack
            .socket(AddressFamily::Ipv4, SocketType::Datagram, Protocol::Udp)
            .unwrap();
        let flags = stack.get_flags(fd).unwrap();
        stack.set_flags(fd, flags | libc::O_NONBLOCK).unwrap();
        assert_ne!(stack.get_flags(fd).unwrap() & libc::O_NONBLOCK, 0);
        stack.set_flags(fd, flags & !libc::O_NONBLOCK).unwrap();
        assert_eq!(stack.get_flags(fd).unwrap() & libc::O_NONBLOCK, 0);
        stack.close(fd).unwrap();
    }

    #[test]
    fn test_modem_options_not_supported() {
        let stack = HostStack::new();
        let fd = stack
            .socket(AddressFamily::Ipv4, SocketType::Stream, Protocol::Tcp)
            .unwrap();
        assert_eq!(
            stack.set_option(fd, &SocketOption::TlsSecTag(1)),
            Err(Errno(libc::ENOPROTOOPT))
        );
        assert_eq!(
            stack.set_option(fd, &SocketOption::BindToPdn(0)),
            Err(Errno(libc::ENOPROTOOPT))
        );
        stack.close(fd).unwrap();
    }

    #[test]
    fn test_host_errno_normalized() {
        assert_eq!(host_errno(libc::EWOULDBLOCK), Errno::EAGAIN);
        assert!(host_errno(libc::EAGAIN).is_would_block());
        assert_eq!(host_errno(libc::EAFNOSUPPORT), Errno::EAFNOSUPPORT);
        assert_eq!(host_errno(libc::EPROTOTYPE), Errno::EPROTOTYPE);
        assert_eq!(host_errno(libc::ECONNREFUSED), Errno(libc::ECONNREFUSED));
        let err = io::Error::from_raw_os_error(libc::EWOULDBLOCK);
        assert!(errno_of(err).is_would_block());
        assert_eq!(errno_of(io::Error::new(io::ErrorKind::Other, "x")), Errno::EIO);
    }

    #[test]
    fn test_nonblocking_recv_is_would_block() {
        let stack = HostStack::new();
        let fd = stack
            .socket(AddressFamily::Ipv4, SocketType::Datagram, Protocol::Udp)
            .unwrap();
        stack.bind(fd, &loopback()).unwrap();
        let flags = stack.get_flags(fd).unwrap();
        stack.set_flags(fd, flags | libc::O_NONBLOCK).unwrap();
        let mut buf = [0u8; 8];
        assert_eq!(stack.recv(fd, &mut buf), Err(Errno::EAGAIN));
        stack.close(fd).unwrap();
    }

    #[test]
    fn test_tcp_exchange() {
        let stack = Arc::new(HostStack::new());
        let listener = stack
            .socket(AddressFamily::Ipv4, SocketType::Stream, Protocol::Tcp)
            .unwrap();
        stack.bind(listener, &loopback()).unwrap();
        stack.listen(listener, 1).unwrap();
        let addr = stack.local_addr(listener).unwrap();
        assert!(addr.port() > 0);

        let client_stack = Arc::clone(&stack);
        let client = thread::spawn(move || {
            let fd = client_stack
                .socket(AddressFamily::Ipv4, SocketType::Stream, Protocol::Tcp)
                .unwrap();
            client_stack.connect(fd, &addr).unwrap();
            assert_eq!(client_stack.send(fd, b"hello").unwrap(), 5);
            client_stack.close(fd).unwrap();
        });

        let (conn, peer) = stack.accept(listener).unwrap();
        assert_ne!(conn, listener);
        assert_eq!(peer.map(|p| p.ip()), Some(Ipv4Addr::LOCALHOST.into()));

        let mut received = Vec::new();
        let mut buf = [0u8; 16];
        loop {
            let n = stack.recv(conn, &mut buf).unwrap();
            if n == 0 {
                break;
            }
            received.extend_from_slice(&buf[..n]);
        }
        assert_eq!(received, b"hello");

        client.join().unwrap();
        stack.close(conn).unwrap();
        stack.close(listener).unwrap();
    }
}
