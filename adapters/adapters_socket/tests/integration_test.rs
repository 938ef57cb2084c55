//! Integration tests for adapters_socket crate
//!
//! These tests drive socket objects against the host network stack over
//! loopback, covering the listen/accept/echo workflow, peer close, blocking
//! and non-blocking receives, and IPv6 datagrams.

#![cfg(unix)]

use adapters_socket::*;
use entities_objects::{Obj, ObjError};
use entities_stream::{stream_read, stream_unbuffered_readline};
use std::net::UdpSocket;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn host_stack() -> Arc<dyn NetStack> {
    let _ = env_logger::builder().is_test(true).try_init();
    Arc::new(HostStack::new())
}

fn open(stack: &Arc<dyn NetStack>, family: AddressFamily, socket_type: SocketType) -> SocketHandle {
    SocketHandle::new(
        Arc::clone(stack),
        family,
        socket_type,
        None,
        SocketConfig::default(),
    )
    .unwrap()
}

fn v4(host: &str, port: i64) -> Obj {
    Obj::tuple(vec![Obj::from(host), Obj::Int(port)])
}

/// Listening socket on an ephemeral loopback port, with that port
fn listener(stack: &Arc<dyn NetStack>) -> (SocketHandle, i64) {
    let mut server = open(stack, AddressFamily::Ipv4, SocketType::Stream);
    server.bind(&v4("127.0.0.1", 0)).unwrap();
    server.listen(None).unwrap();
    let name = server.getsockname().unwrap();
    let items = name.get_array_fixed_n(2).unwrap();
    assert_eq!(items[0], Obj::from("127.0.0.1"));
    let port = items[1].get_int().unwrap();
    assert!(port > 0);
    (server, port)
}

#[test]
fn test_accept_and_echo() {
    let stack = host_stack();
    let (mut server, port) = listener(&stack);

    let client_stack = Arc::clone(&stack);
    let client = thread::spawn(move || {
        let mut sock = open(&client_stack, AddressFamily::Ipv4, SocketType::Stream);
        sock.connect(&v4("127.0.0.1", port)).unwrap();
        assert_eq!(sock.state(), SocketState::Connected);
        assert_eq!(sock.send(&Obj::Bytes(b"ping\n".to_vec())).unwrap(), 5);
        let reply = sock.recv(16).unwrap();
        sock.close().unwrap();
        reply
    });

    let (mut conn, peer) = server.accept().unwrap();
    assert_eq!(peer, Obj::None);
    assert_ne!(conn.descriptor(), server.descriptor());
    assert_eq!(conn.family(), AddressFamily::Ipv4);

    let line = stream_unbuffered_readline(conn.makefile(), None).unwrap();
    assert_eq!(line, Obj::Bytes(b"ping\n".to_vec()));
    conn.send(&Obj::Bytes(b"pong".to_vec())).unwrap();

    assert_eq!(client.join().unwrap(), b"pong".to_vec());

    // client closed its end
    assert_eq!(conn.recv(16).unwrap(), Vec::<u8>::new());
    assert_eq!(conn.state(), SocketState::PeerClosed);

    conn.close().unwrap();
    server.close().unwrap();
}

#[test]
fn test_nonblocking_recv_would_block() {
    let stack = host_stack();
    let (mut server, port) = listener(&stack);

    let mut client = open(&stack, AddressFamily::Ipv4, SocketType::Stream);
    client.connect(&v4("127.0.0.1", port)).unwrap();
    let (mut conn, _) = server.accept().unwrap();

    conn.setblocking(&Obj::Bool(false)).unwrap();
    let err = conn.recv(8).unwrap_err();
    assert!(err.errno().map(|e| e.is_would_block()).unwrap_or(false), "{}", err);
    assert_eq!(stream_read(&mut conn, Some(8)).unwrap(), Obj::None);

    client.send(&Obj::from("x")).unwrap();
    conn.setblocking(&Obj::Bool(true)).unwrap();
    assert_eq!(conn.recv(8).unwrap(), b"x".to_vec());
}

#[test]
fn test_connect_refused_keeps_socket_open() {
    let stack = host_stack();
    let (mut server, port) = listener(&stack);
    server.close().unwrap();

    let mut sock = open(&stack, AddressFamily::Ipv4, SocketType::Stream);
    let err = sock.connect(&v4("127.0.0.1", port)).unwrap_err();
    assert!(matches!(err, ObjError::Os(_)));
    assert!(!sock.is_closed());
    assert_eq!(sock.state(), SocketState::New);
}

#[test]
fn test_close_twice_and_use_after_close() {
    let stack = host_stack();
    let mut sock = open(&stack, AddressFamily::Ipv4, SocketType::Datagram);
    sock.close().unwrap();
    sock.close().unwrap();
    assert_eq!(sock.to_string(), "<socket NULL>");
    assert_eq!(
        sock.bind(&v4("127.0.0.1", 0)),
        Err(ObjError::os(entities_objects::Errno::EBADF))
    );
}

#[test]
fn test_ipv6_datagram_blocking_recv() {
    let stack = host_stack();
    let mut sock = match SocketHandle::new(
        Arc::clone(&stack),
        AddressFamily::Ipv6,
        SocketType::Datagram,
        None,
        SocketConfig::default(),
    ) {
        Ok(sock) => sock,
        Err(_) => return,
    };
    let any = Obj::tuple(vec![Obj::from("::1"), Obj::Int(0), Obj::Int(0), Obj::Int(0)]);
    if sock.bind(&any).is_err() {
        eprintln!("IPv6 loopback unavailable, skipping");
        return;
    }
    let name = sock.getsockname().unwrap();
    let port = name.get_array_fixed_n(4).unwrap()[1].get_int().unwrap() as u16;

    let (tx, rx) = mpsc::channel();
    let receiver = thread::spawn(move || {
        let data = sock.recv(32);
        tx.send(data).unwrap();
    });

    // receiver must still be blocked with nothing sent
    assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());

    let sender = UdpSocket::bind("[::1]:0").unwrap();
    sender.send_to(b"datagram", ("::1", port)).unwrap();

    let data = rx.recv_timeout(Duration::from_secs(5)).unwrap().unwrap();
    assert_eq!(data, b"datagram".to_vec());
    receiver.join().unwrap();
}

#[test]
fn test_accepted_sockets_are_released_on_drop() {
    let host = Arc::new(HostStack::new());
    let stack: Arc<dyn NetStack> = host.clone();
    {
        let (mut server, port) = listener(&stack);
        let mut client = open(&stack, AddressFamily::Ipv4, SocketType::Stream);
        client.connect(&v4("127.0.0.1", port)).unwrap();
        let (_conn, _) = server.accept().unwrap();
        assert_eq!(host.open_count(), 3);
    }
    assert_eq!(host.open_count(), 0);
}
