//! Socket facade lifecycle, endpoint and error tests

use std::sync::Arc;
use std::thread;
use std::time::Duration;
use zsock::prelude::*;
use zsock::Errno;

#[test]
fn test_constructor_with_invalid_endpoint() {
    let err = Socket::new_rep("foo://bar").unwrap_err();
    assert!(matches!(
        err,
        Error::Initialization {
            socket_type: SocketType::Rep,
            ..
        }
    ));
    assert!(err.is_argument_error());
}

#[test]
fn test_same_binding_endpoint_for_two_rep_sockets() {
    let _first = Socket::new_rep("inproc://the_one_and_only").unwrap();
    let err = Socket::new_rep("inproc://the_one_and_only").unwrap_err();
    assert!(matches!(err, Error::Initialization { .. }));
    assert_eq!(err.errno(), Some(Errno::AddrInUse));
}

#[test]
fn test_endpoint_is_free_after_close() {
    let first = Socket::new_rep("inproc://socket-reuse").unwrap();
    first.close();
    let _second = Socket::new_rep("inproc://socket-reuse").unwrap();
}

#[test]
fn test_pair_send_and_receive() {
    let binding = Socket::new_pair("@inproc://socket-pair").unwrap();
    let connecting = Socket::new_pair(">inproc://socket-pair").unwrap();

    connecting.send("foobar").unwrap();
    let msg = binding.receive().unwrap();
    assert_eq!(msg.frames()[0], "foobar");

    let multipart = Message::new().push_str("a").push_empty().push_str("c");
    binding.send(multipart.clone()).unwrap();
    assert_eq!(connecting.receive().unwrap(), multipart);
}

#[test]
fn test_last_endpoint() {
    let socket = Socket::new_by_type(SocketType::Rep);
    assert_eq!(socket.last_endpoint(), None);

    socket.bind("inproc://socket-last-endpoint").unwrap();
    assert_eq!(
        socket.last_endpoint().as_deref(),
        Some("inproc://socket-last-endpoint")
    );
}

#[test]
fn test_bind_automatic_tcp_port() {
    let socket = Socket::new_by_type(SocketType::Rep);
    assert_eq!(socket.last_tcp_port(), None);

    socket.bind("tcp://127.0.0.1:*").unwrap();
    let port = socket.last_tcp_port().unwrap();
    assert!(port > 0);
    assert_eq!(
        socket.last_endpoint(),
        Some(format!("tcp://127.0.0.1:{port}"))
    );
}

#[test]
fn test_bind_explicit_tcp_port() {
    let port = portpicker::pick_unused_port().expect("no free port");
    let socket = Socket::new_by_type(SocketType::Rep);
    socket.bind(format!("tcp://127.0.0.1:{port}")).unwrap();
    assert_eq!(socket.last_tcp_port(), Some(port));
}

#[test]
fn test_bind_non_tcp_endpoint_clears_port() {
    let socket = Socket::new_by_type(SocketType::Rep);
    socket.bind("tcp://127.0.0.1:*").unwrap();
    assert!(socket.last_tcp_port().is_some());

    socket.bind("inproc://non_tcp_endpoint").unwrap();
    assert_eq!(socket.last_tcp_port(), None);
}

#[test]
fn test_bind_port_in_use() {
    let first = Socket::new_by_type(SocketType::Rep);
    first.bind("tcp://127.0.0.1:*").unwrap();
    let endpoint = first.last_endpoint().unwrap();

    let second = Socket::new_by_type(SocketType::Rep);
    let err = second.bind(&endpoint).unwrap_err();
    match err {
        Error::Bind {
            endpoint: failed,
            source,
        } => {
            assert_eq!(failed, endpoint);
            assert_eq!(source.errno, Errno::AddrInUse);
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(second.last_endpoint(), None);
}

#[test]
fn test_invalid_endpoints() {
    let socket = Socket::new_by_type(SocketType::Rep);
    for result in [
        socket.bind("foo://bar"),
        socket.connect("foo://bar"),
        socket.unbind("foo://bar"),
        socket.disconnect("foo://bar"),
        socket.connect("tcp://127.0.0.1"),
        socket.bind("inproc://"),
    ] {
        let err = result.unwrap_err();
        assert!(
            matches!(err, Error::InvalidEndpoint { .. }),
            "unexpected error {err:?}"
        );
    }
}

#[test]
fn test_unbind_and_disconnect() {
    let server = Socket::new_by_type(SocketType::Pull);
    let client = Socket::new_by_type(SocketType::Push);
    server.bind("inproc://socket-unbind").unwrap();
    client.connect("inproc://socket-unbind").unwrap();

    client.disconnect("inproc://socket-unbind").unwrap();
    server.unbind("inproc://socket-unbind").unwrap();

    // Never registered: tolerated
    client.disconnect("inproc://socket-unbind").unwrap();
    server.unbind("inproc://socket-unbind").unwrap();
}

#[test]
fn test_connect_before_bind() {
    let client = Socket::new_push(">inproc://socket-late-bind").unwrap();
    let server = Socket::new_pull("@inproc://socket-late-bind").unwrap();

    client.send("late").unwrap();
    assert_eq!(server.receive().unwrap().frames()[0], "late");
}

#[test]
fn test_receive_timeout() {
    let socket = Socket::with_options(
        SocketType::Pull,
        SocketOptions::new().with_recv_timeout(Duration::from_millis(20)),
        "@inproc://socket-timeout",
    )
    .unwrap();
    assert!(matches!(socket.receive(), Err(Error::TimedOut)));
}

#[test]
fn test_close_is_idempotent() {
    let socket = Socket::new_by_type(SocketType::Dealer);
    socket.close();
    socket.close();
    assert!(socket.is_closed());
    assert!(matches!(socket.receive(), Err(Error::Closed)));
}

#[test]
fn test_close_unblocks_receive() {
    let socket = Arc::new(Socket::new_pull("@inproc://socket-close-wakes").unwrap());
    let receiver = Arc::clone(&socket);
    let handle = thread::spawn(move || receiver.receive());

    thread::sleep(Duration::from_millis(20));
    socket.close();

    assert!(matches!(handle.join().unwrap(), Err(Error::Closed)));
}

#[test]
fn test_pub_sub_subscription() {
    let publisher = Socket::new_pub("@inproc://socket-pubsub").unwrap();
    let subscriber = Socket::new_sub(">inproc://socket-pubsub", Some(&b"weather"[..])).unwrap();
    subscriber
        .options()
        .set_rcvtimeo(Some(Duration::from_millis(20)));

    publisher.send(Message::new().push_str("sports").push_str("0:1")).unwrap();
    publisher.send(Message::new().push_str("weather").push_str("sunny")).unwrap();

    let msg = subscriber.receive().unwrap();
    assert_eq!(msg.frames()[1], "sunny");
    assert!(matches!(subscriber.receive(), Err(Error::TimedOut)));
}

#[test]
fn test_monitor_reports_bind() {
    let socket = Socket::new_by_type(SocketType::Router);
    let events = socket.monitor();
    socket.bind("inproc://socket-monitor").unwrap();
    assert_eq!(
        events.try_recv().unwrap(),
        SocketEvent::Bound("inproc://socket-monitor".to_string())
    );
}
