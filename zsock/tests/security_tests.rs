//! CURVE configuration and secure linking

use std::time::Duration;
use zsock::prelude::*;

fn recv_with_timeout(socket: &Socket) {
    socket
        .options()
        .set_rcvtimeo(Some(Duration::from_millis(50)));
}

#[test]
fn test_make_secure_server() {
    let cert = Certificate::new();
    let secret = cert.secret_key().unwrap();
    let socket = Socket::new_by_type(SocketType::Rep);

    socket.make_secure_server(secret, "foo realm").unwrap();

    let options = socket.options();
    assert_eq!(options.curve_secretkey().as_ref(), Some(secret));
    assert_eq!(options.curve_publickey().as_ref(), Some(cert.public_key()));
    assert!(options.curve_server());
    assert_eq!(options.zap_domain().as_deref(), Some("foo realm"));
    assert_eq!(options.mechanism(), Mechanism::Curve);
}

#[test]
fn test_make_secure_client() {
    let server_cert = Certificate::new();
    let client_cert = Certificate::new();
    let client_secret = client_cert.secret_key().unwrap();
    let socket = Socket::new_by_type(SocketType::Req);

    socket
        .make_secure_client(client_secret, server_cert.public_key())
        .unwrap();

    let options = socket.options();
    assert_eq!(options.curve_secretkey().as_ref(), Some(client_secret));
    assert_eq!(
        options.curve_publickey().as_ref(),
        Some(client_cert.public_key())
    );
    assert_eq!(
        options.curve_serverkey().as_ref(),
        Some(server_cert.public_key())
    );
    assert!(!options.curve_server());
    assert_eq!(options.mechanism(), Mechanism::Curve);
}

#[test]
fn test_secure_configuration_on_closed_socket() {
    let socket = Socket::new_by_type(SocketType::Rep);
    socket.close();
    let keys = CurveKeyPair::generate();
    assert!(matches!(
        socket.make_secure_server(&keys.secret, "realm"),
        Err(Error::Closed)
    ));
}

#[test]
fn test_secure_link() {
    let server_keys = CurveKeyPair::generate();
    let client_keys = CurveKeyPair::generate();

    let server = Socket::new_by_type(SocketType::Rep);
    server.make_secure_server(&server_keys.secret, "global").unwrap();
    server.bind("inproc://secure-link").unwrap();

    let client = Socket::new_by_type(SocketType::Req);
    client
        .make_secure_client(&client_keys.secret, &server_keys.public)
        .unwrap();
    let events = client.monitor();
    client.connect("inproc://secure-link").unwrap();
    assert_eq!(
        events.try_recv().unwrap(),
        SocketEvent::Connected("inproc://secure-link".to_string())
    );

    client.send("secret hello").unwrap();
    recv_with_timeout(&server);
    assert_eq!(server.receive().unwrap().frames()[0], "secret hello");
}

#[test]
fn test_wrong_server_key_is_refused() {
    let server_keys = CurveKeyPair::generate();
    let impostor = CurveKeyPair::generate();
    let client_keys = CurveKeyPair::generate();

    let server = Socket::new_by_type(SocketType::Pull);
    server.make_secure_server(&server_keys.secret, "global").unwrap();
    server.bind("inproc://secure-refused").unwrap();

    let client = Socket::new_by_type(SocketType::Push);
    client
        .make_secure_client(&client_keys.secret, &impostor.public)
        .unwrap();
    client
        .options()
        .set_sndtimeo(Some(Duration::from_millis(20)));
    let events = client.monitor();
    client.connect("inproc://secure-refused").unwrap();

    assert!(matches!(
        events.try_recv().unwrap(),
        SocketEvent::HandshakeFailed { .. }
    ));
    assert!(matches!(client.send("nope"), Err(Error::TimedOut)));
}

#[test]
fn test_plain_client_cannot_reach_curve_server() {
    let server_keys = CurveKeyPair::generate();
    let server = Socket::new_by_type(SocketType::Pull);
    server.make_secure_server(&server_keys.secret, "").unwrap();
    server.bind("inproc://secure-null-client").unwrap();

    let client = Socket::new_by_type(SocketType::Push);
    let events = client.monitor();
    client.connect("inproc://secure-null-client").unwrap();
    assert!(matches!(
        events.try_recv().unwrap(),
        SocketEvent::HandshakeFailed { .. }
    ));
}

#[test]
fn test_certificate_apply_then_serverkey() {
    let server_cert = Certificate::from_z85(
        "rq:rM>}U?@Lns47E1%kR.o@n%FcmmsL/@{H8]yf7",
        Some("JTKVSB%%)wK0E.X)V>+}o?pNmC{O&4W4b!Ni{Lh6"),
    )
    .unwrap();
    let client_cert = Certificate::new();

    let client = Socket::new_by_type(SocketType::Dealer);
    client_cert.apply(&client).unwrap();
    client
        .options()
        .set_curve_serverkey_z85(&server_cert.public_txt())
        .unwrap();

    let options = client.options();
    assert_eq!(options.mechanism(), Mechanism::Curve);
    assert_eq!(options.curve_serverkey().as_ref(), Some(server_cert.public_key()));
}
