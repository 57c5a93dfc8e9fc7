//! Endpoints reach the native layer verbatim and native codes are translated
//!
//! Uses a recording delegate in place of the native socket.

use bytes::Bytes;
use parking_lot::{Mutex, MutexGuard};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use zsock::prelude::*;
use zsock::{Errno, NativeError, SocketMonitor, ZsockDelegate};
use zsock_core::error::NativeResult;
use zsock_core::monitor::create_monitor;

#[derive(Debug, Default)]
struct Recorder {
    calls: Mutex<Vec<(&'static str, String)>>,
    failure: Mutex<Option<Errno>>,
    options: Mutex<SocketOptions>,
    last_endpoint: Mutex<Option<String>>,
    destroyed: AtomicBool,
    destroy_count: Mutex<usize>,
}

#[derive(Debug, Clone, Default)]
struct RecordingDelegate(Arc<Recorder>);

impl RecordingDelegate {
    fn record(&self, op: &'static str, endpoint: fmt::Arguments<'_>) -> NativeResult<()> {
        let endpoint = endpoint.to_string();
        self.0.calls.lock().push((op, endpoint.clone()));
        if let Some(errno) = *self.0.failure.lock() {
            return Err(NativeError::new(errno, "injected"));
        }
        if op == "bind" {
            *self.0.last_endpoint.lock() = Some(endpoint);
        }
        Ok(())
    }

    fn fail_with(&self, errno: Errno) {
        *self.0.failure.lock() = Some(errno);
    }

    fn calls(&self) -> Vec<(&'static str, String)> {
        self.0.calls.lock().clone()
    }
}

impl ZsockDelegate for RecordingDelegate {
    fn socket_type(&self) -> SocketType {
        SocketType::Rep
    }

    fn bind(&self, endpoint: fmt::Arguments<'_>) -> NativeResult<()> {
        self.record("bind", endpoint)
    }

    fn connect(&self, endpoint: fmt::Arguments<'_>) -> NativeResult<()> {
        self.record("connect", endpoint)
    }

    fn unbind(&self, endpoint: fmt::Arguments<'_>) -> NativeResult<()> {
        self.record("unbind", endpoint)
    }

    fn disconnect(&self, endpoint: fmt::Arguments<'_>) -> NativeResult<()> {
        self.record("disconnect", endpoint)
    }

    fn last_endpoint(&self) -> Option<String> {
        self.0.last_endpoint.lock().clone()
    }

    fn send(&self, _frames: Vec<Bytes>) -> NativeResult<()> {
        Ok(())
    }

    fn recv(&self) -> NativeResult<Vec<Bytes>> {
        Err(NativeError::again("nothing recorded"))
    }

    fn options(&self) -> MutexGuard<'_, SocketOptions> {
        self.0.options.lock()
    }

    fn monitor(&self) -> SocketMonitor {
        create_monitor().1
    }

    fn destroy(&self) {
        self.0.destroyed.store(true, Ordering::Release);
        *self.0.destroy_count.lock() += 1;
    }

    fn is_destroyed(&self) -> bool {
        self.0.destroyed.load(Ordering::Acquire)
    }
}

/// An endpoint that is not a string.
struct Opaque;

impl fmt::Display for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("inproc://opaque")
    }
}

fn socket() -> (Socket, RecordingDelegate) {
    let delegate = RecordingDelegate::default();
    (Socket::from_delegate(Box::new(delegate.clone())), delegate)
}

#[test]
fn test_endpoints_are_passed_verbatim() {
    let (socket, delegate) = socket();
    socket.bind("inproc://%s%n").unwrap();
    socket.connect("tcp://{}:%d").unwrap();
    socket.unbind("inproc://{0}{{").unwrap();
    socket.disconnect("ipc://%x%x%x").unwrap();

    assert_eq!(
        delegate.calls(),
        vec![
            ("bind", "inproc://%s%n".to_string()),
            ("connect", "tcp://{}:%d".to_string()),
            ("unbind", "inproc://{0}{{".to_string()),
            ("disconnect", "ipc://%x%x%x".to_string()),
        ]
    );
}

#[test]
fn test_non_string_endpoint() {
    let (socket, delegate) = socket();
    socket.bind(Opaque).unwrap();
    socket.connect(Opaque).unwrap();
    assert_eq!(delegate.calls()[0].1, "inproc://opaque");
    assert_eq!(delegate.calls()[1].1, "inproc://opaque");
    assert_eq!(socket.last_endpoint().as_deref(), Some("inproc://opaque"));
}

#[test]
fn test_bind_error_translation() {
    let (socket, delegate) = socket();
    delegate.fail_with(Errno::NoCompatProto);
    assert!(matches!(
        socket.bind("udp://%s"),
        Err(Error::InvalidEndpoint { endpoint, .. }) if endpoint == "udp://%s"
    ));

    delegate.fail_with(Errno::AddrNotAvail);
    assert!(matches!(socket.bind("tcp://10.0.0.1:1"), Err(Error::Bind { .. })));
}

#[test]
fn test_operation_error_translation() {
    let (socket, delegate) = socket();
    delegate.fail_with(Errno::NoDev);
    match socket.connect("tcp://nowhere:1").unwrap_err() {
        Error::Operation { op, endpoint, .. } => {
            assert_eq!(op, "connect");
            assert_eq!(endpoint.as_deref(), Some("tcp://nowhere:1"));
        }
        other => panic!("unexpected error {other:?}"),
    }

    delegate.fail_with(Errno::NoEnt);
    socket.unbind("inproc://unknown").unwrap();
    socket.disconnect("inproc://unknown").unwrap();

    delegate.fail_with(Errno::Inval);
    assert!(matches!(
        socket.disconnect("inproc://"),
        Err(Error::InvalidEndpoint { .. })
    ));
}

#[test]
fn test_native_handle_released_once() {
    let (socket, delegate) = socket();
    socket.close();
    socket.close();
    drop(socket);
    assert_eq!(*delegate.0.destroy_count.lock(), 1);
}

#[test]
fn test_closed_socket_does_not_reach_native() {
    let (socket, delegate) = socket();
    socket.close();
    assert!(matches!(socket.connect("inproc://late"), Err(Error::Closed)));
    assert!(delegate.calls().is_empty());
}
