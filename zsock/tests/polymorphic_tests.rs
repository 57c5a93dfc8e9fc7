//! Signals and queue tuning

use std::thread;
use std::time::Duration;
use zsock::prelude::*;

#[test]
fn test_signal_and_wait() {
    let receiver = Socket::new_pair("@inproc://poly-signal").unwrap();
    let sender = Socket::new_pair(">inproc://poly-signal").unwrap();

    sender.signal(0).unwrap();
    assert_eq!(receiver.wait().unwrap(), 0);

    sender.signal(42).unwrap();
    assert_eq!(receiver.wait().unwrap(), 42);
}

#[test]
fn test_wait_discards_other_messages() {
    let receiver = Socket::new_pull("@inproc://poly-discard").unwrap();
    let sender = Socket::new_push(">inproc://poly-discard").unwrap();

    sender.send("noise").unwrap();
    sender.send(Message::new().push_str("more").push_str("noise")).unwrap();
    sender.signal(7).unwrap();
    assert_eq!(receiver.wait().unwrap(), 7);
}

#[test]
fn test_signal_across_threads() {
    let receiver = Socket::new_pair("@inproc://poly-thread").unwrap();
    let handle = thread::spawn(|| {
        let sender = Socket::new_pair(">inproc://poly-thread").unwrap();
        sender.signal(1).unwrap();
        // Keep the link until the signal has been read
        thread::sleep(Duration::from_millis(50));
    });
    assert_eq!(receiver.wait().unwrap(), 1);
    handle.join().unwrap();
}

#[test]
fn test_wait_times_out() {
    let socket = Socket::new_pull("@inproc://poly-timeout").unwrap();
    socket.options().set_rcvtimeo(Some(Duration::from_millis(20)));
    assert!(matches!(socket.wait(), Err(Error::TimedOut)));
}

#[test]
fn test_set_unbounded() {
    let socket = Socket::new_by_type(SocketType::Pub);
    socket.set_unbounded();
    assert_eq!(socket.options().sndhwm(), 0);
    assert_eq!(socket.options().rcvhwm(), 0);
}
