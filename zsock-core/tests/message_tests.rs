//! Integration tests for the Message API

use bytes::Bytes;
use zsock_core::message::Message;

#[test]
fn test_message_builder_basic() {
    let msg = Message::new()
        .push_str("topic")
        .push_str("Hello")
        .push(Vec::from(&b"World"[..]));

    assert_eq!(msg.len(), 3);

    let frames = msg.into_frames();
    assert_eq!(frames[0], Bytes::from_static(b"topic"));
    assert_eq!(frames[1], Bytes::from_static(b"Hello"));
    assert_eq!(frames[2], Bytes::from_static(b"World"));
}

#[test]
fn test_message_builder_empty_frames() {
    let msg = Message::new()
        .push(Vec::from(&b"identity"[..]))
        .push_empty()
        .push_str("body");

    let frames = msg.into_frames();
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0], Bytes::from_static(b"identity"));
    assert!(frames[1].is_empty());
    assert_eq!(frames[2], Bytes::from_static(b"body"));
}

#[test]
fn test_message_conversions() {
    let msg = Message::from("single");
    assert_eq!(msg.frames(), &[Bytes::from_static(b"single")]);

    let msg = Message::from(String::from("owned"));
    assert_eq!(msg.len(), 1);

    let msg = Message::from(vec!["a", "b"]);
    let frames: Vec<Bytes> = msg.into();
    assert_eq!(frames, vec![Bytes::from_static(b"a"), Bytes::from_static(b"b")]);
}

#[test]
fn test_binary_frames_preserved() {
    let payload = Bytes::from(vec![0u8, 255, 0, 1]);
    let msg = Message::new().push(payload.clone()).push_empty();
    let collected: Vec<Bytes> = msg.into_iter().collect();
    assert_eq!(collected, vec![payload, Bytes::new()]);
}
