//! Multipart messages.
//!
//! A [`Message`] is an ordered list of binary frames. Ownership moves into
//! the socket on send and out of it on receive.

use bytes::Bytes;
use smallvec::SmallVec;

/// Most messages carry an envelope plus a body; four frames stay inline.
type Frames = SmallVec<[Bytes; 4]>;

/// A multipart message with a fluent builder API.
///
/// # Examples
///
/// ```
/// use zsock_core::message::Message;
///
/// let msg = Message::new()
///     .push_str("topic")
///     .push_str("Hello, World!");
/// assert_eq!(msg.len(), 2);
///
/// let msg = Message::from(vec!["a", "b", "c"]);
/// assert_eq!(msg.frames()[2], "c");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    frames: Frames,
}

impl Message {
    /// Create a new empty message.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames: SmallVec::new(),
        }
    }

    /// Add a frame from any type that can be converted to `Bytes`.
    #[must_use]
    pub fn push(mut self, frame: impl Into<Bytes>) -> Self {
        self.frames.push(frame.into());
        self
    }

    /// Add a string frame.
    #[must_use]
    pub fn push_str(mut self, s: &str) -> Self {
        self.frames.push(Bytes::copy_from_slice(s.as_bytes()));
        self
    }

    /// Add an empty delimiter frame.
    #[must_use]
    pub fn push_empty(mut self) -> Self {
        self.frames.push(Bytes::new());
        self
    }

    /// Insert a frame at the front (envelope building).
    pub fn push_front(&mut self, frame: impl Into<Bytes>) {
        self.frames.insert(0, frame.into());
    }

    /// Remove and return the first frame.
    pub fn pop_front(&mut self) -> Option<Bytes> {
        if self.frames.is_empty() {
            None
        } else {
            Some(self.frames.remove(0))
        }
    }

    /// Get the number of frames in the message.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Check if the message has no frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Get a reference to the frames.
    #[must_use]
    pub fn frames(&self) -> &[Bytes] {
        &self.frames
    }

    /// Consume the message and return the frames.
    #[must_use]
    pub fn into_frames(self) -> Vec<Bytes> {
        self.frames.into_vec()
    }

    /// Create a message from existing frames.
    #[must_use]
    pub fn from_frames(frames: Vec<Bytes>) -> Self {
        Self {
            frames: SmallVec::from_vec(frames),
        }
    }
}

impl From<Vec<Bytes>> for Message {
    fn from(frames: Vec<Bytes>) -> Self {
        Self::from_frames(frames)
    }
}

impl From<Vec<&str>> for Message {
    fn from(frames: Vec<&str>) -> Self {
        frames.into_iter().map(|s| Bytes::copy_from_slice(s.as_bytes())).collect()
    }
}

impl From<&str> for Message {
    fn from(frame: &str) -> Self {
        Self::new().push_str(frame)
    }
}

impl From<String> for Message {
    fn from(frame: String) -> Self {
        Self::new().push(frame)
    }
}

impl From<Bytes> for Message {
    fn from(frame: Bytes) -> Self {
        Self::new().push(frame)
    }
}

impl From<Message> for Vec<Bytes> {
    fn from(msg: Message) -> Self {
        msg.into_frames()
    }
}

impl FromIterator<Bytes> for Message {
    fn from_iter<I: IntoIterator<Item = Bytes>>(iter: I) -> Self {
        Self {
            frames: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Message {
    type Item = Bytes;
    type IntoIter = smallvec::IntoIter<[Bytes; 4]>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_message() {
        let msg = Message::new();
        assert_eq!(msg.len(), 0);
        assert!(msg.is_empty());
    }

    #[test]
    fn test_build_message() {
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
    fn test_envelope_ops() {
        let mut msg = Message::new().push_empty().push_str("body");
        msg.push_front(Bytes::from_static(b"peer-1"));
        assert_eq!(msg.len(), 3);

        assert_eq!(msg.pop_front(), Some(Bytes::from_static(b"peer-1")));
        assert_eq!(msg.pop_front(), Some(Bytes::new()));
        assert_eq!(msg.pop_front(), Some(Bytes::from_static(b"body")));
        assert_eq!(msg.pop_front(), None);
    }

    #[test]
    fn test_spills_past_inline_capacity() {
        let msg: Message = (0..10u8).map(|i| Bytes::from(vec![i])).collect();
        assert_eq!(msg.len(), 10);
        assert_eq!(msg.frames()[9], Bytes::from(vec![9u8]));
    }
}
