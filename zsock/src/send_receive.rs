//! Message transfer.

use crate::error::{Error, Result};
use crate::socket::NativeDelegate;
use tracing::trace;
use zsock_core::message::Message;

/// Sending and receiving multipart messages.
///
/// Both calls transfer ownership of the message. `receive` blocks the calling
/// thread until a message arrives, the receive timeout expires or the socket
/// is closed.
pub trait SendReceive: NativeDelegate {
    /// Send a message.
    ///
    /// # Errors
    ///
    /// - [`Error::Closed`] if the socket is closed
    /// - [`Error::TimedOut`] if the send timeout expired without a peer
    fn send(&self, message: impl Into<Message>) -> Result<()> {
        let delegate = self.delegate();
        if delegate.is_destroyed() {
            return Err(Error::Closed);
        }
        let message: Message = message.into();
        let frames = message.into_frames();
        trace!("[SEND] {} frames", frames.len());
        delegate
            .send(frames)
            .map_err(|e| Error::from_transfer("send", e))
    }

    /// Receive the next message.
    ///
    /// # Errors
    ///
    /// - [`Error::Closed`] if the socket is or gets closed
    /// - [`Error::TimedOut`] if the receive timeout expired
    fn receive(&self) -> Result<Message> {
        let delegate = self.delegate();
        if delegate.is_destroyed() {
            return Err(Error::Closed);
        }
        let frames = delegate
            .recv()
            .map_err(|e| Error::from_transfer("receive", e))?;
        trace!("[RECV] {} frames", frames.len());
        Ok(Message::from_frames(frames))
    }
}
