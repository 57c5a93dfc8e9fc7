//! Methods shared by every socket-like type.
//!
//! Signals are one-frame, 8-byte messages `0x77665544332211SS` where `SS` is
//! the status byte, compatible with CZMQ's `zsock_signal`/`zsock_wait`.

use crate::error::{Error, Result};
use crate::socket::NativeDelegate;
use bytes::Bytes;
use tracing::trace;

const SIGNAL_MAGIC: u64 = 0x7766_5544_3322_1100;

fn signal_frame(status: u8) -> Bytes {
    Bytes::copy_from_slice(&(SIGNAL_MAGIC | u64::from(status)).to_be_bytes())
}

/// Status byte of a signal message, `None` for anything else.
pub(crate) fn signal_status(frames: &[Bytes]) -> Option<u8> {
    match frames {
        [frame] if frame.len() == 8 => {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(frame);
            let value = u64::from_be_bytes(raw);
            ((value & !0xff) == SIGNAL_MAGIC).then_some(value as u8)
        }
        _ => None,
    }
}

/// Signalling and queue tuning.
pub trait PolymorphicZsockMethods: NativeDelegate {
    /// Send a signal carrying `status`.
    fn signal(&self, status: u8) -> Result<()> {
        self.delegate()
            .send(vec![signal_frame(status)])
            .map_err(|e| Error::from_transfer("signal", e))
    }

    /// Wait for a signal and return its status.
    ///
    /// Messages that are not signals are discarded.
    fn wait(&self) -> Result<u8> {
        loop {
            let frames = self
                .delegate()
                .recv()
                .map_err(|e| Error::from_transfer("wait", e))?;
            if let Some(status) = signal_status(&frames) {
                return Ok(status);
            }
            trace!("[WAIT] Discarding {}-frame message", frames.len());
        }
    }

    /// Remove both high water marks.
    fn set_unbounded(&self) {
        let mut options = self.delegate().options();
        options.send_hwm = 0;
        options.recv_hwm = 0;
    }
}
