//! The native socket contract.
//!
//! [`ZsockDelegate`] is the boundary between the safe facade and whatever
//! owns the actual socket. Endpoint-taking calls receive pre-built
//! [`fmt::Arguments`]: the caller chooses the template, so endpoint text
//! supplied by users can only ever be an argument.

use bytes::Bytes;
use parking_lot::MutexGuard;
use std::fmt;
use zsock_core::error::NativeResult;
use zsock_core::monitor::SocketMonitor;
use zsock_core::options::SocketOptions;
use zsock_core::socket_type::SocketType;

/// Operations a native socket handle provides.
///
/// Implementations must be safe to share across threads: `destroy` may be
/// called from one thread while another is blocked in `recv`, and must wake
/// it with `ETERM`.
pub trait ZsockDelegate: fmt::Debug + Send + Sync {
    /// The socket type fixed at creation.
    fn socket_type(&self) -> SocketType;

    /// Bind to an endpoint (`zsock_bind`).
    fn bind(&self, endpoint: fmt::Arguments<'_>) -> NativeResult<()>;

    /// Connect to an endpoint (`zsock_connect`).
    fn connect(&self, endpoint: fmt::Arguments<'_>) -> NativeResult<()>;

    /// Remove a binding (`zsock_unbind`). `ENOENT` if it was never bound.
    fn unbind(&self, endpoint: fmt::Arguments<'_>) -> NativeResult<()>;

    /// Remove a connection (`zsock_disconnect`). `ENOENT` if it was never connected.
    fn disconnect(&self, endpoint: fmt::Arguments<'_>) -> NativeResult<()>;

    /// The resolved endpoint of the most recent successful bind.
    fn last_endpoint(&self) -> Option<String>;

    /// Send a multipart message, taking ownership of the frames.
    fn send(&self, frames: Vec<Bytes>) -> NativeResult<()>;

    /// Block until a multipart message arrives.
    fn recv(&self) -> NativeResult<Vec<Bytes>>;

    /// Lock the native option set for reading or writing.
    fn options(&self) -> MutexGuard<'_, SocketOptions>;

    /// Start a new lifecycle event stream, replacing any previous one.
    fn monitor(&self) -> SocketMonitor;

    /// Release the native socket. Idempotent.
    fn destroy(&self);

    /// Whether `destroy` has run.
    fn is_destroyed(&self) -> bool;
}
