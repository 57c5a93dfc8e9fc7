//! Native Error Codes
//!
//! The error vocabulary of the native socket layer. Every native operation
//! fails with a [`NativeError`] carrying one of these codes; the public
//! facade translates them into its own taxonomy.

use std::fmt;
use std::io;
use thiserror::Error;

/// Error codes reported by native socket calls (libzmq `errno` values).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Errno {
    /// Invalid argument (malformed endpoint, bad option value)
    Inval,
    /// Transport scheme unknown or not compiled in
    ProtoNoSupport,
    /// Transport not compatible with the socket type
    NoCompatProto,
    /// Address already bound by another socket
    AddrInUse,
    /// Address is not local / cannot be assigned
    AddrNotAvail,
    /// Interface named in the endpoint does not exist
    NoDev,
    /// Endpoint was never bound/connected on this socket
    NoEnt,
    /// Operation not supported by this socket type
    NotSup,
    /// Operation not valid in the socket's current state
    Fsm,
    /// Non-blocking mode requested and the operation would block, or timeout
    Again,
    /// Message is not routable (ROUTER mandatory mode)
    HostUnreach,
    /// The socket was terminated
    Term,
    /// Permission denied
    Acces,
    /// Any other I/O failure
    Io,
}

impl Errno {
    /// Symbolic name as used by libzmq.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inval => "EINVAL",
            Self::ProtoNoSupport => "EPROTONOSUPPORT",
            Self::NoCompatProto => "ENOCOMPATPROTO",
            Self::AddrInUse => "EADDRINUSE",
            Self::AddrNotAvail => "EADDRNOTAVAIL",
            Self::NoDev => "ENODEV",
            Self::NoEnt => "ENOENT",
            Self::NotSup => "ENOTSUP",
            Self::Fsm => "EFSM",
            Self::Again => "EAGAIN",
            Self::HostUnreach => "EHOSTUNREACH",
            Self::Term => "ETERM",
            Self::Acces => "EACCES",
            Self::Io => "EIO",
        }
    }

    /// Check if this code means the caller passed a bad argument.
    ///
    /// Unknown or incompatible transports count as argument errors: the
    /// caller handed over an endpoint that can never work.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::Inval | Self::ProtoNoSupport | Self::NoCompatProto)
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a native socket call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{errno}: {detail}")]
pub struct NativeError {
    /// The native error code
    pub errno: Errno,
    /// Human readable context
    pub detail: String,
}

/// Result type alias for native calls
pub type NativeResult<T> = std::result::Result<T, NativeError>;

impl NativeError {
    /// Create a native error with a code and context.
    pub fn new(errno: Errno, detail: impl Into<String>) -> Self {
        Self {
            errno,
            detail: detail.into(),
        }
    }

    /// Create an `EINVAL` error
    pub fn invalid(detail: impl Into<String>) -> Self {
        Self::new(Errno::Inval, detail)
    }

    /// Create an `ETERM` error for a destroyed socket
    pub fn terminated() -> Self {
        Self::new(Errno::Term, "socket is closed")
    }

    /// Create an `EAGAIN` error
    pub fn again(detail: impl Into<String>) -> Self {
        Self::new(Errno::Again, detail)
    }

    /// Create an `ENOTSUP` error
    pub fn not_supported(detail: impl Into<String>) -> Self {
        Self::new(Errno::NotSup, detail)
    }

    /// Check if this error is an argument error
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        self.errno.is_invalid_argument()
    }
}

impl From<io::Error> for NativeError {
    fn from(err: io::Error) -> Self {
        let errno = match err.kind() {
            io::ErrorKind::AddrInUse => Errno::AddrInUse,
            io::ErrorKind::AddrNotAvailable => Errno::AddrNotAvail,
            io::ErrorKind::PermissionDenied => Errno::Acces,
            io::ErrorKind::InvalidInput => Errno::Inval,
            io::ErrorKind::NotFound => Errno::NoEnt,
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => Errno::Again,
            _ => Errno::Io,
        };
        Self::new(errno, err.to_string())
    }
}
