//! Zsock Error Types
//!
//! Native error codes are translated into this taxonomy at the facade
//! boundary and nowhere else.

use thiserror::Error;
use zsock_core::curve::KeyError;
use zsock_core::error::{Errno, NativeError};
use zsock_core::socket_type::SocketType;

/// Main error type for socket operations
#[derive(Error, Debug)]
pub enum Error {
    /// The native layer could not create or attach the socket
    #[error("could not create {socket_type} socket: {source}")]
    Initialization {
        socket_type: SocketType,
        #[source]
        source: NativeError,
    },

    /// The endpoint was rejected as malformed or unsupported
    #[error("invalid endpoint {endpoint:?}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: NativeError,
    },

    /// A well-formed endpoint could not be bound (e.g. address in use)
    #[error("unable to bind to {endpoint:?}: {source}")]
    Bind {
        endpoint: String,
        #[source]
        source: NativeError,
    },

    /// Any other native failure of a socket operation
    #[error("{op} failed: {source}")]
    Operation {
        op: &'static str,
        endpoint: Option<String>,
        #[source]
        source: NativeError,
    },

    /// The socket has been closed
    #[error("socket is closed")]
    Closed,

    /// The configured send or receive timeout expired
    #[error("operation timed out")]
    TimedOut,

    /// Malformed CURVE key material
    #[error("invalid key: {0}")]
    Key(#[from] KeyError),
}

/// Result type alias for socket operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if the caller handed over a bad argument.
    #[must_use]
    pub fn is_argument_error(&self) -> bool {
        match self {
            Self::InvalidEndpoint { .. } | Self::Key(_) => true,
            Self::Initialization { source, .. } => source.is_invalid_argument(),
            _ => false,
        }
    }

    /// Check if this error concerns an endpoint.
    #[must_use]
    pub fn is_endpoint_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidEndpoint { .. }
                | Self::Bind { .. }
                | Self::Operation {
                    endpoint: Some(_),
                    ..
                }
        )
    }

    /// The native code behind this error, if there is one.
    #[must_use]
    pub fn errno(&self) -> Option<Errno> {
        match self {
            Self::Initialization { source, .. }
            | Self::InvalidEndpoint { source, .. }
            | Self::Bind { source, .. }
            | Self::Operation { source, .. } => Some(source.errno),
            Self::Closed => Some(Errno::Term),
            Self::TimedOut => Some(Errno::Again),
            Self::Key(_) => None,
        }
    }

    pub(crate) fn from_bind(endpoint: String, source: NativeError) -> Self {
        match source.errno {
            Errno::Term => Self::Closed,
            e if e.is_invalid_argument() => Self::InvalidEndpoint { endpoint, source },
            _ => Self::Bind { endpoint, source },
        }
    }

    pub(crate) fn from_endpoint_op(op: &'static str, endpoint: String, source: NativeError) -> Self {
        match source.errno {
            Errno::Term => Self::Closed,
            e if e.is_invalid_argument() => Self::InvalidEndpoint { endpoint, source },
            _ => Self::Operation {
                op,
                endpoint: Some(endpoint),
                source,
            },
        }
    }

    pub(crate) fn from_transfer(op: &'static str, source: NativeError) -> Self {
        match source.errno {
            Errno::Term => Self::Closed,
            Errno::Again => Self::TimedOut,
            _ => Self::Operation {
                op,
                endpoint: None,
                source,
            },
        }
    }
}
