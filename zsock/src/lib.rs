//! # Zsock
//!
//! ZeroMQ-style sockets with a small, safe facade.
//!
//! A [`Socket`] wraps one native socket handle. The facade checks for closed
//! sockets, hands endpoints to the native layer as plain arguments of a fixed
//! template (so `%s` or `{}` inside an endpoint is never interpreted), and
//! translates native error codes into [`Error`].
//!
//! ## Features
//!
//! - **All ZeroMQ socket types**: PAIR, PUB/SUB, REQ/REP, DEALER/ROUTER,
//!   PUSH/PULL, XPUB/XSUB, STREAM
//! - **Endpoint shorthand**: `"@tcp://*:*"` binds, `">inproc://x"` connects
//! - **Ephemeral ports**: bind `tcp://host:*` and read [`Socket::last_tcp_port`]
//! - **CURVE configuration**: [`Socket::make_secure_server`] and
//!   [`Socket::make_secure_client`], [`Certificate`]
//! - **Live options**: [`ZsockOptions::options`] reads and writes the native
//!   values directly
//!
//! ## Quick Start
//!
//! ```rust
//! use zsock::prelude::*;
//!
//! # fn main() -> zsock::Result<()> {
//! let server = Socket::new_rep("@tcp://127.0.0.1:*")?;
//! let port = server.last_tcp_port().expect("tcp bind");
//!
//! let client = Socket::new_req(&format!(">tcp://127.0.0.1:{port}"))?;
//! client.send("Hello")?;
//!
//! let request = server.receive()?;
//! assert_eq!(request.frames()[0], "Hello");
//! server.send("World")?;
//!
//! assert_eq!(client.receive()?.frames()[0], "World");
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate layout
//!
//! - `zsock-core`: endpoint grammar, native error codes, options, keys
//! - `zsock-native`: the native socket layer this facade delegates to
//! - `zsock` (this crate): the public facade

#![cfg_attr(not(test), deny(unsafe_code))]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod certificate;
pub mod dev_tracing;
pub mod error;
pub mod options;
pub mod polymorphic;
pub mod send_receive;
pub mod socket;

pub use certificate::Certificate;
pub use error::{Error, Result};
pub use options::{OptionsAccessor, ZsockOptions};
pub use polymorphic::PolymorphicZsockMethods;
pub use send_receive::SendReceive;
pub use socket::{NativeDelegate, Socket};

pub use zsock_core::curve::{CurveKeyPair, CurvePublicKey, CurveSecretKey, KeyError};
pub use zsock_core::error::{Errno, NativeError};
pub use zsock_core::message::Message;
pub use zsock_core::monitor::{SocketEvent, SocketMonitor};
pub use zsock_core::options::{Mechanism, SocketOptions};
pub use zsock_core::socket_type::SocketType;
pub use zsock_native::ZsockDelegate;

/// Convenient imports.
///
/// ```rust
/// use zsock::prelude::*;
///
/// let socket = Socket::new_by_type(SocketType::Pair);
/// assert_eq!(socket.options().mechanism(), Mechanism::Null);
/// ```
pub mod prelude {
    pub use crate::{
        Certificate, CurveKeyPair, CurvePublicKey, CurveSecretKey, Error, Mechanism, Message,
        PolymorphicZsockMethods, SendReceive, Socket, SocketEvent, SocketOptions, SocketType,
        ZsockOptions,
    };
    pub use bytes::Bytes;
}
