//! Zsock Core
//!
//! This crate contains the runtime-agnostic building blocks shared by the
//! native layer and the socket facade:
//! - Endpoint grammar, formatter and attach shorthand (`endpoint`)
//! - Native error codes (`error`)
//! - Socket types and their compatibility rules (`socket_type`)
//! - Native socket options (`options`)
//! - CURVE keys and Z85 text encoding (`curve`, `z85`)
//! - Multipart messages (`message`)
//! - Lifecycle events (`monitor`)

#![cfg_attr(not(test), deny(unsafe_code))]
// Allow some pedantic lints that are intentional in this crate
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::new_without_default)]
pub mod curve;
pub mod endpoint;
pub mod error;
pub mod message;
pub mod monitor;
pub mod options;
pub mod socket_type;
pub mod z85;

/// Commonly used core types.
pub mod prelude {
    pub use crate::curve::{CurveKeyPair, CurvePublicKey, CurveSecretKey};
    pub use crate::endpoint::{format_endpoint, parse_attach, AttachMode, Endpoint};
    pub use crate::error::{Errno, NativeError, NativeResult};
    pub use crate::message::Message;
    pub use crate::monitor::{SocketEvent, SocketMonitor};
    pub use crate::options::{Mechanism, SocketOptions};
    pub use crate::socket_type::SocketType;
}
