//! Zsock Native
//!
//! Reference implementation of the native socket layer that the `zsock`
//! facade delegates to.
//!
//! - The native contract (`delegate`)
//! - Process-wide registry of bound endpoints (`fabric`)
//! - OS listener reservation for TCP and IPC binds (`listener`)
//! - The socket handle with per-type routing (`zsock`)
//!
//! Sockets in the same process are linked directly: a connect finds the
//! bound socket through the fabric and messages move between their inboxes.
//! ZMTP framing and the CURVE handshake cryptography are not implemented;
//! security is checked as mechanism negotiation when two sockets link.

#![cfg_attr(not(test), deny(unsafe_code))]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::new_without_default)]

pub mod delegate;
pub mod fabric;
mod listener;
pub mod zsock;

pub use delegate::ZsockDelegate;
pub use fabric::Address;
pub use zsock::Zsock;
