//! Socket type enumeration for ZeroMQ socket types.
//!
//! This module provides the `SocketType` enum which represents the different
//! types of ZeroMQ sockets, together with the per-type facts the native layer
//! and the constructors need: attach defaults, direction, and peer
//! compatibility.

use std::fmt;
use std::str::FromStr;

/// ZeroMQ socket types.
///
/// Corresponds to ZMQ_TYPE socket option (16).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SocketType {
    /// PAIR socket for exclusive bidirectional communication
    Pair = 0,

    /// PUB socket for publishing messages to subscribers
    Pub = 1,

    /// SUB socket for subscribing to published messages
    Sub = 2,

    /// REQ socket for synchronous request-reply client
    Req = 3,

    /// REP socket for synchronous request-reply server
    Rep = 4,

    /// DEALER socket for asynchronous request-reply patterns
    Dealer = 5,

    /// ROUTER socket for routing messages by identity
    Router = 6,

    /// PULL socket for receiving messages from pushers
    Pull = 7,

    /// PUSH socket for sending messages to pullers
    Push = 8,

    /// XPUB socket for extended publisher with subscription awareness
    XPub = 9,

    /// XSUB socket for extended subscriber with dynamic subscriptions
    XSub = 10,

    /// STREAM socket for raw connections
    Stream = 11,
}

impl SocketType {
    /// Get the socket type as a string name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pair => "PAIR",
            Self::Pub => "PUB",
            Self::Sub => "SUB",
            Self::Req => "REQ",
            Self::Rep => "REP",
            Self::Dealer => "DEALER",
            Self::Router => "ROUTER",
            Self::Pull => "PULL",
            Self::Push => "PUSH",
            Self::XPub => "XPUB",
            Self::XSub => "XSUB",
            Self::Stream => "STREAM",
        }
    }

    /// Whether a bare endpoint handed to the constructor is bound.
    ///
    /// Server-ish types (REP, ROUTER, PUB, XPUB, PULL) bind by default,
    /// everything else connects.
    pub fn binds_by_default(&self) -> bool {
        matches!(
            self,
            Self::Rep | Self::Router | Self::Pub | Self::XPub | Self::Pull
        )
    }

    /// Whether messages can be sent on this socket type.
    pub fn can_send(&self) -> bool {
        !matches!(self, Self::Sub | Self::Pull)
    }

    /// Whether messages can be received on this socket type.
    pub fn can_recv(&self) -> bool {
        !matches!(self, Self::Pub | Self::Push)
    }

    /// Check if this socket type is compatible with the given peer type.
    pub fn is_compatible(&self, peer: SocketType) -> bool {
        matches!(
            (self, peer),
            (Self::Pair, Self::Pair)
                | (Self::Pub, Self::Sub)
                | (Self::Sub, Self::Pub)
                | (Self::Pub, Self::XSub)
                | (Self::XSub, Self::Pub)
                | (Self::XPub, Self::Sub)
                | (Self::Sub, Self::XPub)
                | (Self::Req, Self::Rep)
                | (Self::Rep, Self::Req)
                | (Self::Req, Self::Router)
                | (Self::Router, Self::Req)
                | (Self::Dealer, Self::Rep)
                | (Self::Rep, Self::Dealer)
                | (Self::Dealer, Self::Router)
                | (Self::Router, Self::Dealer)
                | (Self::Dealer, Self::Dealer)
                | (Self::Router, Self::Router)
                | (Self::Push, Self::Pull)
                | (Self::Pull, Self::Push)
                | (Self::XPub, Self::XSub)
                | (Self::XSub, Self::XPub)
                | (Self::Stream, Self::Stream)
        )
    }
}

impl fmt::Display for SocketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a socket type name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown socket type: {0}")]
pub struct UnknownSocketType(pub String);

impl FromStr for SocketType {
    type Err = UnknownSocketType;

    /// Parse a socket type name, case-insensitively (`"rep"`, `"REP"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_uppercase().as_str() {
            "PAIR" => Self::Pair,
            "PUB" => Self::Pub,
            "SUB" => Self::Sub,
            "REQ" => Self::Req,
            "REP" => Self::Rep,
            "DEALER" => Self::Dealer,
            "ROUTER" => Self::Router,
            "PULL" => Self::Pull,
            "PUSH" => Self::Push,
            "XPUB" => Self::XPub,
            "XSUB" => Self::XSub,
            "STREAM" => Self::Stream,
            _ => return Err(UnknownSocketType(s.to_string())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_type_display() {
        assert_eq!(SocketType::Dealer.to_string(), "DEALER");
        assert_eq!(SocketType::Router.to_string(), "ROUTER");
        assert_eq!(SocketType::Pub.to_string(), "PUB");
    }

    #[test]
    fn test_socket_type_from_str() {
        assert_eq!("rep".parse::<SocketType>().unwrap(), SocketType::Rep);
        assert_eq!("XPUB".parse::<SocketType>().unwrap(), SocketType::XPub);
        assert!("CLIENT".parse::<SocketType>().is_err());
    }

    #[test]
    fn test_socket_compatibility() {
        assert!(SocketType::Req.is_compatible(SocketType::Rep));
        assert!(SocketType::Rep.is_compatible(SocketType::Req));
        assert!(SocketType::Dealer.is_compatible(SocketType::Router));
        assert!(SocketType::Router.is_compatible(SocketType::Dealer));
        assert!(SocketType::Push.is_compatible(SocketType::Pull));
        assert!(SocketType::Pub.is_compatible(SocketType::Sub));
        assert!(SocketType::XPub.is_compatible(SocketType::XSub));

        // Incompatible pairs
        assert!(!SocketType::Req.is_compatible(SocketType::Dealer));
        assert!(!SocketType::Pub.is_compatible(SocketType::Pull));
        assert!(!SocketType::Pair.is_compatible(SocketType::Rep));
    }

    #[test]
    fn test_attach_defaults() {
        assert!(SocketType::Rep.binds_by_default());
        assert!(SocketType::Pub.binds_by_default());
        assert!(!SocketType::Req.binds_by_default());
        assert!(!SocketType::Pair.binds_by_default());
        assert!(!SocketType::Sub.binds_by_default());
    }

    #[test]
    fn test_direction() {
        assert!(!SocketType::Pub.can_recv());
        assert!(!SocketType::Sub.can_send());
        assert!(SocketType::Pair.can_send() && SocketType::Pair.can_recv());
    }
}
