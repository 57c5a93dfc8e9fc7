//! Socket event monitoring.
//!
//! Provides event streams for tracking socket lifecycle events like
//! binds, peer links and refused handshakes.

use std::fmt;

/// Socket lifecycle events. Endpoints are the resolved endpoint strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEvent {
    /// Socket successfully bound to an endpoint.
    Bound(String),

    /// Bind operation failed.
    BindFailed { endpoint: String, reason: String },

    /// Socket linked to a bound peer.
    Connected(String),

    /// Connect is parked until somebody binds the endpoint.
    ConnectDelayed(String),

    /// A connecting peer was linked to one of our bindings.
    Accepted(String),

    /// A peer link was removed.
    Disconnected(String),

    /// A peer link was refused (incompatible type, exclusive PAIR, security).
    HandshakeFailed { endpoint: String, reason: String },

    /// Socket was closed.
    Closed,
}

impl fmt::Display for SocketEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bound(ep) => write!(f, "Bound to {ep}"),
            Self::BindFailed { endpoint, reason } => {
                write!(f, "Bind failed for {endpoint}: {reason}")
            }
            Self::Connected(ep) => write!(f, "Connected to {ep}"),
            Self::ConnectDelayed(ep) => write!(f, "Connect delayed for {ep}"),
            Self::Accepted(ep) => write!(f, "Accepted connection on {ep}"),
            Self::Disconnected(ep) => write!(f, "Disconnected from {ep}"),
            Self::HandshakeFailed { endpoint, reason } => {
                write!(f, "Handshake failed on {endpoint}: {reason}")
            }
            Self::Closed => f.write_str("Closed"),
        }
    }
}

/// Handle for receiving socket events.
pub type SocketMonitor = flume::Receiver<SocketEvent>;

/// Sender half used by socket implementations to emit events.
pub type SocketEventSender = flume::Sender<SocketEvent>;

/// Creates a new monitoring channel pair.
#[must_use]
pub fn create_monitor() -> (SocketEventSender, SocketMonitor) {
    flume::unbounded()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_event_display() {
        let event = SocketEvent::Connected("tcp://127.0.0.1:5555".into());
        assert_eq!(event.to_string(), "Connected to tcp://127.0.0.1:5555");

        let event = SocketEvent::HandshakeFailed {
            endpoint: "inproc://x".into(),
            reason: "server key mismatch".into(),
        };
        assert_eq!(
            event.to_string(),
            "Handshake failed on inproc://x: server key mismatch"
        );
    }

    #[test]
    fn test_monitor_channel() {
        let (sender, receiver) = create_monitor();
        sender.send(SocketEvent::Bound("inproc://x".into())).unwrap();

        let event = receiver.recv().unwrap();
        assert_eq!(event, SocketEvent::Bound("inproc://x".into()));
    }
}
