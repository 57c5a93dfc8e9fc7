//! The socket facade.
//!
//! [`Socket`] owns exactly one native handle and forwards every operation to
//! it. Its own work is limited to closed checks, endpoint formatting, error
//! translation and remembering the last bound TCP port.

use crate::error::{Error, Result};
use crate::options::ZsockOptions;
use crate::polymorphic::PolymorphicZsockMethods;
use crate::send_receive::SendReceive;
use bytes::Bytes;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, trace};
use zsock_core::curve::{CurvePublicKey, CurveSecretKey};
use zsock_core::endpoint::{format_endpoint, parse_attach, tcp_port, AttachMode};
use zsock_core::error::Errno;
use zsock_core::monitor::SocketMonitor;
use zsock_core::options::SocketOptions;
use zsock_core::socket_type::SocketType;
use zsock_native::{Zsock, ZsockDelegate};

/// Access to the native handle behind a facade object.
pub trait NativeDelegate {
    /// The native delegate all operations are forwarded to.
    fn delegate(&self) -> &dyn ZsockDelegate;
}

/// A ZeroMQ-style socket.
///
/// Endpoints are `<transport>://<address>` strings (`tcp`, `ipc`, `inproc`).
/// Anything implementing `Display` is accepted; it is always handed to the
/// native layer as a plain argument, never as a format template.
///
/// # Example
///
/// ```rust
/// use zsock::prelude::*;
///
/// # fn main() -> zsock::Result<()> {
/// let rep = Socket::new_rep("@inproc://doc-socket")?;
/// let req = Socket::new_req(">inproc://doc-socket")?;
///
/// req.send("ping")?;
/// let request = rep.receive()?;
/// assert_eq!(request.frames()[0], "ping");
///
/// rep.send("pong")?;
/// assert_eq!(req.receive()?.frames()[0], "pong");
/// # Ok(())
/// # }
/// ```
pub struct Socket {
    delegate: Box<dyn ZsockDelegate>,
    last_tcp_port: Mutex<Option<u16>>,
    closed: AtomicBool,
}

impl Socket {
    /// Create a socket and attach it to the given endpoints.
    ///
    /// `endpoints` is a comma-separated list. Endpoints prefixed with `@` are
    /// bound, those prefixed with `>` are connected, and bare endpoints use
    /// the type's default (bind for server-like types). An empty string
    /// creates an unattached socket.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Initialization`] if any endpoint cannot be attached.
    pub fn new(socket_type: SocketType, endpoints: &str) -> Result<Self> {
        Self::with_options(socket_type, SocketOptions::default(), endpoints)
    }

    /// Create an unattached socket.
    pub fn new_by_type(socket_type: SocketType) -> Self {
        Self::from_delegate(Box::new(Zsock::new(socket_type)))
    }

    /// Create a socket with options applied before any endpoint is attached.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Initialization`] if any endpoint cannot be attached.
    pub fn with_options(
        socket_type: SocketType,
        options: SocketOptions,
        endpoints: &str,
    ) -> Result<Self> {
        let socket = Self::from_delegate(Box::new(Zsock::with_options(socket_type, options)));
        socket.attach(endpoints)?;
        Ok(socket)
    }

    /// Wrap an existing native handle.
    pub fn from_delegate(delegate: Box<dyn ZsockDelegate>) -> Self {
        trace!("[SOCKET] Wrapping {} delegate", delegate.socket_type());
        Self {
            delegate,
            last_tcp_port: Mutex::new(None),
            closed: AtomicBool::new(false),
        }
    }

    fn attach(&self, endpoints: &str) -> Result<()> {
        let socket_type = self.socket_type();
        for (mode, endpoint) in parse_attach(endpoints, socket_type.binds_by_default()) {
            let result = match mode {
                AttachMode::Bind => self.delegate.bind(format_args!("{}", endpoint)),
                AttachMode::Connect => self.delegate.connect(format_args!("{}", endpoint)),
            };
            if let Err(source) = result {
                debug!(
                    "[SOCKET] {} {:?} {} failed: {}",
                    socket_type, mode, endpoint, source
                );
                return Err(Error::Initialization {
                    socket_type,
                    source,
                });
            }
            if mode == AttachMode::Bind {
                self.record_last_port();
            }
        }
        Ok(())
    }

    /// Create a REQ socket, default attach is connect.
    pub fn new_req(endpoints: &str) -> Result<Self> {
        Self::new(SocketType::Req, endpoints)
    }

    /// Create a REP socket, default attach is bind.
    pub fn new_rep(endpoints: &str) -> Result<Self> {
        Self::new(SocketType::Rep, endpoints)
    }

    /// Create a PAIR socket, default attach is connect.
    pub fn new_pair(endpoints: &str) -> Result<Self> {
        Self::new(SocketType::Pair, endpoints)
    }

    /// Create a PUB socket, default attach is bind.
    pub fn new_pub(endpoints: &str) -> Result<Self> {
        Self::new(SocketType::Pub, endpoints)
    }

    /// Create a SUB socket, optionally subscribed to a prefix.
    ///
    /// The subscription is in place before any endpoint is attached.
    pub fn new_sub(endpoints: &str, subscription: Option<&[u8]>) -> Result<Self> {
        let mut options = SocketOptions::default();
        if let Some(prefix) = subscription {
            options.subscribe(Bytes::copy_from_slice(prefix));
        }
        Self::with_options(SocketType::Sub, options, endpoints)
    }

    /// Create a DEALER socket, default attach is connect.
    pub fn new_dealer(endpoints: &str) -> Result<Self> {
        Self::new(SocketType::Dealer, endpoints)
    }

    /// Create a ROUTER socket, default attach is bind.
    pub fn new_router(endpoints: &str) -> Result<Self> {
        Self::new(SocketType::Router, endpoints)
    }

    /// Create a PUSH socket, default attach is connect.
    pub fn new_push(endpoints: &str) -> Result<Self> {
        Self::new(SocketType::Push, endpoints)
    }

    /// Create a PULL socket, default attach is bind.
    pub fn new_pull(endpoints: &str) -> Result<Self> {
        Self::new(SocketType::Pull, endpoints)
    }

    /// Create an XPUB socket, default attach is bind.
    pub fn new_xpub(endpoints: &str) -> Result<Self> {
        Self::new(SocketType::XPub, endpoints)
    }

    /// Create an XSUB socket, default attach is connect.
    pub fn new_xsub(endpoints: &str) -> Result<Self> {
        Self::new(SocketType::XSub, endpoints)
    }

    /// Create a STREAM socket, default attach is connect.
    pub fn new_stream(endpoints: &str) -> Result<Self> {
        Self::new(SocketType::Stream, endpoints)
    }

    /// The socket type.
    pub fn socket_type(&self) -> SocketType {
        self.delegate.socket_type()
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            Err(Error::Closed)
        } else {
            Ok(())
        }
    }

    fn record_last_port(&self) {
        let port = self.delegate.last_endpoint().as_deref().and_then(tcp_port);
        *self.last_tcp_port.lock() = port;
    }

    /// Bind to an endpoint.
    ///
    /// On success the resolved endpoint is available from
    /// [`last_endpoint`](Self::last_endpoint). For TCP binds the assigned port
    /// (useful with `tcp://host:*`) is available from
    /// [`last_tcp_port`](Self::last_tcp_port); other transports clear it.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidEndpoint`] for malformed or unsupported endpoints
    /// - [`Error::Bind`] when a well-formed endpoint cannot be bound
    pub fn bind(&self, endpoint: impl fmt::Display) -> Result<()> {
        self.ensure_open()?;
        self.delegate
            .bind(format_args!("{}", endpoint))
            .map_err(|e| Error::from_bind(format_endpoint(&endpoint), e))?;
        self.record_last_port();
        debug!("[SOCKET] {} bound to {}", self.socket_type(), endpoint);
        Ok(())
    }

    /// Connect to an endpoint.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidEndpoint`] for malformed or unsupported endpoints
    /// - [`Error::Operation`] for any other native failure
    pub fn connect(&self, endpoint: impl fmt::Display) -> Result<()> {
        self.ensure_open()?;
        self.delegate
            .connect(format_args!("{}", endpoint))
            .map_err(|e| Error::from_endpoint_op("connect", format_endpoint(&endpoint), e))?;
        debug!("[SOCKET] {} connected to {}", self.socket_type(), endpoint);
        Ok(())
    }

    /// Unbind from an endpoint.
    ///
    /// Unbinding an endpoint this socket never bound is a no-op.
    pub fn unbind(&self, endpoint: impl fmt::Display) -> Result<()> {
        self.ensure_open()?;
        match self.delegate.unbind(format_args!("{}", endpoint)) {
            Ok(()) => Ok(()),
            Err(e) if e.errno == Errno::NoEnt => {
                debug!("[SOCKET] unbind {}: not bound, ignoring", endpoint);
                Ok(())
            }
            Err(e) => Err(Error::from_endpoint_op(
                "unbind",
                format_endpoint(&endpoint),
                e,
            )),
        }
    }

    /// Disconnect from an endpoint.
    ///
    /// Disconnecting from an endpoint this socket never connected to is a
    /// no-op.
    pub fn disconnect(&self, endpoint: impl fmt::Display) -> Result<()> {
        self.ensure_open()?;
        match self.delegate.disconnect(format_args!("{}", endpoint)) {
            Ok(()) => Ok(()),
            Err(e) if e.errno == Errno::NoEnt => {
                debug!("[SOCKET] disconnect {}: not connected, ignoring", endpoint);
                Ok(())
            }
            Err(e) => Err(Error::from_endpoint_op(
                "disconnect",
                format_endpoint(&endpoint),
                e,
            )),
        }
    }

    /// The last endpoint bound, as resolved by the native layer.
    pub fn last_endpoint(&self) -> Option<String> {
        self.delegate.last_endpoint()
    }

    /// The port of the last TCP bind. `None` if the last bind was not TCP.
    pub fn last_tcp_port(&self) -> Option<u16> {
        *self.last_tcp_port.lock()
    }

    /// Subscribe to messages starting with `prefix` (SUB and XSUB only).
    pub fn subscribe(&self, prefix: impl Into<Bytes>) -> Result<()> {
        self.check_subscriber("subscribe")?;
        self.delegate.options().subscribe(prefix);
        Ok(())
    }

    /// Remove a subscription (SUB and XSUB only).
    pub fn unsubscribe(&self, prefix: &[u8]) -> Result<()> {
        self.check_subscriber("unsubscribe")?;
        self.delegate.options().unsubscribe(prefix);
        Ok(())
    }

    fn check_subscriber(&self, op: &'static str) -> Result<()> {
        self.ensure_open()?;
        match self.socket_type() {
            SocketType::Sub | SocketType::XSub => Ok(()),
            other => Err(Error::Operation {
                op,
                endpoint: None,
                source: zsock_core::error::NativeError::invalid(format!(
                    "{other} sockets have no subscriptions"
                )),
            }),
        }
    }

    /// Receive lifecycle events. Replaces any previous monitor.
    pub fn monitor(&self) -> SocketMonitor {
        self.delegate.monitor()
    }

    /// Configure as CURVE server.
    ///
    /// Sets the secret key and its public key, enables the CURVE server role
    /// and sets the ZAP domain.
    pub fn make_secure_server(&self, secret_key: &CurveSecretKey, zap_domain: &str) -> Result<()> {
        self.ensure_open()?;
        let options = self.options();
        options.set_zap_domain(zap_domain);
        options.set_curve_server(true);
        options.set_curve_secretkey(secret_key.clone());
        options.set_curve_publickey(secret_key.public_key());
        debug!("[SOCKET] {} is a CURVE server", self.socket_type());
        Ok(())
    }

    /// Configure as CURVE client of the server with `server_public_key`.
    pub fn make_secure_client(
        &self,
        secret_key: &CurveSecretKey,
        server_public_key: &CurvePublicKey,
    ) -> Result<()> {
        self.ensure_open()?;
        let options = self.options();
        options.set_curve_secretkey(secret_key.clone());
        options.set_curve_publickey(secret_key.public_key());
        options.set_curve_serverkey(*server_public_key);
        debug!("[SOCKET] {} is a CURVE client", self.socket_type());
        Ok(())
    }

    /// Close the socket and release the native handle.
    ///
    /// Closing twice is a no-op. A thread blocked in `receive` on this socket
    /// returns [`Error::Closed`].
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        if !self.delegate.is_destroyed() {
            self.delegate.destroy();
        }
        debug!("[SOCKET] {} closed", self.socket_type());
    }
}

impl NativeDelegate for Socket {
    fn delegate(&self) -> &dyn ZsockDelegate {
        self.delegate.as_ref()
    }
}

impl ZsockOptions for Socket {}

impl SendReceive for Socket {}

impl PolymorphicZsockMethods for Socket {}

impl fmt::Debug for Socket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Socket")
            .field("socket_type", &self.socket_type())
            .field("last_endpoint", &self.last_endpoint())
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Drop for Socket {
    fn drop(&mut self) {
        self.close();
    }
}
