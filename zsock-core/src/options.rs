//! Socket configuration options
//!
//! This module provides the native option set of a socket, similar to
//! libzmq's socket options (zmq_setsockopt/zmq_getsockopt). Setters follow
//! libzmq's side effects: configuring CURVE or PLAIN material switches the
//! security mechanism.

use crate::curve::{CurvePublicKey, CurveSecretKey};
use bytes::Bytes;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default high water mark for both directions.
pub const DEFAULT_HWM: usize = 1000;

/// Security mechanism (ZMQ_MECHANISM).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mechanism {
    /// No security (default)
    #[default]
    Null,
    /// Clear-text username/password
    Plain,
    /// CurveZMQ
    Curve,
    /// Kerberos
    Gssapi,
}

impl Mechanism {
    /// The mechanism name as it appears in the ZMTP greeting.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Plain => "PLAIN",
            Self::Curve => "CURVE",
            Self::Gssapi => "GSSAPI",
        }
    }
}

impl fmt::Display for Mechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mechanism {
    type Err = crate::error::NativeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_uppercase().as_str() {
            "NULL" => Self::Null,
            "PLAIN" => Self::Plain,
            "CURVE" => Self::Curve,
            "GSSAPI" => Self::Gssapi,
            _ => {
                return Err(crate::error::NativeError::invalid(format!(
                    "unknown mechanism {s:?}"
                )))
            }
        })
    }
}

/// Socket configuration options.
///
/// These options control socket behavior including timeouts, queue limits,
/// routing and security.
///
/// # Examples
///
/// ```
/// use zsock_core::options::SocketOptions;
/// use std::time::Duration;
///
/// let opts = SocketOptions::default()
///     .with_recv_timeout(Duration::from_secs(5))
///     .with_send_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketOptions {
    /// Receive timeout (ZMQ_RCVTIMEO)
    ///
    /// - `None`: Block indefinitely (default)
    /// - `Some(Duration::ZERO)`: Non-blocking (return immediately with EAGAIN)
    /// - `Some(duration)`: Wait up to duration before returning EAGAIN
    pub recv_timeout: Option<Duration>,

    /// Send timeout (ZMQ_SNDTIMEO)
    ///
    /// Same semantics as `recv_timeout`, applied while no peer can take the
    /// message.
    pub send_timeout: Option<Duration>,

    /// High water mark for receiving (ZMQ_RCVHWM). 0 means unbounded.
    pub recv_hwm: usize,

    /// High water mark for sending (ZMQ_SNDHWM). 0 means unbounded.
    ///
    /// PUB and XPUB drop messages for a subscriber whose queue is at the mark.
    pub send_hwm: usize,

    /// Socket identity / routing ID (ZMQ_ROUTING_ID)
    ///
    /// Identity a ROUTER peer knows this socket by. If None, the ROUTER
    /// assigns one.
    pub routing_id: Option<Bytes>,

    /// ROUTER mandatory mode (ZMQ_ROUTER_MANDATORY)
    ///
    /// - `false` (default): Silently drop messages to unknown peers
    /// - `true`: Return EHOSTUNREACH when sending to unknown peer
    pub router_mandatory: bool,

    /// Enable IPv6 (ZMQ_IPV6). Makes `tcp://*` bind the IPv6 any address.
    pub ipv6: bool,

    /// Active subscription prefixes (ZMQ_SUBSCRIBE / ZMQ_UNSUBSCRIBE)
    pub subscriptions: Vec<Bytes>,

    /// Security mechanism (ZMQ_MECHANISM, read-only in libzmq)
    pub mechanism: Mechanism,

    /// CURVE server role (ZMQ_CURVE_SERVER)
    pub curve_server: bool,

    /// Own long-term public key (ZMQ_CURVE_PUBLICKEY)
    pub curve_publickey: Option<CurvePublicKey>,

    /// Own long-term secret key (ZMQ_CURVE_SECRETKEY)
    pub curve_secretkey: Option<CurveSecretKey>,

    /// Server's long-term public key, client side (ZMQ_CURVE_SERVERKEY)
    pub curve_serverkey: Option<CurvePublicKey>,

    /// ZAP authentication domain (ZMQ_ZAP_DOMAIN)
    pub zap_domain: Option<String>,

    /// PLAIN server role (ZMQ_PLAIN_SERVER)
    pub plain_server: bool,

    /// PLAIN username (ZMQ_PLAIN_USERNAME)
    pub plain_username: Option<String>,

    /// PLAIN password (ZMQ_PLAIN_PASSWORD)
    pub plain_password: Option<String>,
}

impl Default for SocketOptions {
    fn default() -> Self {
        Self {
            recv_timeout: None, // Block indefinitely
            send_timeout: None, // Block indefinitely
            recv_hwm: DEFAULT_HWM,
            send_hwm: DEFAULT_HWM,
            routing_id: None,
            router_mandatory: false,
            ipv6: false,
            subscriptions: Vec::new(),
            mechanism: Mechanism::Null,
            curve_server: false,
            curve_publickey: None,
            curve_secretkey: None,
            curve_serverkey: None,
            zap_domain: None,
            plain_server: false,
            plain_username: None,
            plain_password: None,
        }
    }
}

impl SocketOptions {
    /// Create new socket options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set receive timeout.
    ///
    /// # Examples
    ///
    /// ```
    /// use zsock_core::options::SocketOptions;
    /// use std::time::Duration;
    ///
    /// // Non-blocking receive
    /// let opts = SocketOptions::new().with_recv_timeout(Duration::ZERO);
    /// assert!(opts.is_recv_nonblocking());
    /// ```
    pub fn with_recv_timeout(mut self, timeout: Duration) -> Self {
        self.recv_timeout = Some(timeout);
        self
    }

    /// Set send timeout.
    pub fn with_send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = Some(timeout);
        self
    }

    /// Set receive high water mark.
    pub fn with_recv_hwm(mut self, hwm: usize) -> Self {
        self.recv_hwm = hwm;
        self
    }

    /// Set send high water mark.
    pub fn with_send_hwm(mut self, hwm: usize) -> Self {
        self.send_hwm = hwm;
        self
    }

    /// Set socket routing ID / identity.
    ///
    /// # Examples
    ///
    /// ```
    /// use zsock_core::options::SocketOptions;
    /// use bytes::Bytes;
    ///
    /// let opts = SocketOptions::new()
    ///     .with_routing_id(Bytes::from_static(b"worker-01"));
    /// ```
    pub fn with_routing_id(mut self, id: Bytes) -> Self {
        self.routing_id = Some(id);
        self
    }

    /// Enable ROUTER mandatory mode.
    pub fn with_router_mandatory(mut self, enabled: bool) -> Self {
        self.router_mandatory = enabled;
        self
    }

    /// Enable IPv6.
    pub fn with_ipv6(mut self, enabled: bool) -> Self {
        self.ipv6 = enabled;
        self
    }

    /// Add a subscription prefix.
    pub fn with_subscription(mut self, prefix: impl Into<Bytes>) -> Self {
        self.subscribe(prefix);
        self
    }

    /// Set the ZAP domain.
    pub fn with_zap_domain(mut self, domain: impl Into<String>) -> Self {
        self.set_zap_domain(domain);
        self
    }

    /// Configure as a CURVE server with the given secret key.
    ///
    /// The public key is derived from the secret key.
    ///
    /// # Examples
    ///
    /// ```
    /// use zsock_core::curve::CurveKeyPair;
    /// use zsock_core::options::{Mechanism, SocketOptions};
    ///
    /// let keys = CurveKeyPair::generate();
    /// let opts = SocketOptions::new().with_curve_server(keys.secret);
    /// assert_eq!(opts.mechanism, Mechanism::Curve);
    /// assert_eq!(opts.curve_publickey, Some(keys.public));
    /// assert!(opts.curve_server);
    /// ```
    pub fn with_curve_server(mut self, secret: CurveSecretKey) -> Self {
        self.set_curve_publickey(secret.public_key());
        self.set_curve_secretkey(secret);
        self.set_curve_server(true);
        self
    }

    /// Configure as a CURVE client of the server with the given public key.
    ///
    /// The client's own public key is derived from its secret key.
    pub fn with_curve_client(mut self, secret: CurveSecretKey, server: CurvePublicKey) -> Self {
        self.set_curve_publickey(secret.public_key());
        self.set_curve_secretkey(secret);
        self.set_curve_serverkey(server);
        self
    }

    /// Configure PLAIN client credentials.
    pub fn with_plain_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.set_plain_username(username);
        self.set_plain_password(password);
        self
    }

    /// Check if receive operation should be non-blocking.
    pub fn is_recv_nonblocking(&self) -> bool {
        matches!(self.recv_timeout, Some(d) if d.is_zero())
    }

    /// Check if send operation should be non-blocking.
    pub fn is_send_nonblocking(&self) -> bool {
        matches!(self.send_timeout, Some(d) if d.is_zero())
    }

    /// Add a subscription prefix. An empty prefix matches everything.
    pub fn subscribe(&mut self, prefix: impl Into<Bytes>) {
        self.subscriptions.push(prefix.into());
    }

    /// Remove one matching subscription prefix, if present.
    pub fn unsubscribe(&mut self, prefix: &[u8]) {
        if let Some(pos) = self.subscriptions.iter().position(|p| p.as_ref() == prefix) {
            self.subscriptions.remove(pos);
        }
    }

    /// Check a message's first frame against the subscriptions.
    pub fn matches_subscription(&self, topic: &[u8]) -> bool {
        self.subscriptions
            .iter()
            .any(|prefix| topic.starts_with(prefix))
    }

    /// Set own CURVE public key; switches the mechanism to CURVE.
    pub fn set_curve_publickey(&mut self, key: CurvePublicKey) {
        self.curve_publickey = Some(key);
        self.mechanism = Mechanism::Curve;
    }

    /// Set own CURVE secret key; switches the mechanism to CURVE.
    ///
    /// The public key is not derived here, matching libzmq.
    pub fn set_curve_secretkey(&mut self, key: CurveSecretKey) {
        self.curve_secretkey = Some(key);
        self.mechanism = Mechanism::Curve;
    }

    /// Set the server's public key; makes this socket a CURVE client.
    pub fn set_curve_serverkey(&mut self, key: CurvePublicKey) {
        self.curve_serverkey = Some(key);
        self.curve_server = false;
        self.mechanism = Mechanism::Curve;
    }

    /// Set CURVE server role.
    ///
    /// Enabling switches the mechanism to CURVE; disabling falls back to NULL
    /// unless client key material is configured.
    pub fn set_curve_server(&mut self, enabled: bool) {
        self.curve_server = enabled;
        if enabled {
            self.mechanism = Mechanism::Curve;
        } else if self.curve_serverkey.is_none() && self.mechanism == Mechanism::Curve {
            self.mechanism = Mechanism::Null;
        }
    }

    /// Set ZAP domain. An empty domain clears it.
    pub fn set_zap_domain(&mut self, domain: impl Into<String>) {
        let domain = domain.into();
        self.zap_domain = (!domain.is_empty()).then_some(domain);
    }

    /// Set PLAIN server role.
    pub fn set_plain_server(&mut self, enabled: bool) {
        self.plain_server = enabled;
        if enabled {
            self.mechanism = Mechanism::Plain;
        } else if self.mechanism == Mechanism::Plain && self.plain_username.is_none() {
            self.mechanism = Mechanism::Null;
        }
    }

    /// Set PLAIN username; makes this socket a PLAIN client.
    pub fn set_plain_username(&mut self, username: impl Into<String>) {
        self.plain_username = Some(username.into());
        self.plain_server = false;
        self.mechanism = Mechanism::Plain;
    }

    /// Set PLAIN password; makes this socket a PLAIN client.
    pub fn set_plain_password(&mut self, password: impl Into<String>) {
        self.plain_password = Some(password.into());
        self.plain_server = false;
        self.mechanism = Mechanism::Plain;
    }

    /// Validate routing ID.
    ///
    /// Routing identities must:
    /// - Be 1-255 bytes long
    /// - Not start with null byte (0x00) which is reserved for auto-generated IDs
    pub fn validate_routing_id(id: &[u8]) -> crate::error::NativeResult<()> {
        if id.is_empty() {
            return Err(crate::error::NativeError::invalid("routing ID cannot be empty"));
        }

        if id.len() > 255 {
            return Err(crate::error::NativeError::invalid(format!(
                "routing ID cannot exceed 255 bytes (got {})",
                id.len()
            )));
        }

        if id[0] == 0x00 {
            return Err(crate::error::NativeError::invalid(
                "routing ID cannot start with null byte (reserved for auto-generated IDs)",
            ));
        }

        Ok(())
    }
}
