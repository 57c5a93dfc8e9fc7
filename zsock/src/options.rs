//! Option accessor.
//!
//! [`OptionsAccessor`] is a view of one socket's native options. Every getter
//! reads the current native value and every setter writes through
//! immediately, including the native side effects (e.g. setting a CURVE key
//! switches the mechanism to CURVE).

use crate::error::{Error, Result};
use crate::socket::NativeDelegate;
use bytes::Bytes;
use std::fmt;
use std::time::Duration;
use zsock_core::curve::{CurvePublicKey, CurveSecretKey};
use zsock_core::options::{Mechanism, SocketOptions};
use zsock_native::ZsockDelegate;

/// Access to the options of a socket.
///
/// Implemented by everything that owns a native delegate.
pub trait ZsockOptions: NativeDelegate {
    /// Return a view of this socket's options.
    fn options(&self) -> OptionsAccessor<'_> {
        OptionsAccessor::new(self.delegate())
    }
}

/// Read/write view of the options of one socket.
///
/// # Example
///
/// ```rust
/// use zsock::{Socket, ZsockOptions};
/// use zsock::prelude::*;
///
/// let socket = Socket::new_by_type(SocketType::Req);
/// let options = socket.options();
/// options.set_sndhwm(10);
/// assert_eq!(options.sndhwm(), 10);
/// assert_eq!(options.mechanism(), Mechanism::Null);
/// ```
pub struct OptionsAccessor<'a> {
    delegate: &'a dyn ZsockDelegate,
}

impl<'a> OptionsAccessor<'a> {
    pub(crate) fn new(delegate: &'a dyn ZsockDelegate) -> Self {
        Self { delegate }
    }

    fn read<T>(&self, f: impl FnOnce(&SocketOptions) -> T) -> T {
        f(&*self.delegate.options())
    }

    fn write(&self, f: impl FnOnce(&mut SocketOptions)) {
        f(&mut *self.delegate.options());
    }

    /// Copy of all current options.
    pub fn snapshot(&self) -> SocketOptions {
        self.read(SocketOptions::clone)
    }

    // CURVE

    /// Own CURVE secret key.
    pub fn curve_secretkey(&self) -> Option<CurveSecretKey> {
        self.read(|o| o.curve_secretkey.clone())
    }

    /// Set own CURVE secret key. The public key is left untouched.
    pub fn set_curve_secretkey(&self, key: CurveSecretKey) {
        self.write(|o| o.set_curve_secretkey(key));
    }

    /// Set own CURVE secret key from its Z85 text form.
    pub fn set_curve_secretkey_z85(&self, text: &str) -> Result<()> {
        self.set_curve_secretkey(CurveSecretKey::from_z85(text)?);
        Ok(())
    }

    /// Own CURVE public key.
    pub fn curve_publickey(&self) -> Option<CurvePublicKey> {
        self.read(|o| o.curve_publickey)
    }

    /// Set own CURVE public key.
    pub fn set_curve_publickey(&self, key: CurvePublicKey) {
        self.write(|o| o.set_curve_publickey(key));
    }

    /// Server's CURVE public key (client side).
    pub fn curve_serverkey(&self) -> Option<CurvePublicKey> {
        self.read(|o| o.curve_serverkey)
    }

    /// Set the server's public key. Makes this socket a CURVE client.
    pub fn set_curve_serverkey(&self, key: CurvePublicKey) {
        self.write(|o| o.set_curve_serverkey(key));
    }

    /// Set the server's public key from its Z85 text form.
    pub fn set_curve_serverkey_z85(&self, text: &str) -> Result<()> {
        self.set_curve_serverkey(CurvePublicKey::from_z85(text)?);
        Ok(())
    }

    /// Whether this socket acts as CURVE server.
    pub fn curve_server(&self) -> bool {
        self.read(|o| o.curve_server)
    }

    /// Enable or disable the CURVE server role.
    pub fn set_curve_server(&self, enabled: bool) {
        self.write(|o| o.set_curve_server(enabled));
    }

    /// ZAP authentication domain.
    pub fn zap_domain(&self) -> Option<String> {
        self.read(|o| o.zap_domain.clone())
    }

    /// Set the ZAP domain. An empty domain clears it.
    pub fn set_zap_domain(&self, domain: impl Into<String>) {
        self.write(|o| o.set_zap_domain(domain));
    }

    /// Current security mechanism.
    pub fn mechanism(&self) -> Mechanism {
        self.read(|o| o.mechanism)
    }

    /// Force the security mechanism.
    ///
    /// Switching to NULL clears both server roles. GSSAPI is not supported.
    pub fn set_mechanism(&self, mechanism: Mechanism) -> Result<()> {
        if mechanism == Mechanism::Gssapi {
            return Err(Error::Operation {
                op: "set_mechanism",
                endpoint: None,
                source: zsock_core::error::NativeError::not_supported(
                    "GSSAPI mechanism is not supported",
                ),
            });
        }
        self.write(|o| {
            o.mechanism = mechanism;
            if mechanism == Mechanism::Null {
                o.curve_server = false;
                o.plain_server = false;
            }
        });
        Ok(())
    }

    // PLAIN

    /// Whether this socket acts as PLAIN server.
    pub fn plain_server(&self) -> bool {
        self.read(|o| o.plain_server)
    }

    /// Enable or disable the PLAIN server role.
    pub fn set_plain_server(&self, enabled: bool) {
        self.write(|o| o.set_plain_server(enabled));
    }

    /// PLAIN username.
    pub fn plain_username(&self) -> Option<String> {
        self.read(|o| o.plain_username.clone())
    }

    /// Set the PLAIN username. Switches the mechanism to PLAIN.
    pub fn set_plain_username(&self, username: impl Into<String>) {
        self.write(|o| o.set_plain_username(username));
    }

    /// PLAIN password.
    pub fn plain_password(&self) -> Option<String> {
        self.read(|o| o.plain_password.clone())
    }

    /// Set the PLAIN password. Switches the mechanism to PLAIN.
    pub fn set_plain_password(&self, password: impl Into<String>) {
        self.write(|o| o.set_plain_password(password));
    }

    // Queues and timeouts

    /// Send high water mark. 0 means unbounded.
    pub fn sndhwm(&self) -> usize {
        self.read(|o| o.send_hwm)
    }

    /// Set the send high water mark.
    pub fn set_sndhwm(&self, hwm: usize) {
        self.write(|o| o.send_hwm = hwm);
    }

    /// Receive high water mark. 0 means unbounded.
    pub fn rcvhwm(&self) -> usize {
        self.read(|o| o.recv_hwm)
    }

    /// Set the receive high water mark.
    pub fn set_rcvhwm(&self, hwm: usize) {
        self.write(|o| o.recv_hwm = hwm);
    }

    /// Send timeout. `None` blocks indefinitely.
    pub fn sndtimeo(&self) -> Option<Duration> {
        self.read(|o| o.send_timeout)
    }

    /// Set the send timeout.
    pub fn set_sndtimeo(&self, timeout: Option<Duration>) {
        self.write(|o| o.send_timeout = timeout);
    }

    /// Receive timeout. `None` blocks indefinitely.
    pub fn rcvtimeo(&self) -> Option<Duration> {
        self.read(|o| o.recv_timeout)
    }

    /// Set the receive timeout.
    pub fn set_rcvtimeo(&self, timeout: Option<Duration>) {
        self.write(|o| o.recv_timeout = timeout);
    }

    // Routing

    /// Routing identity announced to ROUTER peers.
    pub fn routing_id(&self) -> Option<Bytes> {
        self.read(|o| o.routing_id.clone())
    }

    /// Set the routing identity. Takes effect for links made afterwards.
    pub fn set_routing_id(&self, id: impl Into<Bytes>) -> Result<()> {
        let id = id.into();
        SocketOptions::validate_routing_id(&id).map_err(|source| Error::Operation {
            op: "set_routing_id",
            endpoint: None,
            source,
        })?;
        self.write(|o| o.routing_id = Some(id));
        Ok(())
    }

    /// Whether ROUTER fails on unroutable messages instead of dropping them.
    pub fn router_mandatory(&self) -> bool {
        self.read(|o| o.router_mandatory)
    }

    /// Set ROUTER mandatory routing.
    pub fn set_router_mandatory(&self, enabled: bool) {
        self.write(|o| o.router_mandatory = enabled);
    }

    /// Whether TCP endpoints may use IPv6.
    pub fn ipv6(&self) -> bool {
        self.read(|o| o.ipv6)
    }

    /// Enable or disable IPv6 for TCP endpoints.
    pub fn set_ipv6(&self, enabled: bool) {
        self.write(|o| o.ipv6 = enabled);
    }
}

impl fmt::Debug for OptionsAccessor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionsAccessor")
            .field("socket_type", &self.delegate.socket_type())
            .field("mechanism", &self.mechanism())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zsock_core::curve::CurveKeyPair;
    use zsock_core::socket_type::SocketType;
    use zsock_native::Zsock;

    #[test]
    fn test_curve_keys_switch_mechanism() {
        let native = Zsock::new(SocketType::Dealer);
        let options = OptionsAccessor::new(&native);
        assert_eq!(options.mechanism(), Mechanism::Null);

        let server = CurveKeyPair::generate();
        options.set_curve_serverkey(server.public);
        assert_eq!(options.mechanism(), Mechanism::Curve);
        assert_eq!(options.curve_serverkey(), Some(server.public));
        assert!(!options.curve_server());
    }

    #[test]
    fn test_secret_key_does_not_derive_public() {
        let native = Zsock::new(SocketType::Dealer);
        let options = OptionsAccessor::new(&native);
        let keypair = CurveKeyPair::generate();
        options.set_curve_secretkey(keypair.secret.clone());
        assert_eq!(options.curve_secretkey(), Some(keypair.secret));
        assert_eq!(options.curve_publickey(), None);
    }

    #[test]
    fn test_z85_key_setters() {
        let native = Zsock::new(SocketType::Dealer);
        let options = OptionsAccessor::new(&native);
        assert!(options.set_curve_serverkey_z85("too short").is_err());
        let keypair = CurveKeyPair::generate();
        options
            .set_curve_serverkey_z85(&keypair.public.to_z85())
            .unwrap();
        assert_eq!(options.curve_serverkey(), Some(keypair.public));
    }

    #[test]
    fn test_mechanism_override() {
        let native = Zsock::new(SocketType::Rep);
        let options = OptionsAccessor::new(&native);
        options.set_curve_server(true);
        options.set_mechanism(Mechanism::Null).unwrap();
        assert!(!options.curve_server());
        assert!(options.set_mechanism(Mechanism::Gssapi).is_err());
    }

    #[test]
    fn test_plain_credentials() {
        let native = Zsock::new(SocketType::Req);
        let options = OptionsAccessor::new(&native);
        options.set_plain_username("admin");
        options.set_plain_password("secret");
        assert_eq!(options.mechanism(), Mechanism::Plain);
        assert_eq!(options.plain_username().as_deref(), Some("admin"));
        assert!(!options.plain_server());
    }

    #[test]
    fn test_routing_id_validation() {
        let native = Zsock::new(SocketType::Dealer);
        let options = OptionsAccessor::new(&native);
        assert!(options.set_routing_id(Bytes::new()).is_err());
        assert!(options.set_routing_id(vec![0u8, 1]).is_err());
        options.set_routing_id("worker-1").unwrap();
        assert_eq!(options.routing_id(), Some(Bytes::from_static(b"worker-1")));
    }

    #[test]
    fn test_queue_and_timeout_options() {
        let native = Zsock::new(SocketType::Push);
        let options = OptionsAccessor::new(&native);
        assert_eq!(options.sndhwm(), zsock_core::options::DEFAULT_HWM);
        options.set_sndhwm(5);
        options.set_rcvtimeo(Some(Duration::from_millis(10)));
        assert_eq!(options.sndhwm(), 5);
        assert_eq!(options.rcvtimeo(), Some(Duration::from_millis(10)));
        assert_eq!(options.sndtimeo(), None);
    }
}
