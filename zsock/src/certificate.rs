//! CURVE certificates.
//!
//! A certificate is a CURVE key pair plus free-form metadata (name, email,
//! ...). A certificate built from a public key alone describes a peer and
//! cannot be applied to a socket.

use crate::error::{Error, Result};
use crate::options::ZsockOptions;
use std::collections::BTreeMap;
use zsock_core::curve::{CurveKeyPair, CurvePublicKey, CurveSecretKey, KeyError};
use zsock_core::error::NativeError;

/// A CURVE key pair with metadata.
///
/// # Example
///
/// ```rust
/// use zsock::prelude::*;
///
/// let server_cert = Certificate::new();
/// let client_cert = Certificate::new();
///
/// let server = Socket::new_by_type(SocketType::Rep);
/// server
///     .make_secure_server(server_cert.secret_key().unwrap(), "global")
///     .unwrap();
///
/// let client = Socket::new_by_type(SocketType::Req);
/// client
///     .make_secure_client(client_cert.secret_key().unwrap(), server_cert.public_key())
///     .unwrap();
/// assert_eq!(client.options().curve_serverkey().as_ref(), Some(server_cert.public_key()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    public: CurvePublicKey,
    secret: Option<CurveSecretKey>,
    meta: BTreeMap<String, String>,
}

impl Certificate {
    /// Generate a certificate with a fresh key pair.
    pub fn new() -> Self {
        Self::from_keypair(CurveKeyPair::generate())
    }

    pub fn from_keypair(keys: CurveKeyPair) -> Self {
        Self {
            public: keys.public,
            secret: Some(keys.secret),
            meta: BTreeMap::new(),
        }
    }

    /// Build a public-only certificate describing a peer.
    pub fn from_public_key(public: CurvePublicKey) -> Self {
        Self {
            public,
            secret: None,
            meta: BTreeMap::new(),
        }
    }

    /// Build a certificate from Z85 text keys.
    ///
    /// Without a secret key the certificate is public-only. A secret key that
    /// does not match the public key is rejected.
    pub fn from_z85(public: &str, secret: Option<&str>) -> Result<Self> {
        let public = CurvePublicKey::from_z85(public)?;
        let Some(secret) = secret else {
            return Ok(Self::from_public_key(public));
        };
        let keys = CurveKeyPair::from_secret(CurveSecretKey::from_z85(secret)?);
        if keys.public != public {
            return Err(Error::Key(KeyError::Mismatch));
        }
        Ok(Self::from_keypair(keys))
    }

    pub fn public_key(&self) -> &CurvePublicKey {
        &self.public
    }

    /// The secret key, `None` for public-only certificates.
    pub fn secret_key(&self) -> Option<&CurveSecretKey> {
        self.secret.as_ref()
    }

    /// Public key as 40-character Z85 text.
    pub fn public_txt(&self) -> String {
        self.public.to_z85()
    }

    /// Secret key as Z85 text.
    pub fn secret_txt(&self) -> Option<String> {
        self.secret.as_ref().map(CurveSecretKey::to_z85)
    }

    pub fn meta(&self, key: &str) -> Option<&str> {
        self.meta.get(key).map(String::as_str)
    }

    pub fn set_meta(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.meta.insert(key.into(), value.into());
    }

    /// Metadata keys in sorted order.
    pub fn meta_keys(&self) -> impl Iterator<Item = &str> {
        self.meta.keys().map(String::as_str)
    }

    /// Install this certificate's keys as a socket's own CURVE keys.
    ///
    /// # Errors
    ///
    /// Fails for public-only certificates.
    pub fn apply(&self, socket: &impl ZsockOptions) -> Result<()> {
        let secret = self.secret.as_ref().ok_or_else(|| Error::Operation {
            op: "apply certificate",
            endpoint: None,
            source: NativeError::invalid("certificate has no secret key"),
        })?;
        let options = socket.options();
        options.set_curve_secretkey(secret.clone());
        options.set_curve_publickey(self.public);
        Ok(())
    }
}

impl Default for Certificate {
    fn default() -> Self {
        Self::new()
    }
}
