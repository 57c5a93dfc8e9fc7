//! CURVE key material.
//!
//! Long-term CURVE keys are X25519 key pairs. Sockets carry them as options;
//! on the wire and in configuration they travel as 40-character Z85 text.
//! The CURVE handshake itself is not implemented here.

use crate::z85::{self, Z85Error};
use rand::rngs::OsRng;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use x25519_dalek::{PublicKey, StaticSecret};

/// CURVE key size in bytes
pub const CURVE_KEY_SIZE: usize = 32;

/// CURVE key size in Z85 characters
pub const CURVE_KEY_Z85_LEN: usize = 40;

/// Errors when decoding key material
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("key must be 32 bytes or 40 Z85 characters, got {0}")]
    InvalidLength(usize),

    #[error("invalid Z85 key: {0}")]
    Z85(#[from] Z85Error),

    #[error("secret key does not belong to the public key")]
    Mismatch,
}

fn decode_key(text: &str) -> Result<[u8; CURVE_KEY_SIZE], KeyError> {
    if text.len() != CURVE_KEY_Z85_LEN {
        return Err(KeyError::InvalidLength(text.len()));
    }
    let bytes = z85::decode(text)?;
    <[u8; CURVE_KEY_SIZE]>::try_from(bytes.as_slice()).map_err(|_| KeyError::InvalidLength(bytes.len()))
}

/// CURVE public key (32 bytes)
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CurvePublicKey([u8; CURVE_KEY_SIZE]);

impl CurvePublicKey {
    /// Create from bytes
    pub const fn from_bytes(bytes: [u8; CURVE_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get raw bytes
    pub const fn as_bytes(&self) -> &[u8; CURVE_KEY_SIZE] {
        &self.0
    }

    /// Decode from 40-character Z85 text
    pub fn from_z85(text: &str) -> Result<Self, KeyError> {
        decode_key(text).map(Self)
    }

    /// Encode as 40-character Z85 text
    pub fn to_z85(&self) -> String {
        // 32 bytes is a multiple of 4, encoding cannot fail
        z85::encode(&self.0).unwrap_or_default()
    }
}

impl From<[u8; CURVE_KEY_SIZE]> for CurvePublicKey {
    fn from(bytes: [u8; CURVE_KEY_SIZE]) -> Self {
        Self(bytes)
    }
}

impl From<PublicKey> for CurvePublicKey {
    fn from(key: PublicKey) -> Self {
        Self(*key.as_bytes())
    }
}

impl FromStr for CurvePublicKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_z85(s)
    }
}

impl AsRef<[u8]> for CurvePublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for CurvePublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CurvePublicKey({})", self.to_z85())
    }
}

impl fmt::Display for CurvePublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_z85())
    }
}

/// CURVE secret key (32 bytes)
#[derive(Clone)]
pub struct CurveSecretKey(StaticSecret);

impl CurveSecretKey {
    /// Generate a new random secret key
    pub fn generate() -> Self {
        Self(StaticSecret::random_from_rng(OsRng))
    }

    /// Create from bytes
    pub fn from_bytes(bytes: [u8; CURVE_KEY_SIZE]) -> Self {
        Self(StaticSecret::from(bytes))
    }

    /// Get raw bytes
    pub fn to_bytes(&self) -> [u8; CURVE_KEY_SIZE] {
        self.0.to_bytes()
    }

    /// Decode from 40-character Z85 text
    pub fn from_z85(text: &str) -> Result<Self, KeyError> {
        decode_key(text).map(Self::from_bytes)
    }

    /// Encode as 40-character Z85 text
    pub fn to_z85(&self) -> String {
        z85::encode(&self.to_bytes()).unwrap_or_default()
    }

    /// Get public key
    pub fn public_key(&self) -> CurvePublicKey {
        CurvePublicKey::from(PublicKey::from(&self.0))
    }
}

impl PartialEq for CurveSecretKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for CurveSecretKey {}

impl FromStr for CurveSecretKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_z85(s)
    }
}

impl fmt::Debug for CurveSecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CurveSecretKey([REDACTED])")
    }
}

/// CURVE key pair (public + secret)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurveKeyPair {
    pub public: CurvePublicKey,
    pub secret: CurveSecretKey,
}

impl CurveKeyPair {
    /// Generate a new random key pair
    pub fn generate() -> Self {
        let secret = CurveSecretKey::generate();
        let public = secret.public_key();
        Self { public, secret }
    }

    /// Create from a secret key, deriving the public half
    pub fn from_secret(secret: CurveSecretKey) -> Self {
        Self {
            public: secret.public_key(),
            secret,
        }
    }
}
