//! X25519 key material and NaCl-style key agreement.
//!
//! Long-term Curve25519 keys identify both ends of a conversation. The
//! agreement step [`agree`] is NaCl's `crypto_box_beforenm`: the X25519 shared
//! point is run through HSalsa20 with an all-zero input, giving a 32-byte
//! secret-box key that both sides can compute.
//!
//! ## Security Notes
//!
//! - Private keys are zeroized on drop and never cloned
//! - Uses OsRng for key generation unless a source is supplied
//! - The raw shared point never leaves [`agree`]

use std::fmt;

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use salsa20::cipher::consts::U10;
use salsa20::cipher::generic_array::GenericArray;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::symmetric::{SymmetricKey, KEY_SIZE};
use crate::{CryptoError, Result};

/// Size of X25519 public key in bytes.
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Size of X25519 private key in bytes.
pub const PRIVATE_KEY_SIZE: usize = 32;

/// X25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct X25519PublicKey {
    bytes: [u8; PUBLIC_KEY_SIZE],
}

impl X25519PublicKey {
    /// Create from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PUBLIC_KEY_SIZE {
            return Err(CryptoError::InvalidKeyLength {
                expected: PUBLIC_KEY_SIZE,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; PUBLIC_KEY_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self { bytes: arr })
    }

    /// Parse from lowercase or uppercase hex.
    pub fn from_hex(s: &str) -> Result<Self> {
        Self::from_bytes(&hex::decode(s)?)
    }

    /// Get the key as bytes.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.bytes
    }

    /// Lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

impl fmt::Debug for X25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X25519PublicKey[{}]", self.to_hex())
    }
}

impl fmt::Display for X25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<PublicKey> for X25519PublicKey {
    fn from(key: PublicKey) -> Self {
        Self {
            bytes: key.to_bytes(),
        }
    }
}

impl From<&X25519PublicKey> for PublicKey {
    fn from(key: &X25519PublicKey) -> Self {
        PublicKey::from(key.bytes)
    }
}

/// X25519 long-term private key.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct X25519PrivateKey {
    bytes: [u8; PRIVATE_KEY_SIZE],
}

impl X25519PrivateKey {
    /// Generate a new random private key.
    pub fn generate() -> Self {
        Self::generate_with(&mut OsRng)
    }

    /// Generate a new private key from the given source.
    pub fn generate_with<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; PRIVATE_KEY_SIZE];
        rng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Create from raw bytes.
    ///
    /// # Security
    ///
    /// Only use bytes from a secure source.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PRIVATE_KEY_SIZE {
            return Err(CryptoError::InvalidKeyLength {
                expected: PRIVATE_KEY_SIZE,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; PRIVATE_KEY_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self { bytes: arr })
    }

    /// Parse from hex.
    pub fn from_hex(s: &str) -> Result<Self> {
        let mut bytes = hex::decode(s)?;
        let key = Self::from_bytes(&bytes);
        bytes.zeroize();
        key
    }

    /// Get the corresponding public key.
    pub fn public_key(&self) -> X25519PublicKey {
        let secret = StaticSecret::from(self.bytes);
        X25519PublicKey::from(PublicKey::from(&secret))
    }

    /// Get raw bytes (for serialization).
    ///
    /// # Security
    ///
    /// Handle with care - this exposes the private key.
    pub fn as_bytes(&self) -> &[u8; PRIVATE_KEY_SIZE] {
        &self.bytes
    }

    /// Lowercase hex encoding of the private key.
    ///
    /// # Security
    ///
    /// Handle with care - this exposes the private key.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

impl fmt::Debug for X25519PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X25519PrivateKey([REDACTED])")
    }
}

// Clone is intentionally not implemented for X25519PrivateKey.

/// A long-term key pair.
pub struct X25519KeyPair {
    private: X25519PrivateKey,
    public: X25519PublicKey,
}

impl X25519KeyPair {
    /// Generate a fresh key pair.
    pub fn generate() -> Self {
        Self::generate_with(&mut OsRng)
    }

    /// Generate a fresh key pair from the given source.
    pub fn generate_with<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self::from_private(X25519PrivateKey::generate_with(rng))
    }

    /// Complete a key pair from its private half.
    pub fn from_private(private: X25519PrivateKey) -> Self {
        let public = private.public_key();
        Self { private, public }
    }

    /// The private half.
    pub fn private_key(&self) -> &X25519PrivateKey {
        &self.private
    }

    /// The public half.
    pub fn public_key(&self) -> &X25519PublicKey {
        &self.public
    }
}

impl fmt::Debug for X25519KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X25519KeyPair {{ public: {:?} }}", self.public)
    }
}

/// Derive the shared secret-box key for a private/public key pair.
///
/// `agree(a_private, b_public) == agree(b_private, a_public)`.
pub fn agree(private: &X25519PrivateKey, public: &X25519PublicKey) -> SymmetricKey {
    let secret = StaticSecret::from(private.bytes);
    let shared = secret.diffie_hellman(&PublicKey::from(public));

    let mut derived = salsa20::hsalsa::<U10>(
        GenericArray::from_slice(shared.as_bytes()),
        &GenericArray::default(),
    );
    let mut key = [0u8; KEY_SIZE];
    key.copy_from_slice(&derived);
    derived.as_mut_slice().zeroize();

    let out = SymmetricKey::from(key);
    key.zeroize();
    out
}
