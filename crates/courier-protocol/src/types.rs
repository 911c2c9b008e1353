//! Fixed-length identifiers used throughout the protocol.
//!
//! Every identifier is an immutable value compared and hashed by content.
//! Construction validates the byte length; hex input may be either case and
//! output is always lowercase.

use std::fmt;
use std::str::FromStr;

use crate::error::{ProtocolError, Result};
use crate::limits::{BLOB_ID_SIZE, HASH_SIZE, IDENTITY_LENGTH, MESSAGE_ID_SIZE};

pub use courier_crypto::{Nonce, SymmetricKey};

macro_rules! fixed_bytes {
    ($(#[$meta:meta])* $name:ident, $size:expr, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name([u8; $size]);

        impl $name {
            /// Size in bytes.
            pub const SIZE: usize = $size;

            /// Wrap an array of the correct size.
            pub const fn from_array(bytes: [u8; $size]) -> Self {
                Self(bytes)
            }

            /// Create from a byte slice.
            ///
            /// # Errors
            ///
            /// Returns `InvalidLength` if the slice has the wrong length.
            pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
                let array: [u8; $size] =
                    bytes
                        .try_into()
                        .map_err(|_| ProtocolError::InvalidLength {
                            kind: $kind,
                            expected: $size,
                            actual: bytes.len(),
                        })?;
                Ok(Self(array))
            }

            /// Parse from hex (either case).
            pub fn from_hex(hex_str: &str) -> Result<Self> {
                let bytes = hex::decode(hex_str).map_err(|e| ProtocolError::InvalidHex {
                    kind: $kind,
                    reason: e.to_string(),
                })?;
                Self::from_bytes(&bytes)
            }

            /// Raw bytes.
            pub fn as_bytes(&self) -> &[u8; $size] {
                &self.0
            }

            /// Lowercase hex encoding.
            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "[{}]"), self.to_hex())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl FromStr for $name {
            type Err = ProtocolError;

            fn from_str(s: &str) -> Result<Self> {
                Self::from_hex(s)
            }
        }

        impl From<[u8; $size]> for $name {
            fn from(bytes: [u8; $size]) -> Self {
                Self(bytes)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }
    };
}

fixed_bytes!(
    /// Sender-assigned message identifier.
    MessageId,
    MESSAGE_ID_SIZE,
    "message id"
);

fixed_bytes!(
    /// Server-assigned attachment identifier.
    BlobId,
    BLOB_ID_SIZE,
    "blob id"
);

fixed_bytes!(
    /// Keyed HMAC of a normalized phone number or email address.
    Hash,
    HASH_SIZE,
    "hash"
);

/// Parse a nonce from hex, reporting errors against `kind`.
pub(crate) fn nonce_from_hex(hex_str: &str, kind: &'static str) -> Result<Nonce> {
    Nonce::from_hex(hex_str).map_err(|e| ProtocolError::from(e).for_kind(kind))
}

/// Parse a symmetric key from hex, reporting errors against `kind`.
pub(crate) fn key_from_hex(hex_str: &str, kind: &'static str) -> Result<SymmetricKey> {
    SymmetricKey::from_hex(hex_str).map_err(|e| ProtocolError::from(e).for_kind(kind))
}

/// Participant identity: exactly eight printable ASCII characters.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(String);

impl Identity {
    /// Validate and wrap an identity string.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIdentity` unless the input is exactly eight printable
    /// ASCII characters (no whitespace or control characters).
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let valid = value.len() == IDENTITY_LENGTH
            && value.bytes().all(|b| b.is_ascii_graphic());
        if !valid {
            return Err(ProtocolError::InvalidIdentity(value));
        }
        Ok(Self(value))
    }

    /// The identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identity as its eight ASCII bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity[{}]", self.0)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Identity {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
