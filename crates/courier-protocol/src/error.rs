//! Error types for protocol operations.
//!
//! Every error is terminal for the single message or callback being
//! processed. Errors name fields, lengths and tag values but never carry key
//! material or plaintext.

use courier_crypto::CryptoError;
use thiserror::Error;

/// Coarse classification of a [`ProtocolError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Fixed-length or size-limit violation, detected before any crypto step.
    Validation,
    /// Malformed or truncated encoded data.
    Format,
    /// Unrecognized message type tag.
    UnknownType,
    /// Ciphertext did not authenticate.
    Authentication,
    /// A required callback field is absent.
    MissingField,
    /// Callback MAC mismatch.
    Signature,
    /// The underlying primitive failed outright.
    Crypto,
}

/// Errors that can occur during protocol operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A fixed-length value had the wrong number of bytes.
    #[error("Invalid {kind} length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Which value was being constructed.
        kind: &'static str,
        /// Required length.
        expected: usize,
        /// Length supplied.
        actual: usize,
    },

    /// Identity is not exactly eight printable ASCII characters.
    #[error("Illegal identity: {0:?}")]
    InvalidIdentity(String),

    /// A message field holds a value its encoding cannot carry.
    #[error("Invalid {field}: {reason}")]
    InvalidField {
        /// Which field was rejected.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// Encrypted content exceeds the transport limit.
    #[error("Content too large: {actual} bytes exceeds maximum {max}")]
    ContentTooLarge {
        /// Maximum allowed bytes.
        max: usize,
        /// Actual byte count.
        actual: usize,
    },

    /// Blob size does not fit the signed 32-bit wire field.
    #[error("Blob size too large: {actual} exceeds maximum {max}")]
    BlobTooLarge {
        /// Maximum size.
        max: u32,
        /// Size supplied.
        actual: u64,
    },

    /// Malformed encoded data.
    #[error("Invalid {context}: {reason}")]
    InvalidFormat {
        /// What was being decoded.
        context: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// A hex field could not be decoded.
    #[error("Invalid hex in {kind}: {reason}")]
    InvalidHex {
        /// Which value was being decoded.
        kind: &'static str,
        /// Decoder message.
        reason: String,
    },

    /// Unrecognized message type tag.
    #[error("Unknown message type: 0x{0:02x}")]
    UnknownMessageType(u8),

    /// Ciphertext failed authentication (tampered or wrong keys).
    #[error("Failed to decrypt message")]
    DecryptionFailed,

    /// A required callback field is missing.
    #[error("Missing parameter {0}")]
    MissingField(&'static str),

    /// Callback MAC did not match.
    #[error("Invalid signature")]
    InvalidSignature,

    /// The underlying primitive failed.
    #[error("Encryption failed: {0}")]
    Encryption(String),
}

impl ProtocolError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidLength { .. }
            | Self::InvalidIdentity(_)
            | Self::InvalidField { .. }
            | Self::ContentTooLarge { .. }
            | Self::BlobTooLarge { .. } => ErrorKind::Validation,
            Self::InvalidFormat { .. } | Self::InvalidHex { .. } => ErrorKind::Format,
            Self::UnknownMessageType(_) => ErrorKind::UnknownType,
            Self::DecryptionFailed => ErrorKind::Authentication,
            Self::MissingField(_) => ErrorKind::MissingField,
            Self::InvalidSignature => ErrorKind::Signature,
            Self::Encryption(_) => ErrorKind::Crypto,
        }
    }

    pub(crate) fn format(context: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            context,
            reason: reason.into(),
        }
    }

    /// Reclassify a construction error raised while decoding untrusted data.
    pub(crate) fn in_decode(self, context: &'static str) -> Self {
        match self.kind() {
            ErrorKind::Validation => Self::format(context, self.to_string()),
            _ => self,
        }
    }

    /// Rename the value a length or hex error refers to.
    pub(crate) fn for_kind(self, kind: &'static str) -> Self {
        match self {
            Self::InvalidLength {
                expected, actual, ..
            } => Self::InvalidLength {
                kind,
                expected,
                actual,
            },
            Self::InvalidHex { reason, .. } => Self::InvalidHex { kind, reason },
            other => other,
        }
    }
}

impl From<CryptoError> for ProtocolError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::Decryption => Self::DecryptionFailed,
            CryptoError::InvalidKeyLength { expected, actual } => Self::InvalidLength {
                kind: "key",
                expected,
                actual,
            },
            CryptoError::InvalidNonceLength { expected, actual } => Self::InvalidLength {
                kind: "nonce",
                expected,
                actual,
            },
            CryptoError::InvalidHexFormat(reason) => Self::InvalidHex {
                kind: "key",
                reason,
            },
            CryptoError::Encryption(reason) => Self::Encryption(reason),
        }
    }
}

/// Result type for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;
