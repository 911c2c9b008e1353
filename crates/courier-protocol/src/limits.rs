//! Protocol limits and constants.
//!
//! All protocol limits are defined here for consistent enforcement.

// === Envelope ===

/// Maximum size of an encrypted message (ciphertext with tag) in bytes.
pub const MAX_CONTENT_LENGTH: usize = 4000;

// === Padding ===

/// Minimum total length of a padded body.
pub const MIN_PADDED_LENGTH: usize = 32;

/// Minimum number of padding bytes appended.
pub const MIN_PADDING: usize = 1;

/// Maximum number of padding bytes appended (fits the trailer byte).
pub const MAX_PADDING: usize = 255;

// === Identifiers ===

/// Length of an identity in ASCII characters.
pub const IDENTITY_LENGTH: usize = 8;

/// Size of a message id in bytes.
pub const MESSAGE_ID_SIZE: usize = 8;

/// Size of a blob id in bytes.
pub const BLOB_ID_SIZE: usize = 16;

/// Size of a lookup hash in bytes.
pub const HASH_SIZE: usize = 32;

// === Message bodies ===

/// Size of an image message body: blob id, size, nonce.
pub const IMAGE_BODY_SIZE: usize = BLOB_ID_SIZE + 4 + courier_crypto::NONCE_SIZE;

/// Largest blob size expressible in the signed 32-bit wire field.
pub const MAX_BLOB_SIZE: u32 = i32::MAX as u32;
