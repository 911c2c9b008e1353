//! # courier-crypto
//!
//! Cryptographic capabilities consumed by the courier message envelope.
//!
//! This crate provides the two authenticated boxes the protocol is built on,
//! wire-compatible with NaCl:
//! - **Secret box**: XSalsa20-Poly1305 keyed by a 32-byte [`SymmetricKey`]
//! - **Public-key box**: X25519 key agreement (HSalsa20 over the shared point)
//!   feeding the secret box
//! - **HMAC-SHA256** for keyed hashing and callback signatures
//!
//! ## Security
//!
//! All secret data uses `zeroize` for secure memory cleanup.
//! All comparisons of MACs use constant-time operations via `subtle`.
//! Every operation that needs randomness has a `*_with` form taking an
//! explicit `RngCore + CryptoRng` source; the plain forms use `OsRng`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod mac;
pub mod public_box;
pub mod symmetric;
pub mod x25519;

#[cfg(test)]
mod proptests;

pub use error::{CryptoError, Result};
pub use mac::{constant_time_eq, hmac_sha256, hmac_sha256_parts, MAC_SIZE};
pub use public_box::{open as box_open, seal as box_seal, seal_with as box_seal_with};
pub use symmetric::{open, seal, Nonce, SymmetricKey, KEY_SIZE, NONCE_SIZE, TAG_SIZE};
pub use x25519::{
    agree, X25519KeyPair, X25519PrivateKey, X25519PublicKey, PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE,
};
