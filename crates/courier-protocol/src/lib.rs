//! # courier-protocol
//!
//! End-to-end message envelope for a gateway messaging protocol.
//!
//! This crate provides:
//! - **PlainMessage**: Text, Location, Image, File and DeliveryReceipt with a
//!   type-tagged binary encoding
//! - **Padding**: random-length padding that lifts short messages to a
//!   minimum size
//! - **EncryptedMessage**: authenticated public-key box over a padded message
//! - **Blob**: key and nonce material for attachments uploaded out of band
//! - **Lookup**: keyed hashing of phone numbers and email addresses
//! - **CallbackVerifier**: MAC verification of inbound webhook bodies
//!
//! Issuing HTTP requests is left to the application; this crate builds and
//! parses every payload that crosses the wire.
//!
//! ## Randomness
//!
//! Every operation that needs randomness has a `*_with` form taking an
//! explicit `RngCore + CryptoRng` source. The plain forms use `OsRng`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod blob;
pub mod callback;
pub mod capability;
pub mod config;
pub mod encryption;
pub mod error;
pub mod form;
pub mod keys;
pub mod limits;
pub mod lookup;
pub mod message;
pub mod padding;
pub mod types;

#[cfg(test)]
mod proptests;

pub use blob::{Blob, BlobPurpose, UploadedBlob};
pub use callback::{verify_callback, CallbackVerifier, GatewayCallback};
pub use capability::{parse_capabilities, Capability};
pub use config::{ConfigError, GatewayConfig, GatewayConfigBuilder};
pub use encryption::{decrypt, encrypt, encrypt_with, EncryptedMessage};
pub use error::{ErrorKind, ProtocolError, Result};
pub use message::{MessageType, PlainMessage};
pub use types::{BlobId, Hash, Identity, MessageId, Nonce, SymmetricKey};
