//! End-to-end encryption of plain messages.
//!
//! Ties together the message codec, random padding and the public-key box:
//!
//! ```text
//! encode -> pad -> box(sender private, receiver public, fresh nonce)
//! ```
//!
//! ## Security Properties
//!
//! - **Authenticity**: only the holder of the sender's private key (or the
//!   receiver's) can produce a box that opens
//! - **Length hiding**: padding hides the exact body length and lifts short
//!   messages to a minimum size
//! - **Uniform failure**: tampering and wrong keys produce the same error
//!
//! ## Usage
//!
//! ```
//! use courier_crypto::X25519KeyPair;
//! use courier_protocol::encryption::{decrypt, encrypt};
//! use courier_protocol::message::PlainMessage;
//!
//! let alice = X25519KeyPair::generate();
//! let bob = X25519KeyPair::generate();
//!
//! let msg = PlainMessage::text("Hello, Bob!");
//! let encrypted = encrypt(&msg, alice.private_key(), bob.public_key()).unwrap();
//!
//! let received = decrypt(&encrypted, alice.public_key(), bob.private_key()).unwrap();
//! assert_eq!(received, msg);
//! ```

pub mod e2e;

pub use e2e::{decrypt, encrypt, encrypt_with, encrypt_with_limit, EncryptedMessage};
