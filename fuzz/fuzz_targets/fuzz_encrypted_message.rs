//! Fuzz target for opening encrypted messages.
//!
//! Tests that decrypting arbitrary ciphertext is rejected gracefully
//! without panicking.

#![no_main]

use courier_crypto::X25519KeyPair;
use courier_protocol::{EncryptedMessage, Nonce};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 24 {
        return;
    }
    let (nonce, ciphertext) = data.split_at(24);
    let Ok(message) = EncryptedMessage::new(ciphertext.to_vec(), Nonce::from_bytes(nonce).unwrap())
    else {
        return;
    };

    let sender = X25519KeyPair::generate();
    let receiver = X25519KeyPair::generate();

    // Random ciphertext never authenticates
    assert!(message
        .decrypt(sender.public_key(), receiver.private_key())
        .is_err());
});
