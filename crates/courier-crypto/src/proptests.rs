//! Property-based tests for cryptographic primitives.
//!
//! - Roundtrip properties (seal/open for both boxes)
//! - Tamper detection on every byte position
//! - Agreement symmetry
//! - Length validation of key and nonce material

use proptest::prelude::*;

use crate::{
    agree, box_open, box_seal, constant_time_eq, hmac_sha256_parts, open, seal, CryptoError,
    Nonce, SymmetricKey, X25519KeyPair, KEY_SIZE, NONCE_SIZE, TAG_SIZE,
};

proptest! {
    /// Secret box seal followed by open returns the plaintext.
    #[test]
    fn secret_box_roundtrip(plaintext: Vec<u8>) {
        let key = SymmetricKey::generate();
        let nonce = Nonce::generate();
        let sealed = seal(&key, &nonce, &plaintext).unwrap();
        prop_assert_eq!(sealed.len(), plaintext.len() + TAG_SIZE);
        prop_assert_eq!(open(&key, &nonce, &sealed).unwrap(), plaintext);
    }

    /// Flipping any single bit of a sealed buffer is detected.
    #[test]
    fn secret_box_detects_any_flip(
        plaintext in prop::collection::vec(any::<u8>(), 0..64),
        position in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let key = SymmetricKey::generate();
        let nonce = Nonce::generate();
        let mut sealed = seal(&key, &nonce, &plaintext).unwrap();
        let i = position.index(sealed.len());
        sealed[i] ^= 1 << bit;
        prop_assert!(matches!(open(&key, &nonce, &sealed), Err(CryptoError::Decryption)));
    }

    /// Public-key box opens for the intended receiver.
    #[test]
    fn public_box_roundtrip(plaintext in prop::collection::vec(any::<u8>(), 0..512)) {
        let alice = X25519KeyPair::generate();
        let bob = X25519KeyPair::generate();
        let (ciphertext, nonce) = box_seal(alice.private_key(), bob.public_key(), &plaintext).unwrap();
        let opened = box_open(bob.private_key(), alice.public_key(), &nonce, &ciphertext).unwrap();
        prop_assert_eq!(opened, plaintext);
    }

    /// Agreement is symmetric for arbitrary private key bytes.
    #[test]
    fn agreement_symmetric(a in any::<[u8; 32]>(), b in any::<[u8; 32]>()) {
        let alice = X25519KeyPair::from_private(crate::X25519PrivateKey::from_bytes(&a).unwrap());
        let bob = X25519KeyPair::from_private(crate::X25519PrivateKey::from_bytes(&b).unwrap());
        prop_assert_eq!(
            agree(alice.private_key(), bob.public_key()),
            agree(bob.private_key(), alice.public_key())
        );
    }

    /// Keys of the wrong length are rejected with the actual length reported.
    #[test]
    fn key_length_validated(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let result = SymmetricKey::from_bytes(&bytes);
        if bytes.len() == KEY_SIZE {
            prop_assert!(result.is_ok());
        } else {
            prop_assert_eq!(
                result.err(),
                Some(CryptoError::InvalidKeyLength { expected: KEY_SIZE, actual: bytes.len() })
            );
        }
    }

    /// Nonces of the wrong length are rejected.
    #[test]
    fn nonce_length_validated(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        prop_assert_eq!(Nonce::from_bytes(&bytes).is_ok(), bytes.len() == NONCE_SIZE);
    }

    /// Splitting MAC input across parts never changes the result.
    #[test]
    fn mac_parts_split_invariant(data in prop::collection::vec(any::<u8>(), 0..128), cut in any::<prop::sample::Index>()) {
        let at = cut.index(data.len() + 1);
        let (left, right) = data.split_at(at);
        let whole = hmac_sha256_parts(b"secret", &[data.as_slice()]);
        let split = hmac_sha256_parts(b"secret", &[left, right]);
        prop_assert!(constant_time_eq(&whole, &split));
    }
}
