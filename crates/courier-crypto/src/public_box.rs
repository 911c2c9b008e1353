//! Authenticated public-key box.
//!
//! NaCl `crypto_box` built from [`agree`] and the secret box: the sender's
//! private key and receiver's public key give a shared secret-box key, and a
//! fresh random nonce is drawn for every seal. The output is the combined
//! `tag || ciphertext` form.
//!
//! Opening fails with [`CryptoError::Decryption`] whether the ciphertext was
//! altered or the wrong keys were used; the two cases are not distinguished.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use crate::symmetric::{self, Nonce};
use crate::x25519::{agree, X25519PrivateKey, X25519PublicKey};
use crate::Result;

/// Seal `plaintext` from `sender` to `receiver` with a nonce from `OsRng`.
pub fn seal(
    sender: &X25519PrivateKey,
    receiver: &X25519PublicKey,
    plaintext: &[u8],
) -> Result<(Vec<u8>, Nonce)> {
    seal_with(&mut OsRng, sender, receiver, plaintext)
}

/// Seal `plaintext` with a nonce drawn from `rng`.
///
/// Returns the ciphertext-with-tag and the nonce that must travel with it.
pub fn seal_with<R: RngCore + CryptoRng>(
    rng: &mut R,
    sender: &X25519PrivateKey,
    receiver: &X25519PublicKey,
    plaintext: &[u8],
) -> Result<(Vec<u8>, Nonce)> {
    let key = agree(sender, receiver);
    let nonce = Nonce::generate_with(rng);
    let ciphertext = symmetric::seal(&key, &nonce, plaintext)?;
    Ok((ciphertext, nonce))
}

/// Open a box sealed by `sender` for the holder of `receiver`.
pub fn open(
    receiver: &X25519PrivateKey,
    sender: &X25519PublicKey,
    nonce: &Nonce,
    ciphertext: &[u8],
) -> Result<Vec<u8>> {
    let key = agree(receiver, sender);
    symmetric::open(&key, nonce, ciphertext)
}
