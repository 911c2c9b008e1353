//! End-to-end encryption implementation.
//!
//! ## Security Notes
//!
//! - Every message is sealed under a fresh random nonce
//! - The size limit is checked before the box is computed
//! - Decryption failures are logged without plaintext or key material

use std::fmt;

use courier_crypto::{box_open, box_seal_with, X25519PrivateKey, X25519PublicKey, TAG_SIZE};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use tracing::{debug, trace};

use crate::error::{ProtocolError, Result};
use crate::limits::MAX_CONTENT_LENGTH;
use crate::message::PlainMessage;
use crate::padding::{pad_with, unpad};
use crate::types::{nonce_from_hex, Nonce};

/// Ciphertext-with-tag and the nonce it was sealed under.
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptedMessage {
    ciphertext: Vec<u8>,
    nonce: Nonce,
}

impl EncryptedMessage {
    /// Wrap ciphertext and nonce.
    ///
    /// # Errors
    ///
    /// Returns `ContentTooLarge` if the ciphertext exceeds
    /// [`MAX_CONTENT_LENGTH`].
    pub fn new(ciphertext: Vec<u8>, nonce: Nonce) -> Result<Self> {
        if ciphertext.len() > MAX_CONTENT_LENGTH {
            return Err(ProtocolError::ContentTooLarge {
                max: MAX_CONTENT_LENGTH,
                actual: ciphertext.len(),
            });
        }
        Ok(Self { ciphertext, nonce })
    }

    /// Build from the hex transport encoding of ciphertext and nonce.
    pub fn from_hex(ciphertext_hex: &str, nonce_hex: &str) -> Result<Self> {
        let ciphertext = hex::decode(ciphertext_hex).map_err(|e| ProtocolError::InvalidHex {
            kind: "box",
            reason: e.to_string(),
        })?;
        let nonce = nonce_from_hex(nonce_hex, "nonce")?;
        Self::new(ciphertext, nonce)
    }

    /// Ciphertext with authentication tag.
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Nonce the box was sealed under.
    pub fn nonce(&self) -> &Nonce {
        &self.nonce
    }

    /// Lowercase hex of the ciphertext.
    pub fn ciphertext_hex(&self) -> String {
        hex::encode(&self.ciphertext)
    }

    /// Lowercase hex of the nonce.
    pub fn nonce_hex(&self) -> String {
        self.nonce.to_hex()
    }

    /// Open, unpad and decode.
    pub fn decrypt(
        &self,
        sender: &X25519PublicKey,
        receiver: &X25519PrivateKey,
    ) -> Result<PlainMessage> {
        decrypt(self, sender, receiver)
    }
}

impl fmt::Debug for EncryptedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptedMessage")
            .field("len", &self.ciphertext.len())
            .field("nonce", &self.nonce)
            .finish()
    }
}

/// Encrypt a message from `sender` to `receiver` using `OsRng`.
///
/// # Errors
///
/// Returns `ContentTooLarge` if the padded, sealed message would exceed
/// [`MAX_CONTENT_LENGTH`]. No box is computed in that case.
pub fn encrypt(
    msg: &PlainMessage,
    sender: &X25519PrivateKey,
    receiver: &X25519PublicKey,
) -> Result<EncryptedMessage> {
    encrypt_with(&mut OsRng, msg, sender, receiver)
}

/// Encrypt, drawing padding length and nonce from `rng`.
pub fn encrypt_with<R: RngCore + CryptoRng>(
    rng: &mut R,
    msg: &PlainMessage,
    sender: &X25519PrivateKey,
    receiver: &X25519PublicKey,
) -> Result<EncryptedMessage> {
    encrypt_with_limit(rng, msg, sender, receiver, MAX_CONTENT_LENGTH)
}

/// Encrypt under a size limit lower than [`MAX_CONTENT_LENGTH`].
///
/// A `max` above the transport limit is clamped to it.
pub fn encrypt_with_limit<R: RngCore + CryptoRng>(
    rng: &mut R,
    msg: &PlainMessage,
    sender: &X25519PrivateKey,
    receiver: &X25519PublicKey,
    max: usize,
) -> Result<EncryptedMessage> {
    let max = max.min(MAX_CONTENT_LENGTH);
    let message_type = msg.message_type();
    let body = msg.encode();
    let padded = pad_with(rng, &body);

    let sealed_len = padded.len() + TAG_SIZE;
    if sealed_len > max {
        debug!(
            ?message_type,
            sealed_len, max, "Message too large to encrypt"
        );
        return Err(ProtocolError::ContentTooLarge {
            max,
            actual: sealed_len,
        });
    }

    let (ciphertext, nonce) = box_seal_with(rng, sender, receiver, &padded)?;
    trace!(
        ?message_type,
        body_len = body.len(),
        padded_len = padded.len(),
        "Encrypted message"
    );
    EncryptedMessage::new(ciphertext, nonce)
}

/// Decrypt a message sent by `sender` to `receiver`.
///
/// # Errors
///
/// - `DecryptionFailed` if the box does not open (tampered or wrong keys)
/// - `InvalidFormat` if padding or body is malformed
/// - `UnknownMessageType` if the type tag is not recognized
pub fn decrypt(
    encrypted: &EncryptedMessage,
    sender: &X25519PublicKey,
    receiver: &X25519PrivateKey,
) -> Result<PlainMessage> {
    let padded = box_open(receiver, sender, &encrypted.nonce, &encrypted.ciphertext)
        .map_err(|e| {
            debug!(len = encrypted.ciphertext.len(), "Message failed to decrypt");
            ProtocolError::from(e)
        })?;
    let body = unpad(&padded)?;
    let msg = PlainMessage::decode(body)?;
    trace!(message_type = ?msg.message_type(), padded_len = padded.len(), "Decrypted message");
    Ok(msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::Blob;
    use crate::error::ErrorKind;
    use crate::message::{DeliveryReceipt, File, Image, Location, ReceiptType, RenderingType};
    use crate::padding::test_rng::FixedRng;
    use crate::types::{BlobId, MessageId};
    use courier_crypto::X25519KeyPair;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn keys() -> (X25519KeyPair, X25519KeyPair) {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        (
            X25519KeyPair::generate_with(&mut rng),
            X25519KeyPair::generate_with(&mut rng),
        )
    }

    fn roundtrip(msg: PlainMessage) {
        let (alice, bob) = keys();
        let enc = encrypt(&msg, alice.private_key(), bob.public_key()).unwrap();
        let dec = decrypt(&enc, alice.public_key(), bob.private_key()).unwrap();
        assert_eq!(dec, msg);
    }

    #[test]
    fn test_roundtrip_text() {
        roundtrip(PlainMessage::text("Hello, Bob!"));
    }

    #[test]
    fn test_roundtrip_location() {
        roundtrip(
            Location::new(46.947, 7.444)
                .and_then(|l| l.with_accuracy(12.5))
                .and_then(|l| l.with_address("Bern"))
                .unwrap()
                .into(),
        );
    }

    #[test]
    fn test_roundtrip_image() {
        let (alice, bob) = keys();
        let blob = Blob::new_image(alice.private_key(), bob.public_key());
        let uploaded = blob.uploaded(BlobId::from_array([1; 16]), 1234).unwrap();
        roundtrip(Image::new(&uploaded).into());
    }

    #[test]
    fn test_roundtrip_file() {
        let uploaded = Blob::new_file()
            .uploaded(BlobId::from_array([2; 16]), 99)
            .unwrap();
        let file = File::builder(uploaded, "text/plain", RenderingType::Default)
            .file_name("a.txt")
            .description("note")
            .build();
        roundtrip(file.into());
    }

    #[test]
    fn test_roundtrip_receipt() {
        roundtrip(
            DeliveryReceipt::new(
                ReceiptType::Received,
                vec![MessageId::from_array([7; 8]), MessageId::from_array([8; 8])],
            )
            .into(),
        );
    }

    #[test]
    fn test_receiver_can_not_be_impersonated() {
        let (alice, bob) = keys();
        let mallory = X25519KeyPair::generate();
        let enc = encrypt(&PlainMessage::text("hi"), alice.private_key(), bob.public_key()).unwrap();

        let err = decrypt(&enc, mallory.public_key(), bob.private_key()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authentication);
    }

    #[test]
    fn test_tampered_ciphertext() {
        let (alice, bob) = keys();
        let enc = encrypt(&PlainMessage::text("hi"), alice.private_key(), bob.public_key()).unwrap();
        let mut ct = enc.ciphertext().to_vec();
        let last = ct.len() - 1;
        ct[last] ^= 0x80;
        let tampered = EncryptedMessage::new(ct, *enc.nonce()).unwrap();
        let err = decrypt(&tampered, alice.public_key(), bob.private_key()).unwrap_err();
        assert_eq!(err, ProtocolError::DecryptionFailed);
    }

    #[test]
    fn test_min_length_with_deterministic_rng() {
        let (alice, bob) = keys();
        let enc = encrypt_with(
            &mut FixedRng(0),
            &PlainMessage::text("a"),
            alice.private_key(),
            bob.public_key(),
        )
        .unwrap();
        assert_eq!(enc.ciphertext().len(), 32 + TAG_SIZE);
    }

    #[test]
    fn test_too_large_rejected_before_boxing() {
        let (alice, bob) = keys();
        let msg = PlainMessage::text("x".repeat(MAX_CONTENT_LENGTH));
        let err = encrypt(&msg, alice.private_key(), bob.public_key()).unwrap_err();
        assert!(matches!(err, ProtocolError::ContentTooLarge { max: 4000, .. }));
    }

    #[test]
    fn test_largest_message_with_min_padding() {
        let (alice, bob) = keys();
        // tag byte + text + 1 padding byte + 16 tag bytes
        let text = "x".repeat(MAX_CONTENT_LENGTH - 1 - 1 - TAG_SIZE);
        let enc = encrypt_with(
            &mut FixedRng(0),
            &PlainMessage::text(text),
            alice.private_key(),
            bob.public_key(),
        )
        .unwrap();
        assert_eq!(enc.ciphertext().len(), MAX_CONTENT_LENGTH);
    }

    #[test]
    fn test_lower_limit() {
        let (alice, bob) = keys();
        let err = encrypt_with_limit(
            &mut FixedRng(0),
            &PlainMessage::text("hello"),
            alice.private_key(),
            bob.public_key(),
            40,
        )
        .unwrap_err();
        assert_eq!(err, ProtocolError::ContentTooLarge { max: 40, actual: 48 });
    }

    #[test]
    fn test_encrypted_message_limit() {
        assert!(EncryptedMessage::new(vec![0; 4000], Nonce::from_array([0; 24])).is_ok());
        let err = EncryptedMessage::new(vec![0; 4001], Nonce::from_array([0; 24])).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::ContentTooLarge {
                max: 4000,
                actual: 4001
            }
        );
    }

    #[test]
    fn test_encrypted_message_hex() {
        let enc = EncryptedMessage::from_hex(
            "0123456789ABCDEF",
            "001122334455667700112233445566770011223344556677",
        )
        .unwrap();
        assert_eq!(enc.ciphertext(), &[0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef]);
        assert_eq!(enc.ciphertext_hex(), "0123456789abcdef");
        assert_eq!(
            enc.nonce_hex(),
            "001122334455667700112233445566770011223344556677"
        );
    }

    #[test]
    fn test_encrypted_message_bad_hex() {
        let err = EncryptedMessage::from_hex("xyz", &"00".repeat(24)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        let err = EncryptedMessage::from_hex("00", "0011").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_debug_hides_ciphertext() {
        let enc = EncryptedMessage::new(vec![0xab; 20], Nonce::from_array([0; 24])).unwrap();
        let debug = format!("{:?}", enc);
        assert!(debug.contains("len: 20"));
        assert!(!debug.contains("abab"));
    }
}
