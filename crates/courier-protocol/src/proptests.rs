//! Property-based tests for protocol components.
//!
//! - Padding bounds and inversion for arbitrary inputs
//! - Message codec round trips for every variant
//! - End-to-end round trips and tamper detection
//! - Lookup normalization collapsing formatting variants
//! - Untrusted decoders never panic

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::encryption::{decrypt, encrypt_with, EncryptedMessage};
use crate::error::{ErrorKind, ProtocolError};
use crate::form;
use crate::blob::Blob;
use crate::limits::{MAX_BLOB_SIZE, MAX_PADDING, MIN_PADDED_LENGTH};
use crate::lookup::{of_email, of_phone};
use crate::message::{
    DeliveryReceipt, File, Image, Location, PlainMessage, ReceiptType, RenderingType,
};
use crate::padding::{pad_with, unpad};
use crate::types::{BlobId, MessageId, Nonce, SymmetricKey};
use courier_crypto::X25519KeyPair;

fn receipt_type() -> impl Strategy<Value = ReceiptType> {
    (0u8..=4).prop_map(|v| ReceiptType::from_u8(v).unwrap())
}

fn message_id() -> impl Strategy<Value = MessageId> {
    any::<[u8; 8]>().prop_map(MessageId::from_array)
}

fn location() -> impl Strategy<Value = Location> {
    (
        -90.0f64..90.0,
        -180.0f64..180.0,
        prop::option::of(0.0f64..10_000.0),
        prop::option::of(("[^\n]{0,20}", prop::option::of("[^\n]{0,20}"))),
    )
        .prop_map(|(lat, lon, accuracy, lines)| {
            let mut location = Location::new(lat, lon).unwrap();
            if let Some(accuracy) = accuracy {
                location = location.with_accuracy(accuracy).unwrap();
            }
            match lines {
                Some((address, None)) => location.with_address(address).unwrap(),
                Some((address, Some(name))) => {
                    location.with_name_and_address(name, address).unwrap()
                }
                None => location,
            }
        })
}

fn blob_id() -> impl Strategy<Value = BlobId> {
    any::<[u8; 16]>().prop_map(BlobId::from_array)
}

fn blob_size() -> impl Strategy<Value = usize> {
    (0..=MAX_BLOB_SIZE).prop_map(|s| s as usize)
}

fn image() -> impl Strategy<Value = Image> {
    (any::<[u8; 32]>(), any::<[u8; 24]>(), blob_id(), blob_size()).prop_map(
        |(key, nonce, id, size)| {
            let blob = Blob::image(SymmetricKey::from(key), Nonce::from_array(nonce));
            Image::new(&blob.uploaded(id, size).unwrap())
        },
    )
}

fn file() -> impl Strategy<Value = File> {
    (
        any::<[u8; 32]>(),
        blob_id(),
        blob_size(),
        prop::option::of(blob_id()),
        "[a-z]{1,10}/[a-z0-9.+-]{1,20}",
        0u8..=2,
        prop::option::of(".{0,30}"),
        prop::option::of(".{0,60}"),
        prop::option::of("[A-Za-z0-9-]{0,16}"),
    )
        .prop_map(
            |(key, id, size, thumb_id, mime, rendering, name, description, correlation)| {
                let file = Blob::file(SymmetricKey::from(key)).uploaded(id, size).unwrap();
                let thumbnail = thumb_id.map(|t| file.thumbnail().uploaded(t, 0).unwrap());
                let rendering = RenderingType::from_u8(rendering).unwrap();

                let mut builder = File::builder(file, mime, rendering);
                if let Some(thumbnail) = &thumbnail {
                    builder = builder.thumbnail(thumbnail);
                }
                if let Some(name) = name {
                    builder = builder.file_name(name);
                }
                if let Some(description) = description {
                    builder = builder.description(description);
                }
                if let Some(correlation) = correlation {
                    builder = builder.correlation_id(correlation);
                }
                builder.build()
            },
        )
}

fn plain_message() -> impl Strategy<Value = PlainMessage> {
    prop_oneof![
        ".{0,200}".prop_map(PlainMessage::Text),
        location().prop_map(PlainMessage::Location),
        image().prop_map(PlainMessage::Image),
        file().prop_map(PlainMessage::File),
        (receipt_type(), prop::collection::vec(message_id(), 0..20))
            .prop_map(|(t, ids)| PlainMessage::DeliveryReceipt(DeliveryReceipt::new(t, ids))),
    ]
}

// ==================== Padding Property Tests ====================

proptest! {
    /// Padding is always removable and stays within its bounds.
    #[test]
    fn pad_unpad_roundtrip(data: Vec<u8>, seed: u64) {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let padded = pad_with(&mut rng, &data);

        prop_assert!(padded.len() >= MIN_PADDED_LENGTH.max(data.len() + 1));
        prop_assert!(padded.len() <= data.len() + MAX_PADDING);

        let added = padded.len() - data.len();
        prop_assert_eq!(padded[padded.len() - 1] as usize, added);
        prop_assert!(padded[data.len()..].iter().all(|&b| b as usize == added));
        prop_assert_eq!(unpad(&padded).unwrap(), data.as_slice());
    }

    /// Unpadding arbitrary bytes never panics and never grows the input.
    #[test]
    fn unpad_arbitrary(data: Vec<u8>) {
        match unpad(&data) {
            Ok(body) => {
                prop_assert!(body.len() <= data.len());
            }
            Err(e) => {
                prop_assert_eq!(e.kind(), ErrorKind::Format);
            }
        }
    }
}

// ==================== Codec Property Tests ====================

proptest! {
    /// Every message decodes back to itself.
    #[test]
    fn codec_roundtrip(msg in plain_message()) {
        let decoded = PlainMessage::decode(&msg.encode()).unwrap();
        prop_assert_eq!(decoded, msg);
    }

    /// Decoding arbitrary bytes yields a value or a classified error.
    #[test]
    fn decode_arbitrary(data: Vec<u8>) {
        if let Err(e) = PlainMessage::decode(&data) {
            prop_assert!(matches!(
                e.kind(),
                ErrorKind::Format | ErrorKind::UnknownType
            ));
        }
    }
}

// ==================== End-to-End Property Tests ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Encrypt then decrypt returns the original message.
    #[test]
    fn e2e_roundtrip(msg in plain_message(), seed: u64) {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let alice = X25519KeyPair::generate_with(&mut rng);
        let bob = X25519KeyPair::generate_with(&mut rng);

        let enc = encrypt_with(&mut rng, &msg, alice.private_key(), bob.public_key()).unwrap();
        let dec = decrypt(&enc, alice.public_key(), bob.private_key()).unwrap();
        prop_assert_eq!(dec, msg);
    }

    /// Flipping any ciphertext byte fails authentication.
    #[test]
    fn e2e_detects_tampering(
        text in ".{0,100}",
        position in any::<prop::sample::Index>(),
        mask in 1u8..=255,
    ) {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let alice = X25519KeyPair::generate_with(&mut rng);
        let bob = X25519KeyPair::generate_with(&mut rng);
        let enc = encrypt_with(
            &mut rng,
            &PlainMessage::text(text),
            alice.private_key(),
            bob.public_key(),
        )
        .unwrap();

        let mut ct = enc.ciphertext().to_vec();
        let i = position.index(ct.len());
        ct[i] ^= mask;
        let tampered = EncryptedMessage::new(ct, *enc.nonce()).unwrap();
        prop_assert_eq!(
            decrypt(&tampered, alice.public_key(), bob.private_key()),
            Err(ProtocolError::DecryptionFailed)
        );
    }
}

// ==================== Lookup Property Tests ====================

proptest! {
    /// Separators and punctuation never change a phone hash.
    #[test]
    fn phone_formatting_collapses(digits in "[0-9]{4,15}", noise in "[ +()/.-]{0,3}") {
        let formatted: String = digits
            .chars()
            .flat_map(|c| std::iter::once(c).chain(noise.chars()))
            .collect();
        prop_assert_eq!(of_phone(&formatted), of_phone(&digits));
    }

    /// Case and surrounding whitespace never change an email hash.
    #[test]
    fn email_variants_collapse(local in "[a-z0-9.]{1,12}", domain in "[a-z]{1,10}\\.[a-z]{2,4}") {
        let address = format!("{}@{}", local, domain);
        let variant = format!("  {}\t", address.to_ascii_uppercase());
        prop_assert_eq!(of_email(&variant), of_email(&address));
    }
}

// ==================== Form Property Tests ====================

proptest! {
    /// Any key and value survive form encoding.
    #[test]
    fn form_roundtrip(key in "[a-zA-Z]{1,10}", value in ".{0,40}") {
        let body = form::FormBody::new().add(&key, &value).into_string();
        let fields = form::decode(&body);
        prop_assert_eq!(fields.get(&key), Some(&value));
    }
}
