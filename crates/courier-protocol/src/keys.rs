//! Key encoding helpers.
//!
//! Keys travel as lowercase hex. Contacts are shared as QR-code text of the
//! form `3mid:<IDENTITY>,<public key hex>`.

use courier_crypto::{X25519KeyPair, X25519PrivateKey, X25519PublicKey};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use crate::error::{ProtocolError, Result};
use crate::types::{Identity, SymmetricKey};

/// Prefix of contact QR-code text.
pub const QR_CODE_PREFIX: &str = "3mid:";

/// Decode a public key from hex.
pub fn decode_public_key(hex_str: &str) -> Result<X25519PublicKey> {
    X25519PublicKey::from_hex(hex_str).map_err(|e| ProtocolError::from(e).for_kind("public key"))
}

/// Decode a private key from hex.
pub fn decode_private_key(hex_str: &str) -> Result<X25519PrivateKey> {
    X25519PrivateKey::from_hex(hex_str).map_err(|e| ProtocolError::from(e).for_kind("private key"))
}

/// Decode a blob key from hex.
pub fn decode_secret_key(hex_str: &str) -> Result<SymmetricKey> {
    crate::types::key_from_hex(hex_str, "secret key")
}

/// Derive the public key belonging to `private`.
pub fn derive_public_key(private: &X25519PrivateKey) -> X25519PublicKey {
    private.public_key()
}

/// Generate a new key pair from `OsRng`.
pub fn generate_key_pair() -> X25519KeyPair {
    generate_key_pair_with(&mut OsRng)
}

/// Generate a new key pair from `rng`.
pub fn generate_key_pair_with<R: RngCore + CryptoRng>(rng: &mut R) -> X25519KeyPair {
    X25519KeyPair::generate_with(rng)
}

/// QR-code text identifying a contact and its public key.
///
/// # Example
///
/// ```
/// use courier_protocol::keys::{decode_public_key, qr_code};
/// use courier_protocol::types::Identity;
///
/// let key = decode_public_key(&"ab".repeat(32)).unwrap();
/// let text = qr_code(&Identity::new("ECHOECHO").unwrap(), &key);
/// assert_eq!(text, format!("3mid:ECHOECHO,{}", "ab".repeat(32)));
/// ```
pub fn qr_code(identity: &Identity, public_key: &X25519PublicKey) -> String {
    format!("{}{},{}", QR_CODE_PREFIX, identity, public_key.to_hex())
}

/// Parse QR-code text back into identity and public key.
///
/// # Errors
///
/// Returns `InvalidFormat` if the prefix or separator is missing, and the
/// usual identifier errors for a bad identity or key.
pub fn parse_qr_code(text: &str) -> Result<(Identity, X25519PublicKey)> {
    let rest = text
        .strip_prefix(QR_CODE_PREFIX)
        .ok_or_else(|| ProtocolError::format("qr code", "missing 3mid: prefix"))?;
    let (identity, key) = rest
        .split_once(',')
        .ok_or_else(|| ProtocolError::format("qr code", "missing separator"))?;
    Ok((Identity::new(identity)?, decode_public_key(key)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    // RFC 7748, section 6.1
    const ALICE_PRIVATE: &str = "77076d0a7318a57d3c16c17251b26645df4c2f87ebc0992ab177fba51db92c2a";
    const ALICE_PUBLIC: &str = "8520f0098930a754748b7ddcb43ef75a0dbf3a0d26381af4eba4a98eaa9b4e6a";

    #[test]
    fn test_derive_public_key() {
        let private = decode_private_key(ALICE_PRIVATE).unwrap();
        assert_eq!(derive_public_key(&private).to_hex(), ALICE_PUBLIC);
    }

    #[test]
    fn test_private_key_hex_roundtrip() {
        let private = decode_private_key(&ALICE_PRIVATE.to_uppercase()).unwrap();
        assert_eq!(private.to_hex(), ALICE_PRIVATE);
    }

    #[test]
    fn test_decode_errors_name_key() {
        assert!(matches!(
            decode_public_key("00ff").unwrap_err(),
            ProtocolError::InvalidLength { kind: "public key", expected: 32, actual: 2 }
        ));
        assert!(matches!(
            decode_private_key("nothex").unwrap_err(),
            ProtocolError::InvalidHex { kind: "private key", .. }
        ));
        assert_eq!(decode_secret_key("00").unwrap_err().kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_generated_pair_is_consistent() {
        let pair = generate_key_pair();
        assert_eq!(&derive_public_key(pair.private_key()), pair.public_key());
    }

    #[test]
    fn test_qr_code_roundtrip() {
        let identity = Identity::new("ECHOECHO").unwrap();
        let key = decode_public_key(ALICE_PUBLIC).unwrap();
        let text = qr_code(&identity, &key);
        assert_eq!(text, format!("3mid:ECHOECHO,{}", ALICE_PUBLIC));
        assert_eq!(parse_qr_code(&text).unwrap(), (identity, key));
    }

    #[test]
    fn test_parse_qr_code_errors() {
        assert_eq!(parse_qr_code("ECHOECHO,00").unwrap_err().kind(), ErrorKind::Format);
        assert_eq!(parse_qr_code("3mid:ECHOECHO").unwrap_err().kind(), ErrorKind::Format);
        assert_eq!(
            parse_qr_code(&format!("3mid:SHORT,{}", ALICE_PUBLIC)).unwrap_err().kind(),
            ErrorKind::Validation
        );
    }
}
