//! Privacy-preserving contact lookup.
//!
//! Phone numbers and email addresses are never sent in the clear. They are
//! normalized and hashed with HMAC-SHA256 under a fixed, public domain key per
//! kind, so the two kinds can never produce colliding lookups.

pub mod bulk;

use courier_crypto::hmac_sha256;
use tracing::trace;

use crate::types::Hash;

pub use bulk::{read_response, write_request, IdentityKey};

/// Domain key for phone number hashes.
const PHONE_HMAC_KEY: [u8; 32] = [
    0x85, 0xad, 0xf8, 0x22, 0x69, 0x53, 0xf3, 0xd9, 0x6c, 0xfd, 0x5d, 0x09, 0xbf, 0x29, 0x55, 0x5e,
    0xb9, 0x55, 0xfc, 0xd8, 0xaa, 0x5e, 0xc4, 0xf9, 0xfc, 0xd8, 0x69, 0xe2, 0x58, 0x37, 0x07, 0x23,
];

/// Domain key for email address hashes.
const EMAIL_HMAC_KEY: [u8; 32] = [
    0x30, 0xa5, 0x50, 0x0f, 0xed, 0x97, 0x01, 0xfa, 0x6d, 0xef, 0xdb, 0x61, 0x08, 0x41, 0x90, 0x0f,
    0xeb, 0xb8, 0xe4, 0x30, 0x88, 0x1f, 0x7a, 0xd8, 0x16, 0x82, 0x62, 0x64, 0xec, 0x09, 0xba, 0xd7,
];

/// Normalize a phone number to its decimal digits.
pub fn normalize_phone(number: &str) -> String {
    number.chars().filter(char::is_ascii_digit).collect()
}

/// Normalize an email address: trim surrounding whitespace, lowercase ASCII.
pub fn normalize_email(address: &str) -> String {
    address.trim().to_ascii_lowercase()
}

/// Lookup hash of a phone number.
///
/// Every character other than `0-9` is dropped first, so formatting does not
/// matter.
///
/// # Example
///
/// ```
/// use courier_protocol::lookup::of_phone;
///
/// assert_eq!(of_phone("+41 79 123 45-67"), of_phone("41791234567"));
/// ```
pub fn of_phone(number: &str) -> Hash {
    let normalized = normalize_phone(number);
    trace!(digits = normalized.len(), "Hashing phone number");
    Hash::from_array(hmac_sha256(&PHONE_HMAC_KEY, normalized.as_bytes()))
}

/// Lookup hash of an email address.
pub fn of_email(address: &str) -> Hash {
    let normalized = normalize_email(address);
    Hash::from_array(hmac_sha256(&EMAIL_HMAC_KEY, normalized.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_known_answer() {
        assert_eq!(
            of_phone("+41 79 123 45-67").to_hex(),
            "ad398f4d7ebe63c6550a486cc6e07f9baa09bd9d8b3d8cb9d9be106d35a7fdbc"
        );
    }

    #[test]
    fn test_email_known_answer() {
        assert_eq!(
            of_email("  Test@Threema.ch ").to_hex(),
            "1ea093239cc5f0e1b6ec81b866265b921f26dc4033025410063309f4d1a8ee2c"
        );
    }

    #[test]
    fn test_phone_formats_collapse() {
        let h = of_phone("41791234567");
        assert_eq!(of_phone("+41 (79) 123-45-67"), h);
        assert_ne!(of_phone("0041791234567"), h);
    }

    #[test]
    fn test_email_variants_collapse() {
        let h = of_email("test@threema.ch");
        assert_eq!(of_email("TEST@THREEMA.CH"), h);
        assert_eq!(of_email("\ttest@threema.ch\n"), h);
    }

    #[test]
    fn test_domains_are_separated() {
        assert_ne!(of_phone("123"), of_email("123"));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_phone("+41 79 123 45-67"), "41791234567");
        assert_eq!(normalize_phone("no digits"), "");
        assert_eq!(normalize_email("  Foo@Bar.COM "), "foo@bar.com");
    }
}
