//! HMAC-SHA256 and constant-time comparison.
//!
//! Used for the keyed contact-lookup hashes and for webhook signatures.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

/// Size of an HMAC-SHA256 output in bytes.
pub const MAC_SIZE: usize = 32;

type HmacSha256 = Hmac<Sha256>;

/// Compute HMAC-SHA256 over a single input.
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> [u8; MAC_SIZE] {
    hmac_sha256_parts(key, &[data])
}

/// Compute HMAC-SHA256 over the concatenation of `parts`, with no separators.
pub fn hmac_sha256_parts(key: &[u8], parts: &[&[u8]]) -> [u8; MAC_SIZE] {
    let mut mac =
        <HmacSha256 as Mac>::new_from_slice(key).expect("HMAC can take key of any size");
    for part in parts {
        mac.update(part);
    }
    let mut output = [0u8; MAC_SIZE];
    output.copy_from_slice(&mac.finalize().into_bytes());
    output
}

/// Compare two byte strings in constant time.
///
/// Length is not secret: inputs of different lengths compare unequal
/// immediately.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
