//! Random-length message padding.
//!
//! A padded body is the original bytes followed by `P` copies of the byte
//! `P`, where `P` is drawn uniformly from `[max(1, 32 - len), 255]`. Short
//! messages therefore always reach the minimum padded length, and the last
//! byte of any padded body says how much to strip.
//!
//! ## Security Properties
//!
//! - Every padded body is at least [`MIN_PADDED_LENGTH`] bytes
//! - The padding length comes from a cryptographically secure source
//! - Unpadding never reads outside the buffer

use rand::rngs::OsRng;
use rand::{CryptoRng, Rng, RngCore};

use crate::error::{ProtocolError, Result};
use crate::limits::{MAX_PADDING, MIN_PADDED_LENGTH, MIN_PADDING};

/// Smallest padding length allowed for a body of `len` bytes.
pub fn min_padding_for(len: usize) -> usize {
    MIN_PADDED_LENGTH.saturating_sub(len).max(MIN_PADDING)
}

/// Pad `data` using the operating system's random source.
///
/// # Example
///
/// ```
/// use courier_protocol::padding::{pad, unpad};
///
/// let padded = pad(b"hi");
/// assert!(padded.len() >= 32);
/// assert_eq!(unpad(&padded).unwrap(), b"hi");
/// ```
pub fn pad(data: &[u8]) -> Vec<u8> {
    pad_with(&mut OsRng, data)
}

/// Pad `data`, drawing the padding length from `rng`.
pub fn pad_with<R: RngCore + CryptoRng>(rng: &mut R, data: &[u8]) -> Vec<u8> {
    // Both bounds fit in a u8, so the trailer byte can hold the length.
    let low = min_padding_for(data.len()) as u8;
    let padding = rng.gen_range(low..=MAX_PADDING as u8);

    let mut padded = Vec::with_capacity(data.len() + padding as usize);
    padded.extend_from_slice(data);
    padded.resize(data.len() + padding as usize, padding);
    padded
}

/// Strip the padding from a padded body.
///
/// A trailer byte of zero means nothing was appended and the whole buffer is
/// returned.
///
/// # Errors
///
/// Returns `InvalidFormat` if the buffer is empty or the trailer byte claims
/// more padding than there are bytes.
pub fn unpad(padded: &[u8]) -> Result<&[u8]> {
    let Some(&last) = padded.last() else {
        return Err(ProtocolError::format("padding", "empty buffer"));
    };
    let padding = last as usize;
    if padding > padded.len() {
        return Err(ProtocolError::format(
            "padding",
            format!(
                "claims {} bytes but only {} available",
                padding,
                padded.len()
            ),
        ));
    }
    Ok(&padded[..padded.len() - padding])
}
