//! Fuzz target for message padding.
//!
//! Tests that unpadding arbitrary data never panics and that padding any
//! input can always be undone.

#![no_main]

use courier_protocol::limits::{MAX_PADDING, MIN_PADDED_LENGTH};
use courier_protocol::padding::{pad, unpad};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Should succeed or fail gracefully - never panic
    if let Ok(body) = unpad(data) {
        assert!(body.len() <= data.len());
        assert_eq!(data.len() - body.len(), *data.last().unwrap() as usize);
    }

    let padded = pad(data);
    assert!(padded.len() >= MIN_PADDED_LENGTH);
    assert!(padded.len() <= data.len() + MAX_PADDING);
    assert_eq!(unpad(&padded).unwrap(), data);
});
