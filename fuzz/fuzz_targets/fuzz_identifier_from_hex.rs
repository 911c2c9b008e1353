//! Fuzz target for fixed-length identifier parsing.
//!
//! Tests that parsing arbitrary strings as hex identifiers is handled safely.

#![no_main]

use courier_protocol::{BlobId, Hash, Identity, MessageId, Nonce};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    // Should succeed for correctly sized hex, fail otherwise - never panic
    if let Ok(id) = MessageId::from_hex(s) {
        assert_eq!(MessageId::from_hex(&id.to_hex()).unwrap(), id);
    }
    if let Ok(id) = BlobId::from_hex(s) {
        assert_eq!(BlobId::from_hex(&id.to_hex()).unwrap(), id);
    }
    if let Ok(hash) = Hash::from_hex(s) {
        assert_eq!(hash.to_hex(), s.to_ascii_lowercase());
    }
    if let Ok(nonce) = Nonce::from_hex(s) {
        assert_eq!(nonce.as_bytes().len(), 24);
    }
    if let Ok(identity) = Identity::new(s) {
        assert_eq!(identity.as_bytes().len(), 8);
    }

    // Raw byte constructors
    let _ = MessageId::from_bytes(data);
    let _ = BlobId::from_bytes(data);
    let _ = Hash::from_bytes(data);
});
