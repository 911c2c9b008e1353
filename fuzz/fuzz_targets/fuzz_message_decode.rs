//! Fuzz target for PlainMessage::decode.
//!
//! Tests that decoding arbitrary bytes as a message body is handled safely.

#![no_main]

use courier_protocol::PlainMessage;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Should succeed for valid bodies, fail otherwise - never panic
    if let Ok(msg) = PlainMessage::decode(data) {
        assert_eq!(msg.message_type().as_u8(), data[0]);

        // Re-encoding a decoded message must decode to the same value
        let reencoded = msg.encode();
        let roundtrip = PlainMessage::decode(&reencoded).unwrap();
        assert_eq!(msg, roundtrip);
    }
});
