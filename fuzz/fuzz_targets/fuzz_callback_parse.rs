//! Fuzz target for callback verification.
//!
//! Tests that arbitrary form bodies are rejected gracefully.

#![no_main]

use courier_protocol::{form, CallbackVerifier, ErrorKind};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let verifier = CallbackVerifier::new("fuzz-secret");

    // Form decoding must never panic on any UTF-8 input
    if let Ok(body) = std::str::from_utf8(data) {
        let _fields = form::decode(body);
    }

    // A random body essentially never carries a valid MAC
    match verifier.verify_bytes(data) {
        Ok(_) => {}
        Err(e) => assert!(matches!(
            e.kind(),
            ErrorKind::MissingField
                | ErrorKind::Signature
                | ErrorKind::Format
                | ErrorKind::Validation
        )),
    }
});
