//! `application/x-www-form-urlencoded` bodies.
//!
//! Encoding leaves `A-Z a-z 0-9 . - * _` as is, turns a space into `+` and
//! percent-encodes every other byte of the UTF-8 input. Decoding splits on
//! `&`, ignores any pair that does not contain exactly one `=`, and turns `+`
//! back into a space before percent-decoding.

use std::collections::HashMap;
use std::fmt;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::encryption::EncryptedMessage;
use crate::types::Identity;

const FORM: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'.')
    .remove(b'-')
    .remove(b'*')
    .remove(b'_');

fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, FORM)
        .to_string()
        .replace("%20", "+")
}

fn decode_component(value: &str) -> String {
    percent_decode_str(&value.replace('+', " "))
        .decode_utf8_lossy()
        .into_owned()
}

/// Incrementally built form body.
#[derive(Clone, Default)]
pub struct FormBody {
    buffer: String,
}

impl FormBody {
    /// Start an empty body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one `key=value` pair.
    pub fn add(mut self, key: &str, value: &str) -> Self {
        if !self.buffer.is_empty() {
            self.buffer.push('&');
        }
        self.buffer.push_str(&encode_component(key));
        self.buffer.push('=');
        self.buffer.push_str(&encode_component(value));
        self
    }

    /// The encoded body.
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Consume into the encoded body.
    pub fn into_string(self) -> String {
        self.buffer
    }
}

// Bodies usually carry the API secret.
impl fmt::Debug for FormBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormBody")
            .field("len", &self.buffer.len())
            .finish()
    }
}

/// Body for sending an end-to-end encrypted message through the gateway.
pub fn send_e2e_body(
    from: &Identity,
    secret: &str,
    to: &Identity,
    message: &EncryptedMessage,
) -> FormBody {
    FormBody::new()
        .add("from", from.as_str())
        .add("secret", secret)
        .add("to", to.as_str())
        .add("box", &message.ciphertext_hex())
        .add("nonce", &message.nonce_hex())
}

/// Decode a form body into a field map.
///
/// When a key occurs more than once the last value wins.
pub fn decode(body: &str) -> HashMap<String, String> {
    body.split('&')
        .filter_map(|pair| {
            let mut parts = pair.split('=');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(key), Some(value), None) => {
                    Some((decode_component(key), decode_component(value)))
                }
                _ => None,
            }
        })
        .collect()
}
