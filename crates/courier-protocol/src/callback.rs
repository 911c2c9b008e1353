//! Verification of inbound gateway callbacks.
//!
//! The gateway delivers incoming messages as a form-encoded POST body. The
//! body carries a MAC over its fields keyed with the API secret:
//!
//! ```text
//! mac = hex(HMAC-SHA256(secret, from || to || messageId || date || nonce || box))
//! ```
//!
//! A [`GatewayCallback`] only exists once that MAC has been checked.
//!
//! ## Security Properties
//!
//! - Missing fields are reported before any MAC work
//! - The MAC comparison runs in constant time
//! - Nothing is parsed from the body until the MAC matches

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use courier_crypto::{constant_time_eq, hmac_sha256_parts, X25519PrivateKey, X25519PublicKey};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::encryption::EncryptedMessage;
use crate::error::{ProtocolError, Result};
use crate::form;
use crate::message::PlainMessage;
use crate::types::{Identity, MessageId};

/// Fields covered by the MAC, in MAC order.
pub const SIGNED_FIELDS: [&str; 6] = ["from", "to", "messageId", "date", "nonce", "box"];

/// Field carrying the MAC.
pub const MAC_FIELD: &str = "mac";

/// Verifies callbacks with a shared API secret.
///
/// One verifier can check any number of callbacks.
#[derive(Clone)]
pub struct CallbackVerifier {
    secret: Zeroizing<String>,
}

impl CallbackVerifier {
    /// Create a verifier for the given API secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Zeroizing::new(secret.into()),
        }
    }

    /// Verify a raw body.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if the body is not UTF-8, otherwise as
    /// [`CallbackVerifier::verify`].
    pub fn verify_bytes(&self, body: &[u8]) -> Result<GatewayCallback> {
        let body = std::str::from_utf8(body)
            .map_err(|e| ProtocolError::format("callback body", e.to_string()))?;
        self.verify(body)
    }

    /// Verify a form-encoded body and decode it.
    ///
    /// # Errors
    ///
    /// - `MissingField` naming the first absent field, checked in the order
    ///   `from, to, messageId, date, nonce, box, mac`
    /// - `InvalidSignature` if the MAC does not match
    /// - identifier, hex or size errors for fields that fail to parse after
    ///   the MAC matched
    pub fn verify(&self, body: &str) -> Result<GatewayCallback> {
        let fields = form::decode(body);

        let mut signed: [&str; SIGNED_FIELDS.len()] = [""; SIGNED_FIELDS.len()];
        for (slot, name) in signed.iter_mut().zip(SIGNED_FIELDS) {
            *slot = required(&fields, name)?;
        }
        let mac = required(&fields, MAC_FIELD)?;

        let parts = signed.map(str::as_bytes);
        let expected = hex::encode(hmac_sha256_parts(self.secret.as_bytes(), &parts));
        if !constant_time_eq(expected.as_bytes(), mac.as_bytes()) {
            warn!(from = signed[0], "Rejected callback with invalid signature");
            return Err(ProtocolError::InvalidSignature);
        }

        let [from, to, message_id, date, nonce, ciphertext] = signed;
        let callback = GatewayCallback {
            from: Identity::new(from)?,
            to: Identity::new(to)?,
            message_id: MessageId::from_hex(message_id)?,
            date: parse_date(date)?,
            message: EncryptedMessage::from_hex(ciphertext, nonce)?,
            nickname: fields.get("nickname").cloned(),
        };
        debug!(
            from = %callback.from,
            message_id = %callback.message_id,
            "Verified callback"
        );
        Ok(callback)
    }
}

impl fmt::Debug for CallbackVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackVerifier")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Verify a callback body with `secret` in one call.
pub fn verify_callback(body: &str, secret: &str) -> Result<GatewayCallback> {
    CallbackVerifier::new(secret).verify(body)
}

fn required<'a>(fields: &'a HashMap<String, String>, name: &'static str) -> Result<&'a str> {
    match fields.get(name) {
        Some(value) => Ok(value.as_str()),
        None => {
            debug!(field = name, "Callback is missing a field");
            Err(ProtocolError::MissingField(name))
        }
    }
}

fn parse_date(value: &str) -> Result<DateTime<Utc>> {
    let seconds: i64 = value
        .parse()
        .map_err(|_| ProtocolError::format("callback date", format!("not a number: {:?}", value)))?;
    DateTime::<Utc>::from_timestamp(seconds, 0)
        .ok_or_else(|| ProtocolError::format("callback date", format!("out of range: {}", seconds)))
}

/// A verified inbound message notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayCallback {
    from: Identity,
    to: Identity,
    message_id: MessageId,
    date: DateTime<Utc>,
    message: EncryptedMessage,
    nickname: Option<String>,
}

impl GatewayCallback {
    /// Sender identity.
    pub fn from(&self) -> &Identity {
        &self.from
    }

    /// Receiving gateway identity.
    pub fn to(&self) -> &Identity {
        &self.to
    }

    /// Sender-assigned message id.
    pub fn message_id(&self) -> &MessageId {
        &self.message_id
    }

    /// Time the message was sent.
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// The encrypted message.
    pub fn message(&self) -> &EncryptedMessage {
        &self.message
    }

    /// Public nickname of the sender, if set.
    pub fn nickname(&self) -> Option<&str> {
        self.nickname.as_deref()
    }

    /// Decrypt the embedded message.
    ///
    /// `sender` is the public key of [`GatewayCallback::from`], typically
    /// looked up from the gateway or a local cache.
    pub fn decrypt(
        &self,
        sender: &X25519PublicKey,
        receiver: &X25519PrivateKey,
    ) -> Result<PlainMessage> {
        self.message.decrypt(sender, receiver)
    }
}
