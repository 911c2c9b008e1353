//! Payloads for looking up many contacts in one request.
//!
//! The request lists phone and email hashes as hex; the response is an array
//! of matches, each naming the hash it matched, the identity and its public
//! key. Issuing the request is left to the caller.

use std::collections::HashMap;

use courier_crypto::X25519PublicKey;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ProtocolError, Result};
use crate::types::{Hash, Identity};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BulkRequest {
    phone_hashes: Vec<String>,
    email_hashes: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BulkResponseItem {
    #[serde(default)]
    phone_hash: Option<String>,
    #[serde(default)]
    email_hash: Option<String>,
    identity: String,
    public_key: String,
}

/// Identity and public key returned for a matched hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityKey {
    /// Matched identity.
    pub identity: Identity,
    /// Its public key.
    pub public_key: X25519PublicKey,
}

/// Build the JSON request body.
pub fn write_request<'a>(
    phone_hashes: impl IntoIterator<Item = &'a Hash>,
    email_hashes: impl IntoIterator<Item = &'a Hash>,
) -> String {
    let request = BulkRequest {
        phone_hashes: phone_hashes.into_iter().map(Hash::to_hex).collect(),
        email_hashes: email_hashes.into_iter().map(Hash::to_hex).collect(),
    };
    // A struct of string lists always serializes.
    serde_json::to_string(&request).unwrap_or_default()
}

/// Parse the JSON response body into a map keyed by the matched hash.
///
/// An entry carrying both a phone and an email hash appears under both.
///
/// # Errors
///
/// Returns `InvalidFormat` for malformed JSON, and the usual identifier
/// errors for a bad hash, identity or key.
pub fn read_response(body: &str) -> Result<HashMap<Hash, IdentityKey>> {
    let items: Vec<BulkResponseItem> = serde_json::from_str(body)
        .map_err(|e| ProtocolError::format("bulk lookup response", e.to_string()))?;

    let mut result = HashMap::with_capacity(items.len());
    for item in items {
        let key = IdentityKey {
            identity: Identity::new(item.identity)?,
            public_key: X25519PublicKey::from_hex(&item.public_key)
                .map_err(|e| ProtocolError::from(e).for_kind("public key"))?,
        };
        if let Some(hash) = &item.phone_hash {
            result.insert(Hash::from_hex(hash)?, key.clone());
        }
        if let Some(hash) = &item.email_hash {
            result.insert(Hash::from_hex(hash)?, key);
        }
    }
    debug!(matches = result.len(), "Parsed bulk lookup response");
    Ok(result)
}
