//! Gateway account configuration.
//!
//! Holds the gateway identity, the API secret (also used to verify
//! callbacks), the private key for end-to-end mode and an optional lower size
//! limit for outgoing messages.
//!
//! # Example
//!
//! ```
//! use courier_protocol::config::GatewayConfig;
//!
//! let config = GatewayConfig::builder()
//!     .with_identity("*GATEWAY")
//!     .with_secret("api-secret")
//!     .with_private_key(&"11".repeat(32))
//!     .build_validated()
//!     .unwrap();
//!
//! let verifier = config.callback_verifier();
//! let private_key = config.private_key().unwrap();
//! # let _ = (verifier, private_key);
//! ```

use std::fmt;

use courier_crypto::{X25519PrivateKey, PRIVATE_KEY_SIZE, TAG_SIZE};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::callback::CallbackVerifier;
use crate::limits::{MAX_CONTENT_LENGTH, MIN_PADDED_LENGTH};
use crate::types::Identity;

/// Smallest usable content limit: one minimally padded message.
pub const MIN_CONTENT_LENGTH: usize = MIN_PADDED_LENGTH + TAG_SIZE;

fn default_max_content_length() -> usize {
    MAX_CONTENT_LENGTH
}

/// Errors found while validating a [`GatewayConfig`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The field name.
        field: String,
        /// The reason it's invalid.
        reason: String,
    },

    /// Missing required configuration.
    #[error("Missing required configuration: {0}")]
    MissingValue(String),

    /// The configuration document could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Gateway account configuration.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct GatewayConfig {
    /// Gateway identity, e.g. `*GATEWAY`.
    #[serde(default)]
    pub identity: String,

    /// API secret; also keys callback MACs.
    #[serde(default)]
    pub secret: String,

    /// Private key in hex, for end-to-end mode.
    #[serde(default)]
    pub private_key: String,

    /// Upper bound on encrypted message size; may only be lowered.
    #[serde(default = "default_max_content_length")]
    pub max_content_length: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            identity: String::new(),
            secret: String::new(),
            private_key: String::new(),
            max_content_length: MAX_CONTENT_LENGTH,
        }
    }
}

impl GatewayConfig {
    /// Create a builder.
    pub fn builder() -> GatewayConfigBuilder {
        GatewayConfigBuilder::new()
    }

    /// Parse from JSON and validate.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// Returns an error naming the first field that is missing or invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.identity.is_empty() {
            return Err(ConfigError::MissingValue("identity".into()));
        }
        if Identity::new(self.identity.as_str()).is_err() {
            return Err(ConfigError::InvalidValue {
                field: "identity".into(),
                reason: "identity must be exactly 8 printable ASCII characters".into(),
            });
        }

        if self.secret.is_empty() {
            return Err(ConfigError::MissingValue("secret".into()));
        }

        if self.private_key.is_empty() {
            return Err(ConfigError::MissingValue("private_key".into()));
        }
        if X25519PrivateKey::from_hex(&self.private_key).is_err() {
            return Err(ConfigError::InvalidValue {
                field: "private_key".into(),
                reason: format!("private key must be {} bytes of hex", PRIVATE_KEY_SIZE),
            });
        }

        if !(MIN_CONTENT_LENGTH..=MAX_CONTENT_LENGTH).contains(&self.max_content_length) {
            return Err(ConfigError::InvalidValue {
                field: "max_content_length".into(),
                reason: format!(
                    "max content length must be between {} and {}",
                    MIN_CONTENT_LENGTH, MAX_CONTENT_LENGTH
                ),
            });
        }

        Ok(())
    }

    /// The gateway identity.
    pub fn identity(&self) -> Result<Identity, ConfigError> {
        Identity::new(self.identity.as_str()).map_err(|e| ConfigError::InvalidValue {
            field: "identity".into(),
            reason: e.to_string(),
        })
    }

    /// The decoded private key.
    pub fn private_key(&self) -> Result<X25519PrivateKey, ConfigError> {
        X25519PrivateKey::from_hex(&self.private_key).map_err(|e| ConfigError::InvalidValue {
            field: "private_key".into(),
            reason: e.to_string(),
        })
    }

    /// A verifier for callbacks addressed to this gateway.
    pub fn callback_verifier(&self) -> CallbackVerifier {
        CallbackVerifier::new(self.secret.as_str())
    }

    /// Size limit for outgoing encrypted messages.
    pub fn max_content_length(&self) -> usize {
        self.max_content_length.min(MAX_CONTENT_LENGTH)
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("identity", &self.identity)
            .field("secret", &"[REDACTED]")
            .field("private_key", &"[REDACTED]")
            .field("max_content_length", &self.max_content_length)
            .finish()
    }
}

/// Builder for constructing `GatewayConfig`.
#[derive(Clone, Debug)]
pub struct GatewayConfigBuilder {
    config: GatewayConfig,
}

impl Default for GatewayConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GatewayConfigBuilder {
    /// Create a new builder with the default size limit.
    pub fn new() -> Self {
        Self {
            config: GatewayConfig::default(),
        }
    }

    /// Set the gateway identity.
    pub fn with_identity(mut self, identity: &str) -> Self {
        self.config.identity = identity.to_owned();
        self
    }

    /// Set the API secret.
    pub fn with_secret(mut self, secret: &str) -> Self {
        self.config.secret = secret.to_owned();
        self
    }

    /// Set the private key (hex).
    pub fn with_private_key(mut self, private_key_hex: &str) -> Self {
        self.config.private_key = private_key_hex.to_owned();
        self
    }

    /// Lower the size limit for outgoing messages.
    pub fn with_max_content_length(mut self, max: usize) -> Self {
        self.config.max_content_length = max;
        self
    }

    /// Build the final configuration.
    pub fn build(self) -> GatewayConfig {
        self.config
    }

    /// Build and validate the configuration.
    pub fn build_validated(self) -> Result<GatewayConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}
