//! Startup configuration consumed by [`crate::EncryptionService`].

use std::fmt;

use serde::Deserialize;

use crate::error::{CryptoError, Result};

/// Informational label; the service always uses AES-256-GCM.
pub const DEFAULT_ALGORITHM: &str = "AES-256-GCM";

/// Encryption settings, supplied once at startup.
#[derive(Clone, Deserialize)]
pub struct EncryptionConfig {
    /// Secret the master key is derived from. Must not be empty.
    #[serde(default)]
    pub key: String,

    /// Algorithm label, kept as-is.
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
}

fn default_algorithm() -> String {
    DEFAULT_ALGORITHM.to_string()
}

impl EncryptionConfig {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            algorithm: default_algorithm(),
        }
    }

    pub fn with_algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = algorithm.into();
        self
    }

    /// Parse from a JSON document such as `{"key": "...", "algorithm": "..."}`.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| CryptoError::Configuration(format!("invalid encryption config: {e}")))
    }
}

impl fmt::Debug for EncryptionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionConfig")
            .field("key", &"[REDACTED]")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}
