//! # forgeseal
//!
//! Encryption and credential security for a self-hosted git forge:
//! - AES-256-GCM encryption of data at rest under a configured master key
//! - Argon2id password hashing with self-describing records
//! - Password-based payload encryption with per-payload scrypt keys
//! - URL-safe random tokens for sessions and API keys
//!
//! The service is immutable once built and can be shared by reference across
//! any number of threads.

pub mod config;
pub mod crypto;
mod error;
pub mod memory;
pub mod password;
pub mod sealed;
pub mod token;

pub use crate::config::EncryptionConfig;
pub use crate::crypto::{KdfParams, PasswordKdf, ScryptParams};
pub use crate::error::{CryptoError, Result};
pub use crate::memory::{into_utf8, secure_wipe};
pub use crate::password::{PasswordHash, hash_password, verify_password};
pub use crate::sealed::PasswordCodec;
pub use crate::token::{MAX_TOKEN_LEN, generate_token};

use std::fmt;

use base64::{Engine, engine::general_purpose::STANDARD};
use crypto::{KEY_LEN, MasterHeader};
use zeroize::{Zeroize, Zeroizing};

pub struct EncryptionService {
    key: [u8; KEY_LEN],
    algorithm: String,
    codec: PasswordCodec,
}

impl Drop for EncryptionService {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

impl fmt::Debug for EncryptionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionService")
            .field("key", &"[REDACTED]")
            .field("algorithm", &self.algorithm)
            .field("codec", &self.codec)
            .finish()
    }
}

impl EncryptionService {
    /// Build the service from startup configuration.
    ///
    /// Fails closed with [`CryptoError::Configuration`] on an empty key; there
    /// is no default key.
    pub fn new(config: &EncryptionConfig) -> Result<Self> {
        Self::with_kdf(config, PasswordKdf::default())
    }

    /// Like [`EncryptionService::new`], with a different KDF or different
    /// costs for the password-based codec.
    pub fn with_kdf(config: &EncryptionConfig, kdf: impl Into<PasswordKdf>) -> Result<Self> {
        if config.key.is_empty() {
            return Err(CryptoError::Configuration(
                "encryption key is required".to_string(),
            ));
        }
        let kdf = kdf.into();
        kdf.validate()?;

        let key = crypto::derive_master_key(&config.key);
        tracing::debug!(algorithm = %config.algorithm, "encryption service initialized");

        Ok(Self {
            key,
            algorithm: config.algorithm.clone(),
            codec: PasswordCodec::new(kdf),
        })
    }

    /// The configured algorithm label. Informational only.
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    pub fn kdf(&self) -> &PasswordKdf {
        self.codec.kdf()
    }

    /// Encrypt under the master key. Output is `nonce || ciphertext || tag`.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let (ciphertext, nonce) = crypto::encrypt(&self.key, plaintext)?;

        let mut envelope = MasterHeader::new(nonce).to_bytes();
        envelope.extend_from_slice(&ciphertext);
        Ok(envelope)
    }

    /// Decrypt an envelope produced by [`EncryptionService::encrypt`].
    pub fn decrypt(&self, envelope: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        let (header, offset) = MasterHeader::from_bytes(envelope)?;

        crypto::decrypt(&self.key, header.nonce(), &envelope[offset..]).inspect_err(|e| {
            tracing::debug!(error = %e, "master-key decryption failed");
        })
    }

    /// Encrypt a string and return the envelope as padded standard base64.
    pub fn encrypt_string(&self, plaintext: &str) -> Result<String> {
        let envelope = self.encrypt(plaintext.as_bytes())?;
        Ok(STANDARD.encode(envelope))
    }

    /// Decrypt a base64 envelope produced by [`EncryptionService::encrypt_string`].
    pub fn decrypt_string(&self, encoded: &str) -> Result<Zeroizing<String>> {
        let envelope = STANDARD.decode(encoded)?;
        into_utf8(self.decrypt(&envelope)?)
    }

    pub fn hash_password(&self, password: &str) -> Result<String> {
        hash_password(password)
    }

    pub fn verify_password(&self, password: &str, record: &str) -> bool {
        verify_password(password, record)
    }

    pub fn generate_token(&self, length: usize) -> Result<String> {
        generate_token(length)
    }

    /// Stretch `password` and `salt` into a 256-bit key using this service's
    /// password KDF. Never touches the master key.
    pub fn derive_key_from_password(
        &self,
        password: &str,
        salt: &[u8],
    ) -> Result<Zeroizing<[u8; KEY_LEN]>> {
        self.codec.derive_key(password, salt)
    }

    /// See [`PasswordCodec::encrypt`].
    pub fn encrypt_with_password(&self, data: &[u8], password: &str) -> Result<Vec<u8>> {
        self.codec.encrypt(data, password)
    }

    /// See [`PasswordCodec::decrypt`].
    pub fn decrypt_with_password(
        &self,
        envelope: &[u8],
        password: &str,
    ) -> Result<Zeroizing<Vec<u8>>> {
        self.codec.decrypt(envelope, password)
    }
}
