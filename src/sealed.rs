//! Password-based payload encryption.
//!
//! Each payload gets its own key, stretched from the caller's password and a
//! fresh salt. The master key plays no part, so holding the service key is
//! not enough to open these envelopes.

use zeroize::Zeroizing;

use crate::crypto::{self, KEY_LEN, PasswordHeader, PasswordKdf};
use crate::error::Result;

/// Defaults to scrypt (N = 2^15, r = 8, p = 1), which is what existing
/// envelopes use. Argon2id is available through [`crate::KdfParams`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordCodec {
    kdf: PasswordKdf,
}

impl PasswordCodec {
    pub fn new(kdf: impl Into<PasswordKdf>) -> Self {
        Self { kdf: kdf.into() }
    }

    pub fn kdf(&self) -> &PasswordKdf {
        &self.kdf
    }

    /// Stretch `password` and `salt` into a 256-bit key.
    pub fn derive_key(&self, password: &str, salt: &[u8]) -> Result<Zeroizing<[u8; KEY_LEN]>> {
        crypto::derive_key(password, salt, self.kdf)
    }

    /// Output is `salt(16) || nonce(12) || ciphertext || tag`.
    pub fn encrypt(&self, data: &[u8], password: &str) -> Result<Vec<u8>> {
        let salt = crypto::generate_salt()?;
        let key = self.derive_key(password, &salt)?;

        let (ciphertext, nonce) = crypto::encrypt(&key, data)?;

        let mut envelope = PasswordHeader::new(salt, nonce).to_bytes();
        envelope.extend_from_slice(&ciphertext);
        Ok(envelope)
    }

    /// Envelopes shorter than 28 bytes are rejected before any key derivation.
    pub fn decrypt(&self, envelope: &[u8], password: &str) -> Result<Zeroizing<Vec<u8>>> {
        let (header, offset) = PasswordHeader::from_bytes(envelope)?;
        let key = self.derive_key(password, header.salt())?;

        crypto::decrypt(&key, header.nonce(), &envelope[offset..]).inspect_err(|e| {
            tracing::debug!(error = %e, "password-based decryption failed");
        })
    }
}
