//! Envelope prefixes that carry the randomness needed for decryption.
//!
//! Master-key envelope:   `nonce(12) || ciphertext || tag(16)`
//! Password envelope:     `salt(16) || nonce(12) || ciphertext || tag(16)`
//!
//! Neither layout carries a version byte or algorithm tag.

use crate::crypto::{NONCE_LEN, SALT_LEN};
use crate::error::{CryptoError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterHeader {
    nonce: [u8; NONCE_LEN],
}

impl MasterHeader {
    pub const LEN: usize = NONCE_LEN;

    pub fn new(nonce: [u8; NONCE_LEN]) -> Self {
        Self { nonce }
    }

    pub fn nonce(&self) -> &[u8; NONCE_LEN] {
        &self.nonce
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.nonce.to_vec()
    }

    pub fn from_bytes(data: &[u8]) -> Result<(Self, usize)> {
        if data.len() < Self::LEN {
            return Err(CryptoError::InvalidInput(format!(
                "ciphertext too short: {} bytes, need at least {}",
                data.len(),
                Self::LEN
            )));
        }

        let nonce: [u8; NONCE_LEN] = data[..NONCE_LEN]
            .try_into()
            .map_err(|_| CryptoError::InvalidInput("invalid nonce length".to_string()))?;

        Ok((Self { nonce }, Self::LEN))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHeader {
    salt: [u8; SALT_LEN],
    nonce: [u8; NONCE_LEN],
}

impl PasswordHeader {
    pub const LEN: usize = SALT_LEN + NONCE_LEN;

    pub fn new(salt: [u8; SALT_LEN], nonce: [u8; NONCE_LEN]) -> Self {
        Self { salt, nonce }
    }

    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    pub fn nonce(&self) -> &[u8; NONCE_LEN] {
        &self.nonce
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(Self::LEN);
        buf.extend_from_slice(&self.salt);
        buf.extend_from_slice(&self.nonce);
        buf
    }

    /// Checked before any key derivation runs.
    pub fn from_bytes(data: &[u8]) -> Result<(Self, usize)> {
        if data.len() < Self::LEN {
            return Err(CryptoError::InvalidInput(format!(
                "data too short: {} bytes, need at least {}",
                data.len(),
                Self::LEN
            )));
        }

        let mut offset = 0;
        let salt: [u8; SALT_LEN] = data[offset..offset + SALT_LEN]
            .try_into()
            .map_err(|_| CryptoError::InvalidInput("invalid salt length".to_string()))?;
        offset += SALT_LEN;

        let nonce: [u8; NONCE_LEN] = data[offset..offset + NONCE_LEN]
            .try_into()
            .map_err(|_| CryptoError::InvalidInput("invalid nonce length".to_string()))?;
        offset += NONCE_LEN;

        Ok((Self { salt, nonce }, offset))
    }
}
