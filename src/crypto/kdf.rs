use argon2::{Algorithm, Argon2, Params, Version};
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, Zeroizing};

use super::KEY_LEN;
use crate::error::{CryptoError, Result};

/// scrypt cost parameters. The default (N = 2^15, r = 8, p = 1) is the one
/// existing password envelopes were written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScryptParams {
    log_n: u8,
    r: u32,
    p: u32,
}

impl Default for ScryptParams {
    fn default() -> Self {
        Self {
            log_n: 15, // N = 32768
            r: 8,
            p: 1,
        }
    }
}

impl ScryptParams {
    pub fn new(log_n: u8, r: u32, p: u32) -> Result<Self> {
        let params = Self { log_n, r, p };
        params.validate()?;
        Ok(params)
    }

    pub fn log_n(&self) -> u8 {
        self.log_n
    }

    pub fn r(&self) -> u32 {
        self.r
    }

    pub fn p(&self) -> u32 {
        self.p
    }

    pub fn validate(&self) -> Result<()> {
        self.to_scrypt().map(|_| ())
    }

    fn to_scrypt(self) -> Result<scrypt::Params> {
        scrypt::Params::new(self.log_n, self.r, self.p, KEY_LEN)
            .map_err(|e| CryptoError::Configuration(format!("invalid scrypt parameters: {e}")))
    }
}

/// Argon2id cost parameters for password-based payload encryption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    mem_cost_kib: u32,
    time_cost: u32,
    parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            mem_cost_kib: 32 * 1024, // 32 MiB
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl KdfParams {
    pub fn new(mem_cost_kib: u32, time_cost: u32, parallelism: u32) -> Result<Self> {
        let params = Self {
            mem_cost_kib,
            time_cost,
            parallelism,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn mem_cost_kib(&self) -> u32 {
        self.mem_cost_kib
    }

    pub fn time_cost(&self) -> u32 {
        self.time_cost
    }

    pub fn parallelism(&self) -> u32 {
        self.parallelism
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(CryptoError::Configuration(msg.to_string()));

        if self.mem_cost_kib < 8 {
            return invalid("argon2 memory cost too low");
        }
        if self.time_cost < 1 {
            return invalid("argon2 time cost must be >= 1");
        }
        if self.parallelism < 1 {
            return invalid("argon2 parallelism must be >= 1");
        }
        if self.mem_cost_kib < 8 * self.parallelism {
            return invalid("argon2 memory cost must be at least 8 * parallelism");
        }
        Ok(())
    }
}

/// Key-stretching function for password envelopes.
///
/// Envelopes do not record which one was used or its costs, so the same
/// choice must be used to decrypt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordKdf {
    Scrypt(ScryptParams),
    Argon2id(KdfParams),
}

impl Default for PasswordKdf {
    fn default() -> Self {
        PasswordKdf::Scrypt(ScryptParams::default())
    }
}

impl PasswordKdf {
    pub fn validate(&self) -> Result<()> {
        match self {
            PasswordKdf::Scrypt(params) => params.validate(),
            PasswordKdf::Argon2id(params) => params.validate(),
        }
    }
}

impl From<ScryptParams> for PasswordKdf {
    fn from(params: ScryptParams) -> Self {
        PasswordKdf::Scrypt(params)
    }
}

impl From<KdfParams> for PasswordKdf {
    fn from(params: KdfParams) -> Self {
        PasswordKdf::Argon2id(params)
    }
}

/// Stretch a password and salt into a 256-bit key.
pub fn derive_key(
    password: &str,
    salt: &[u8],
    kdf: impl Into<PasswordKdf>,
) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    match kdf.into() {
        PasswordKdf::Scrypt(params) => derive_key_scrypt(password, salt, params),
        PasswordKdf::Argon2id(params) => derive_key_argon2(password, salt, params),
    }
}

fn derive_key_scrypt(
    password: &str,
    salt: &[u8],
    params: ScryptParams,
) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    let params = params.to_scrypt()?;

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    scrypt::scrypt(password.as_bytes(), salt, &params, &mut *key)
        .map_err(|e| CryptoError::Internal(format!("scrypt key derivation failed: {e}")))?;

    Ok(key)
}

fn derive_key_argon2(
    password: &str,
    salt: &[u8],
    kdf: KdfParams,
) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    let params = Params::new(
        kdf.mem_cost_kib,
        kdf.time_cost,
        kdf.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| CryptoError::Internal(format!("failed to construct Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    argon2
        .hash_password_into(password.as_bytes(), salt, &mut *key)
        .map_err(|e| CryptoError::Internal(format!("argon2 key derivation failed: {e}")))?;

    Ok(key)
}

/// Derive the service master key from the configured secret.
///
/// A single SHA-256 pass. The secret is expected to be high-entropy
/// configuration, not a user password.
pub fn derive_master_key(secret: &str) -> [u8; KEY_LEN] {
    let mut digest = Sha256::digest(secret.as_bytes());
    let mut key = [0u8; KEY_LEN];
    key.copy_from_slice(&digest);
    digest.as_mut_slice().zeroize();
    key
}
