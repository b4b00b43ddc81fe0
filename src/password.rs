//! Argon2id credential hashing.
//!
//! Records are self-describing text: `$argon2id$<base64 salt>$<base64 hash>`,
//! standard base64 with padding. Cost parameters are fixed, so verification
//! needs nothing but the record.

use std::fmt;
use std::str::FromStr;

use argon2::{Algorithm, Argon2, Params, Version};
use base64::{Engine, engine::general_purpose::STANDARD};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::crypto::{SALT_LEN, generate_salt};
use crate::error::{CryptoError, Result};

pub const SCHEME: &str = "argon2id";
pub const HASH_LEN: usize = 32;

const DELIMITER: char = '$';
const TIME_COST: u32 = 1;
const MEM_COST_KIB: u32 = 64 * 1024;
const PARALLELISM: u32 = 4;

// padded base64 widths of the decoded segments
const SALT_B64_LEN: usize = SALT_LEN.div_ceil(3) * 4;
const HASH_B64_LEN: usize = HASH_LEN.div_ceil(3) * 4;

/// A parsed password hash record.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash {
    salt: [u8; SALT_LEN],
    hash: [u8; HASH_LEN],
}

impl PasswordHash {
    /// Hash `password` under a fresh random salt.
    pub fn generate(password: &str) -> Result<Self> {
        let salt = generate_salt()?;
        let hash = compute(password, &salt)?;
        Ok(Self { salt, hash: *hash })
    }

    /// Parse a record, checking delimiter count and segment widths before
    /// decoding and decoded lengths after.
    pub fn parse(record: &str) -> Result<Self> {
        let malformed = |why: &str| CryptoError::InvalidInput(format!("malformed password hash: {why}"));

        let segments: Vec<&str> = record.split(DELIMITER).collect();
        let [prefix, scheme, salt_b64, hash_b64] = segments.as_slice() else {
            return Err(malformed("wrong number of segments"));
        };

        if !prefix.is_empty() {
            return Err(malformed("missing leading delimiter"));
        }
        if *scheme != SCHEME {
            return Err(malformed("unsupported scheme"));
        }
        if salt_b64.len() != SALT_B64_LEN || hash_b64.len() != HASH_B64_LEN {
            return Err(malformed("unexpected segment width"));
        }

        let salt: [u8; SALT_LEN] = STANDARD
            .decode(salt_b64)
            .map_err(|_| malformed("salt is not base64"))?
            .try_into()
            .map_err(|_| malformed("unexpected salt length"))?;

        let hash: [u8; HASH_LEN] = STANDARD
            .decode(hash_b64)
            .map_err(|_| malformed("hash is not base64"))?
            .try_into()
            .map_err(|_| malformed("unexpected hash length"))?;

        Ok(Self { salt, hash })
    }

    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    /// Recompute and compare in constant time.
    pub fn verify(&self, password: &str) -> bool {
        match compute(password, &self.salt) {
            Ok(candidate) => constant_time_eq(candidate.as_slice(), &self.hash),
            Err(e) => {
                tracing::warn!(error = %e, "password hash recomputation failed");
                false
            }
        }
    }
}

impl fmt::Display for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{DELIMITER}{SCHEME}{DELIMITER}{}{DELIMITER}{}",
            STANDARD.encode(self.salt),
            STANDARD.encode(self.hash)
        )
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHash")
            .field("scheme", &SCHEME)
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl FromStr for PasswordHash {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Hash a password into a storable record.
///
/// Empty passwords are accepted; length policy belongs to the caller.
pub fn hash_password(password: &str) -> Result<String> {
    Ok(PasswordHash::generate(password)?.to_string())
}

/// Check a password against a record.
///
/// A malformed record yields `false`, same as a wrong password.
pub fn verify_password(password: &str, record: &str) -> bool {
    match PasswordHash::parse(record) {
        Ok(parsed) => parsed.verify(password),
        Err(e) => {
            tracing::debug!(error = %e, "rejecting unparseable password hash");
            false
        }
    }
}

/// Length-checked comparison that never short-circuits on content.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

fn compute(password: &str, salt: &[u8]) -> Result<Zeroizing<[u8; HASH_LEN]>> {
    let params = Params::new(MEM_COST_KIB, TIME_COST, PARALLELISM, Some(HASH_LEN))
        .map_err(|e| CryptoError::Internal(format!("failed to construct Argon2 params: {e}")))?;

    let mut hash = Zeroizing::new([0u8; HASH_LEN]);
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password_into(password.as_bytes(), salt, &mut *hash)
        .map_err(|e| CryptoError::Internal(format!("argon2 hashing failed: {e}")))?;

    Ok(hash)
}
