//! Cryptographic primitives for the encryption service.
//!
//! Provides authenticated encryption, key derivation, and envelope header handling.

pub mod aead;
pub mod header;
pub mod kdf;

pub use aead::{decrypt, encrypt, generate_salt, secure_random};
pub use header::{MasterHeader, PasswordHeader};
pub use kdf::{KdfParams, PasswordKdf, ScryptParams, derive_key, derive_master_key};

/// Length of the salt (16 bytes).
pub const SALT_LEN: usize = 16;
/// Length of the nonce (12 bytes, the AES-GCM standard).
pub const NONCE_LEN: usize = 12;
/// Length of the GCM authentication tag (16 bytes).
pub const TAG_LEN: usize = 16;
/// Length of the encryption key (32 bytes / 256 bits).
pub const KEY_LEN: usize = 32;
