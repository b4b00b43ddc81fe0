use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use zeroize::Zeroizing;

use crate::crypto::secure_random;
use crate::error::{CryptoError, Result};

/// Largest accepted token length, in random bytes.
pub const MAX_TOKEN_LEN: usize = 4096;

/// Generate an unguessable URL-safe token from `length` random bytes.
///
/// The result is `ceil(4 * length / 3)` characters of unpadded URL-safe
/// base64. `length` must be in `1..=MAX_TOKEN_LEN`. Uniqueness against
/// previously issued tokens is not checked.
pub fn generate_token(length: usize) -> Result<String> {
    if length == 0 {
        return Err(CryptoError::InvalidInput(
            "token length must be at least 1 byte".to_string(),
        ));
    }
    if length > MAX_TOKEN_LEN {
        return Err(CryptoError::InvalidInput(format!(
            "token length must be at most {MAX_TOKEN_LEN} bytes"
        )));
    }

    let mut bytes = Zeroizing::new(vec![0u8; length]);
    secure_random(&mut bytes)?;
    Ok(URL_SAFE_NO_PAD.encode(&*bytes))
}
