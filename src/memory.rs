use zeroize::{Zeroize, Zeroizing};

use crate::error::{CryptoError, Result};

/// Overwrite every byte of `buf` with zero, in place.
///
/// Best effort only: copies the allocator, the OS or earlier moves already
/// made are out of reach. Call it as soon as a decrypted secret is no longer
/// needed. Prefer holding secrets in [`zeroize::Zeroizing`] where possible.
pub fn secure_wipe(buf: &mut [u8]) {
    buf.zeroize();
}

/// Reinterpret decrypted bytes as UTF-8 without copying them.
///
/// Invalid UTF-8 is an [`CryptoError::Encoding`] error; the bytes are wiped
/// either way.
pub fn into_utf8(mut plaintext: Zeroizing<Vec<u8>>) -> Result<Zeroizing<String>> {
    match String::from_utf8(std::mem::take(&mut *plaintext)) {
        Ok(s) => Ok(Zeroizing::new(s)),
        Err(e) => {
            e.into_bytes().zeroize();
            Err(CryptoError::Encoding(
                "decrypted data is not valid UTF-8".to_string(),
            ))
        }
    }
}
