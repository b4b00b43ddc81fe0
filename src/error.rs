use thiserror::Error;

/// Result type alias for encryption operations
pub type Result<T> = std::result::Result<T, CryptoError>;

#[derive(Debug, Error)]
pub enum CryptoError {
    /// Missing or unusable setup. Construction fails closed on this.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Structurally malformed envelope or record.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Tag verification failed. Tampering, wrong key and wrong password all land here.
    #[error("invalid key, wrong password or corrupted data")]
    AuthenticationFailure,

    #[error("encoding error: {0}")]
    Encoding(String),

    /// Random source exhausted or a primitive refused its inputs.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<base64::DecodeError> for CryptoError {
    fn from(e: base64::DecodeError) -> Self {
        CryptoError::Encoding(format!("malformed base64: {e}"))
    }
}
