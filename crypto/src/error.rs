use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("system randomness unavailable: {0}")]
    Randomness(String),

    #[error("notes encryption failed")]
    Encrypt,

    #[error("notes decryption failed: authentication check failed")]
    Decrypt,

    #[error("decrypted notes are not valid UTF-8")]
    InvalidUtf8,

    #[error("decrypted notes do not match their anchored digest")]
    DigestMismatch,
}
