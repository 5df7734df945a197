//! Error type for cryptographic operations.

use thiserror::Error;

/// Result type for cryptographic operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Cryptographic operation errors.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Invalid key format.
    #[error("invalid key format: {0}")]
    InvalidKey(String),

    /// Certificate could not be parsed.
    #[error("invalid certificate: {0}")]
    InvalidCertificate(String),

    /// PEM or base64 decoding failed.
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Key unwrap or content decryption failed.
    #[error("decryption failed: {0}")]
    Decryption(String),
}
