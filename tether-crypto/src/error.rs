//! Error types for the crypto layer.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors raised while building keys.
///
/// Verification never produces an error: an untrusted signature is just `false`.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The trusted public key bytes are not a valid Ed25519 point.
    #[error("invalid public key")]
    InvalidPublicKey,

    /// A key was supplied in an unexpected encoding or length.
    #[error("invalid key encoding: {0}")]
    InvalidKeyEncoding(String),
}
