//! Error types for the licensing module.

use tether_wire::WireError;
use thiserror::Error;

/// Licensing-specific errors.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// A required license field is absent.
    #[error("license field `{0}` is missing")]
    MissingField(&'static str),

    /// A license field is present but unparsable.
    #[error("license field `{field}` is invalid: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },

    /// Ed25519 signature verification failed.
    #[error("license signature invalid")]
    InvalidSignature,

    /// The authority did not issue a verifiable anonymous license.
    #[error("anonymous license could not be obtained from the authority")]
    AcquisitionFailed,

    /// License file is not a flat object of string fields.
    #[error("license file is malformed: {0}")]
    Malformed(#[from] WireError),

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;
