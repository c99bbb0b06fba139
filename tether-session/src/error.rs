//! Startup error types.
//!
//! Only startup failures leave this crate as errors. Heartbeat failures are
//! recorded in [`HeartbeatState`](crate::HeartbeatState) and shutdown
//! failures are discarded.

use crate::host::ClientVersion;
use tether_crypto::CryptoError;
use tether_license::LicenseError;
use thiserror::Error;

/// Result type for session operations.
pub type SecurityResult<T> = Result<T, SecurityError>;

/// Fatal startup failures. Each variant names the check that failed.
#[derive(Debug, Error)]
pub enum SecurityError {
    /// The client build does not match the runtime it instruments.
    #[error(
        "client version {client} is obsolete for runtime version {runtime}, please install an updated client"
    )]
    Obsolete { client: ClientVersion, runtime: u64 },

    /// The license is missing, unreadable, or fails verification.
    #[error("invalid license, please obtain a new license: {0}")]
    InvalidLicense(#[from] LicenseError),

    /// The authority did not confirm the startup handshake.
    #[error("unable to verify your license with the authority, please try again later")]
    VerificationUnavailable,

    /// Embedded or configured keys are unusable.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SecurityError {
    /// Returns true if retrying later may succeed without user action.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SecurityError::VerificationUnavailable)
    }
}
