//! Wire error types.
//!
//! These never cross the [`RemoteCall`](crate::RemoteCall) boundary; they
//! exist so the transport can log exactly why a call produced no response.

use thiserror::Error;

/// Result type for wire operations.
pub type WireResult<T> = Result<T, WireError>;

/// Reasons a single exchange with the authority failed.
#[derive(Debug, Error)]
pub enum WireError {
    /// Connection, TLS, timeout or body read failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status.
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// The authority answered with an `error` document.
    #[error("rejected by authority: {0}")]
    Rejected(String),

    /// Body parsed as JSON but is not a flat object of string fields.
    #[error("malformed message: {0}")]
    Malformed(String),

    /// Response carries no signature field.
    #[error("response is not signed")]
    Unsigned,

    /// Response signature does not verify against the trusted key.
    #[error("response signature invalid")]
    BadSignature,

    /// Body is not valid JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
