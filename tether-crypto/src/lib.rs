//! Field signing for tether.
//!
//! Every message exchanged with the licensing authority, and the persisted
//! license itself, is an ordered list of text fields followed by an Ed25519
//! signature over those fields. This crate owns:
//!
//! - the canonical byte encoding of a field list ([`canonical_bytes`])
//! - the canonical text form of UUIDs and timestamps
//! - [`SignatureService`], which signs with the client key and verifies
//!   against the authority's trusted public key

mod canonical;
mod error;
mod signing;

pub use canonical::{canonical_bytes, render_timestamp, render_uuid};
pub use error::{CryptoError, CryptoResult};
pub use signing::{KeyPair, SignatureService, SigningKey, VerifyingKey};
