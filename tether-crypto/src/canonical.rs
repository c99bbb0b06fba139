//! Canonical encoding shared by signer and verifier.
//!
//! Every signed message is reduced to an ordered list of text values. The
//! byte string that actually gets signed is built here and nowhere else, so
//! the two sides cannot drift apart on how a field is rendered.
//!
//! Each value contributes `len(value) as u64 big-endian || value bytes`.
//! The length prefix keeps `["ab", "c"]` and `["a", "bc"]` distinct while
//! preserving order sensitivity.

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

/// Builds the byte string covered by a signature.
pub fn canonical_bytes<S: AsRef<str>>(fields: &[S]) -> Vec<u8> {
    let capacity = fields.iter().map(|f| 8 + f.as_ref().len()).sum();
    let mut out = Vec::with_capacity(capacity);
    for field in fields {
        let bytes = field.as_ref().as_bytes();
        out.extend_from_slice(&(bytes.len() as u64).to_be_bytes());
        out.extend_from_slice(bytes);
    }
    out
}

/// Renders a UUID in its single canonical text form (lowercase, hyphenated).
#[must_use]
pub fn render_uuid(id: &Uuid) -> String {
    id.as_hyphenated().to_string()
}

/// Renders a timestamp as RFC 3339 UTC with millisecond precision.
#[must_use]
pub fn render_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}
