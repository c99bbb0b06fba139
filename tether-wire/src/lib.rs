//! Signed request/response transport for tether.
//!
//! Every call to the licensing authority is one HTTP POST carrying an
//! ordered JSON object of text fields plus a trailing `signature`, and one
//! response of the same shape. The response is returned only if its
//! signature verifies against the trusted authority key.
//!
//! # Failure model
//!
//! [`RemoteCall::call`] returns `Option`. Network faults, timeouts, HTTP
//! errors, malformed bodies, authority `error` documents and signature
//! failures all collapse to `None`. Callers decide what `None` means for
//! them: fatal at startup, a soft signal for heartbeats, ignored at shutdown.

mod config;
mod error;
pub mod fields;
mod message;
pub mod mock;
mod transport;

pub use config::{AuthorityConfig, Endpoint};
pub use error::{WireError, WireResult};
pub use message::{ERROR_FIELD, SIGNATURE_FIELD, SignedMessage};
pub use transport::{HttpTransport, RemoteCall};
