//! Licensing for tether.
//!
//! This module handles:
//! - Parsing and Ed25519 verification of the persisted license
//! - First-run bootstrap: requesting an anonymous license from the
//!   authority and writing it next to the executable
//!
//! # License Format
//!
//! The license file is a JSON object with `email`, `licensekey` and
//! `signature`, in that order. The signature covers the email and the
//! canonical (lowercase, hyphenated) license key. A file that is missing a
//! field or fails verification is rejected; there is no fallback.

mod error;
mod record;
mod store;

pub use error::{LicenseError, LicenseResult};
pub use record::{ANONYMOUS_EMAIL, LicenseRecord};
pub use store::{LICENSE_FILE_NAME, LicenseStore};
