//! Field names used by the licensing protocol.

pub const EMAIL: &str = "email";
pub const LICENSE_KEY: &str = "licensekey";
pub const VERSION: &str = "version";
pub const CHALLENGE: &str = "challenge";
pub const INSTANCE_ID: &str = "instanceid";
