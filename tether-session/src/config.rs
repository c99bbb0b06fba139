//! Session configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tether_crypto::{SignatureService, VerifyingKey};
use tether_wire::AuthorityConfig;

use crate::error::SecurityResult;

/// Default heartbeat interval in seconds.
pub const DEFAULT_PULSE_INTERVAL_SECS: u64 = 60;

/// Configuration for [`Security`](crate::Security).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Authority endpoints and request timeout.
    pub authority: AuthorityConfig,
    /// License file location. `None` means `tether.lic` next to the executable.
    pub license_path: Option<PathBuf>,
    /// Minimum time between heartbeat launches.
    pub pulse_interval_secs: u64,
    /// Base64 Ed25519 key that replaces the embedded authority key.
    pub trusted_key: Option<String>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            authority: AuthorityConfig::default(),
            license_path: None,
            pulse_interval_secs: DEFAULT_PULSE_INTERVAL_SECS,
            trusted_key: None,
        }
    }
}

impl SecurityConfig {
    /// The heartbeat interval as a [`Duration`].
    #[must_use]
    pub fn pulse_interval(&self) -> Duration {
        Duration::from_secs(self.pulse_interval_secs)
    }

    /// Builds the signature service: embedded keys, with the trusted key
    /// replaced if one is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded or configured key is invalid.
    pub fn signature_service(&self) -> SecurityResult<Arc<SignatureService>> {
        let mut service = SignatureService::embedded()?;
        if let Some(encoded) = &self.trusted_key {
            service = service.with_trusted_key(VerifyingKey::from_base64(encoded)?);
        }
        Ok(Arc::new(service))
    }
}
