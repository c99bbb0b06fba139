//! Authority endpoint configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// The remote calls the client knows how to make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    /// Issues an anonymous license for first-run bootstrap.
    AnonymousLicense,
    /// Startup handshake; assigns the instance id.
    Startup,
    /// Periodic liveness pulse.
    KeepAlive,
    /// Instance teardown notification.
    Shutdown,
}

impl Endpoint {
    /// Short name used in logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AnonymousLicense => "anonymous-license",
            Self::Startup => "startup",
            Self::KeepAlive => "keepalive",
            Self::Shutdown => "shutdown",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the authority lives and how long to wait for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorityConfig {
    /// Base URL (e.g. `https://license.tether-rs.dev`).
    pub base_url: String,
    pub anonymous_license_path: String,
    pub startup_path: String,
    pub keepalive_path: String,
    pub shutdown_path: String,
    /// Per-request timeout in seconds, covering connect through body read.
    pub request_timeout_secs: u64,
}

impl Default for AuthorityConfig {
    fn default() -> Self {
        Self {
            base_url: "https://license.tether-rs.dev".to_string(),
            anonymous_license_path: "/subscription/license".to_string(),
            startup_path: "/session/startup".to_string(),
            keepalive_path: "/session/keepalive".to_string(),
            shutdown_path: "/session/shutdown".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl AuthorityConfig {
    /// Creates a configuration pointing at `base_url` with default paths.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Resolves the full URL of an endpoint.
    #[must_use]
    pub fn url(&self, endpoint: Endpoint) -> String {
        let path = match endpoint {
            Endpoint::AnonymousLicense => &self.anonymous_license_path,
            Endpoint::Startup => &self.startup_path,
            Endpoint::KeepAlive => &self.keepalive_path,
            Endpoint::Shutdown => &self.shutdown_path,
        };
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// The request timeout as a [`Duration`].
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
