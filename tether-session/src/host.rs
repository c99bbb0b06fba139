//! The host application as seen by the session layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Build version of this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl ClientVersion {
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// The version this crate was built as.
    #[must_use]
    pub fn current() -> Self {
        Self {
            major: env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap_or(0),
            minor: env!("CARGO_PKG_VERSION_MINOR").parse().unwrap_or(0),
            patch: env!("CARGO_PKG_VERSION_PATCH").parse().unwrap_or(0),
        }
    }
}

impl Default for ClientVersion {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for ClientVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// What the session layer needs to know about the host application.
pub trait HostEnvironment: Send + Sync {
    /// Version indicator published by the instrumented runtime.
    ///
    /// Startup refuses to proceed unless it equals the client's minor version.
    fn runtime_version(&self) -> u64;

    /// True while the monitored subject is somewhere a lost authority
    /// connection must not be tolerated.
    fn in_unsafe_state(&self) -> bool;
}

/// A host whose answers are set programmatically.
///
/// Used by the tester binary and by tests; safe to flip from any thread.
#[derive(Debug, Default)]
pub struct SimulatedHost {
    runtime_version: AtomicU64,
    unsafe_state: AtomicBool,
}

impl SimulatedHost {
    /// Creates a host reporting `runtime_version`, initially in a safe state.
    pub fn new(runtime_version: u64) -> Self {
        Self {
            runtime_version: AtomicU64::new(runtime_version),
            unsafe_state: AtomicBool::new(false),
        }
    }

    /// A host whose runtime matches this client build.
    pub fn compatible() -> Self {
        Self::new(ClientVersion::current().minor)
    }

    pub fn set_runtime_version(&self, version: u64) {
        self.runtime_version.store(version, Ordering::SeqCst);
    }

    pub fn set_unsafe(&self, unsafe_state: bool) {
        self.unsafe_state.store(unsafe_state, Ordering::SeqCst);
    }
}

impl HostEnvironment for SimulatedHost {
    fn runtime_version(&self) -> u64 {
        self.runtime_version.load(Ordering::SeqCst)
    }

    fn in_unsafe_state(&self) -> bool {
        self.unsafe_state.load(Ordering::SeqCst)
    }
}
