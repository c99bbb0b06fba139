//! License verification and liveness for tether.
//!
//! # Lifecycle
//!
//! 1. **Compatibility**: the host runtime's version must equal this
//!    client's minor version
//! 2. **License**: the signed license is loaded (or bootstrapped
//!    anonymously) and verified
//! 3. **Startup handshake**: the authority assigns an instance id
//! 4. **Active**: [`Security::poll`] is called every frame; it launches a
//!    heartbeat in the background once per interval and returns whether
//!    the host may keep running
//! 5. **Shutdown**: a fire-and-forget notification
//!
//! Steps 1-3 happen inside [`Security::start`] and are fatal on failure.
//! After that nothing raises: heartbeat failures only matter when the host
//! reports an unsafe state.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tether_session::{Security, SecurityConfig, SimulatedHost};
//!
//! # async fn run() -> Result<(), tether_session::SecurityError> {
//! let host = Arc::new(SimulatedHost::compatible());
//! let mut security = Security::start(SecurityConfig::default(), host).await?;
//!
//! while security.poll() {
//!     // render a frame
//! #   break;
//! }
//! security.shutdown();
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod handshake;
mod heartbeat;
mod host;
mod security;

pub use config::{DEFAULT_PULSE_INTERVAL_SECS, SecurityConfig};
pub use error::{SecurityError, SecurityResult};
pub use handshake::{Handshake, SessionIdentity};
pub use heartbeat::{HeartbeatScheduler, HeartbeatState, PulseOutcome};
pub use host::{ClientVersion, HostEnvironment, SimulatedHost};
pub use security::{Security, SecurityBuilder};
