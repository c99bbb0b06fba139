//! Host-facing entry point.

use crate::config::SecurityConfig;
use crate::error::{SecurityError, SecurityResult};
use crate::handshake::{Handshake, SessionIdentity};
use crate::heartbeat::{HeartbeatScheduler, HeartbeatState};
use crate::host::{ClientVersion, HostEnvironment};
use std::sync::Arc;
use tether_crypto::SignatureService;
use tether_license::LicenseStore;
use tether_wire::{HttpTransport, RemoteCall};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{info, warn};

/// Configures and starts a [`Security`] session.
pub struct SecurityBuilder {
    config: SecurityConfig,
    host: Arc<dyn HostEnvironment>,
    transport: Option<Arc<dyn RemoteCall>>,
    signer: Option<Arc<SignatureService>>,
    client_version: ClientVersion,
}

impl SecurityBuilder {
    /// Replaces the HTTP transport.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn RemoteCall>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Replaces the signature service derived from the configuration.
    #[must_use]
    pub fn signer(mut self, signer: Arc<SignatureService>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Overrides the client version reported to the host check and authority.
    #[must_use]
    pub fn client_version(mut self, version: ClientVersion) -> Self {
        self.client_version = version;
        self
    }

    /// Runs the startup checks, in order: version compatibility, license,
    /// startup handshake. Blocks the calling task until all three pass.
    ///
    /// Must be called from within a Tokio runtime; that runtime later runs
    /// the heartbeats.
    ///
    /// # Errors
    ///
    /// Returns the first failing check. Nothing is retried.
    pub async fn start(self) -> SecurityResult<Security> {
        Handshake::check_compatibility(&self.client_version, self.host.runtime_version())?;

        let signer = match self.signer {
            Some(signer) => signer,
            None => self.config.signature_service()?,
        };
        let transport: Arc<dyn RemoteCall> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(
                HttpTransport::new(self.config.authority.clone(), signer.clone())
                    .map_err(|e| SecurityError::Config(e.to_string()))?,
            ),
        };

        let license_path = match &self.config.license_path {
            Some(path) => path.clone(),
            None => LicenseStore::default_path()?,
        };
        let license = LicenseStore::new(license_path, signer, transport.clone())
            .load()
            .await?;

        let handshake = Arc::new(Handshake::new(transport));
        let identity = Arc::new(handshake.startup(&license, &self.client_version).await?);

        let runtime = Handle::current();
        let heartbeat = HeartbeatScheduler::new(
            handshake.clone(),
            identity.clone(),
            runtime.clone(),
            self.config.pulse_interval(),
        );

        info!(
            "Session active for {} (instance {})",
            identity.email(),
            identity.instance_id()
        );
        Ok(Security {
            host: self.host,
            handshake,
            identity,
            heartbeat,
            runtime,
            halted: false,
        })
    }
}

/// An active licensing session.
///
/// Created once at host startup, polled every frame, shut down at teardown.
pub struct Security {
    host: Arc<dyn HostEnvironment>,
    handshake: Arc<Handshake>,
    identity: Arc<SessionIdentity>,
    heartbeat: HeartbeatScheduler,
    runtime: Handle,
    halted: bool,
}

impl Security {
    /// Starts configuring a session for `host`.
    pub fn builder(config: SecurityConfig, host: Arc<dyn HostEnvironment>) -> SecurityBuilder {
        SecurityBuilder {
            config,
            host,
            transport: None,
            signer: None,
            client_version: ClientVersion::current(),
        }
    }

    /// Starts a session with the default transport and embedded keys.
    ///
    /// # Errors
    ///
    /// See [`SecurityBuilder::start`].
    pub async fn start(
        config: SecurityConfig,
        host: Arc<dyn HostEnvironment>,
    ) -> SecurityResult<Self> {
        Self::builder(config, host).start().await
    }

    /// Per-frame liveness check. Never blocks.
    ///
    /// Launches a heartbeat when one is due, then returns `false` only if the
    /// last completed heartbeat failed while the host reports an unsafe
    /// state. Heartbeat failures in a safe state are tolerated indefinitely.
    pub fn poll(&mut self) -> bool {
        self.heartbeat.tick();

        let state = self.heartbeat.state();
        let proceed = !(state.last_failed() && self.host.in_unsafe_state());
        if proceed == self.halted {
            self.halted = !proceed;
            if self.halted {
                warn!("Authority unreachable while in an unsafe state, halting");
            } else {
                info!("Resuming");
            }
        }
        proceed
    }

    /// Notifies the authority that this instance is closing.
    ///
    /// The call runs as a detached task and its outcome is never observed.
    /// If the process exits first the notification may not be delivered.
    pub fn shutdown(self) {
        let handshake = self.handshake;
        let identity = self.identity;
        info!("Sending shutdown for instance {}", identity.instance_id());
        drop(self.runtime.spawn(async move {
            handshake.shutdown(&identity).await;
        }));
    }

    /// The identity established at startup.
    pub fn identity(&self) -> &SessionIdentity {
        &self.identity
    }

    /// Copy of the current heartbeat state.
    pub fn heartbeat_state(&self) -> HeartbeatState {
        self.heartbeat.state()
    }

    /// Subscribes to heartbeat state changes.
    pub fn watch_heartbeat(&self) -> watch::Receiver<HeartbeatState> {
        self.heartbeat.subscribe()
    }
}
