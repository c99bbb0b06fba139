//! Lifecycle calls to the authority.
//!
//! Startup runs once and is fatal on failure. Heartbeats and shutdown reuse
//! the identity established at startup and never fail loudly: a heartbeat
//! reports `false`, a shutdown reports nothing.

use crate::error::{SecurityError, SecurityResult};
use crate::host::ClientVersion;
use chrono::Utc;
use std::sync::Arc;
use tether_crypto::{render_timestamp, render_uuid};
use tether_license::LicenseRecord;
use tether_wire::{Endpoint, RemoteCall, SignedMessage, fields};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Identity of this running instance, assigned during the startup handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    email: String,
    license_key: Uuid,
    instance_id: Uuid,
}

impl SessionIdentity {
    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn license_key(&self) -> Uuid {
        self.license_key
    }

    /// Opaque id issued by the authority; required on every later call.
    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }
}

/// Builds and sends the lifecycle requests.
pub struct Handshake {
    transport: Arc<dyn RemoteCall>,
}

impl Handshake {
    pub fn new(transport: Arc<dyn RemoteCall>) -> Self {
        Self { transport }
    }

    /// Checks that the runtime version matches the client's minor version.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::Obsolete`] on mismatch.
    pub fn check_compatibility(client: &ClientVersion, runtime_version: u64) -> SecurityResult<()> {
        if client.minor != runtime_version {
            return Err(SecurityError::Obsolete {
                client: *client,
                runtime: runtime_version,
            });
        }
        debug!("Client {} compatible with runtime {}", client, runtime_version);
        Ok(())
    }

    /// Announces this instance and obtains its instance id.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::VerificationUnavailable`] if the authority
    /// gives no verified response or the response lacks a valid `instanceid`.
    pub async fn startup(
        &self,
        license: &LicenseRecord,
        version: &ClientVersion,
    ) -> SecurityResult<SessionIdentity> {
        let request = SignedMessage::new()
            .with(fields::EMAIL, license.email())
            .with(fields::LICENSE_KEY, render_uuid(&license.license_key()))
            .with(fields::VERSION, version.to_string())
            .with(fields::CHALLENGE, challenge());

        let response = self
            .transport
            .call(Endpoint::Startup, request)
            .await
            .ok_or(SecurityError::VerificationUnavailable)?;

        let Some(raw) = response.get(fields::INSTANCE_ID) else {
            warn!("Startup response has no instance id");
            return Err(SecurityError::VerificationUnavailable);
        };
        let instance_id = Uuid::parse_str(raw.trim()).map_err(|e| {
            warn!("Startup response has an invalid instance id {:?}: {}", raw, e);
            SecurityError::VerificationUnavailable
        })?;

        info!("Startup handshake complete, instance {}", instance_id);
        Ok(SessionIdentity {
            email: license.email().to_string(),
            license_key: license.license_key(),
            instance_id,
        })
    }

    /// Sends one heartbeat. Returns whether a verified response came back.
    pub async fn pulse(&self, identity: &SessionIdentity) -> bool {
        let ok = self
            .transport
            .call(Endpoint::KeepAlive, identity_request(identity))
            .await
            .is_some();
        if ok {
            debug!("Heartbeat acknowledged for instance {}", identity.instance_id);
        } else {
            warn!("Heartbeat failed for instance {}", identity.instance_id);
        }
        ok
    }

    /// Tells the authority this instance is going away. The outcome is ignored.
    pub async fn shutdown(&self, identity: &SessionIdentity) {
        let _ = self
            .transport
            .call(Endpoint::Shutdown, identity_request(identity))
            .await;
    }
}

fn identity_request(identity: &SessionIdentity) -> SignedMessage {
    SignedMessage::new()
        .with(fields::EMAIL, identity.email.as_str())
        .with(fields::LICENSE_KEY, render_uuid(&identity.license_key))
        .with(fields::INSTANCE_ID, render_uuid(&identity.instance_id))
        .with(fields::CHALLENGE, challenge())
}

/// Freshness challenge: the current time in canonical form.
fn challenge() -> String {
    render_timestamp(&Utc::now())
}
