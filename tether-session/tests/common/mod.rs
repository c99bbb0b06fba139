//! Shared test helpers for session tests.

#![allow(dead_code)]

use std::sync::Arc;
use tempfile::TempDir;
use tether_crypto::{KeyPair, SignatureService, render_uuid};
use tether_session::{Security, SecurityBuilder, SecurityConfig, SimulatedHost};
use tether_wire::mock::MockTransport;
use tether_wire::{Endpoint, SignedMessage};
use uuid::Uuid;

pub const INSTANCE_ID: &str = "8d1f6a52-0c3e-4f7b-9a21-5e6d7c8b9a01";

pub fn keypairs() -> (KeyPair, KeyPair) {
    (KeyPair::from_seed(&[13u8; 32]), KeyPair::from_seed(&[31u8; 32]))
}

/// The client's view: signs with the client key, trusts the authority key.
pub fn client_signer() -> Arc<SignatureService> {
    let (client, authority) = keypairs();
    Arc::new(SignatureService::new(client.signing_key, authority.verifying_key))
}

/// The authority's view: signs with the authority key, trusts the client key.
pub fn authority_signer() -> SignatureService {
    let (client, authority) = keypairs();
    SignatureService::new(authority.signing_key, client.verifying_key)
}

pub fn issued_license(email: &str, key: Uuid) -> SignedMessage {
    let mut message = SignedMessage::new()
        .with("email", email)
        .with("licensekey", render_uuid(&key));
    message.sign_with(&authority_signer());
    message
}

pub fn startup_response() -> SignedMessage {
    SignedMessage::new().with("instanceid", INSTANCE_ID)
}

pub fn ack() -> SignedMessage {
    SignedMessage::new().with("ok", "true")
}

/// A scripted authority plus a compatible host and a fresh license directory.
pub struct Fixture {
    pub dir: TempDir,
    pub mock: Arc<MockTransport>,
    pub host: Arc<SimulatedHost>,
    pub config: SecurityConfig,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let mock = Arc::new(MockTransport::new());
        mock.respond(
            Endpoint::AnonymousLicense,
            Some(issued_license("anonymous", Uuid::nil())),
        );
        mock.respond(Endpoint::Startup, Some(startup_response()));
        mock.respond(Endpoint::KeepAlive, Some(ack()));
        mock.respond(Endpoint::Shutdown, Some(ack()));

        let config = SecurityConfig {
            license_path: Some(dir.path().join("tether.lic")),
            ..SecurityConfig::default()
        };
        Self {
            dir,
            mock,
            host: Arc::new(SimulatedHost::compatible()),
            config,
        }
    }

    pub fn builder(&self) -> SecurityBuilder {
        Security::builder(self.config.clone(), self.host.clone())
            .transport(self.mock.clone())
            .signer(client_signer())
    }

    pub async fn start(&self) -> Security {
        self.builder().start().await.unwrap()
    }
}
