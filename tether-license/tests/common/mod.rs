//! Shared test helpers for license tests.

#![allow(dead_code)]

use std::sync::Arc;
use tether_crypto::{KeyPair, SignatureService, render_uuid};
use tether_wire::SignedMessage;
use uuid::Uuid;

/// Deterministic client and authority key pairs.
pub fn keypairs() -> (KeyPair, KeyPair) {
    (KeyPair::from_seed(&[3u8; 32]), KeyPair::from_seed(&[4u8; 32]))
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

/// A license message as the authority would issue it.
pub fn issued_license(email: &str, key: Uuid) -> SignedMessage {
    let mut message = SignedMessage::new()
        .with("email", email)
        .with("licensekey", render_uuid(&key));
    message.sign_with(&authority_signer());
    message
}

/// Writes a license message to `path` as JSON.
pub fn write_license(path: &std::path::Path, message: &SignedMessage) {
    std::fs::write(path, serde_json::to_vec_pretty(&message.to_json()).unwrap()).unwrap();
}

pub fn sample_key() -> Uuid {
    Uuid::parse_str("3f2b8c1e-4d5a-4e6f-8a7b-9c0d1e2f3a4b").unwrap()
}
