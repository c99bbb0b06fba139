//! Shared test helpers for transport tests.

#![allow(dead_code)]

use std::sync::Arc;
use tether_crypto::{KeyPair, SignatureService};
use tether_wire::{AuthorityConfig, HttpTransport, SignedMessage};

/// Deterministic client and authority key pairs.
pub fn keypairs() -> (KeyPair, KeyPair) {
    (KeyPair::from_seed(&[11u8; 32]), KeyPair::from_seed(&[22u8; 32]))
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

/// Builds a response body signed by the authority.
pub fn signed_body(fields: &[(&str, &str)]) -> serde_json::Value {
    let mut message = SignedMessage::new();
    for (name, value) in fields {
        message.push(*name, *value);
    }
    message.sign_with(&authority_signer());
    message.to_json()
}

pub fn transport_for(base_url: &str) -> HttpTransport {
    let config = AuthorityConfig {
        request_timeout_secs: 2,
        ..AuthorityConfig::with_base_url(base_url)
    };
    HttpTransport::new(config, client_signer()).unwrap()
}
