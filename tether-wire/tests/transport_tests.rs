mod common;

use common::{authority_signer, signed_body, transport_for};
use serde_json::json;
use std::time::Duration;
use tether_crypto::{KeyPair, SignatureService};
use tether_wire::{Endpoint, RemoteCall, SignedMessage};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn startup_request() -> SignedMessage {
    SignedMessage::new()
        .with("email", "pilot@example.com")
        .with("licensekey", "3f2b8c1e-4d5a-4e6f-8a7b-9c0d1e2f3a4b")
        .with("version", "1.4.0")
        .with("challenge", "2024-03-09T14:05:07.000Z")
}

// ── Verified exchange ───────────────────────────────────────────

#[tokio::test]
async fn verified_response_is_returned() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/session/startup"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(signed_body(&[
            ("instanceid", "8d1f6a52-0c3e-4f7b-9a21-5e6d7c8b9a01"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport_for(&server.uri());
    let response = transport
        .call(Endpoint::Startup, startup_request())
        .await
        .unwrap();

    assert_eq!(
        response.get("instanceid"),
        Some("8d1f6a52-0c3e-4f7b-9a21-5e6d7c8b9a01")
    );
}

#[tokio::test]
async fn request_is_signed_in_declaration_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(signed_body(&[("ok", "1")])))
        .mount(&server)
        .await;

    let transport = transport_for(&server.uri());
    transport.call(Endpoint::Startup, startup_request()).await;

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    let sent = SignedMessage::from_slice(&received[0].body).unwrap();

    let names: Vec<&str> = sent.fields().map(|(n, _)| n).collect();
    assert_eq!(
        names,
        vec!["email", "licensekey", "version", "challenge", "signature"]
    );
    assert!(sent.verify_with(&authority_signer()));
}

// ── Everything else collapses to None ───────────────────────────

#[tokio::test]
async fn error_document_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"error": "license revoked"})),
        )
        .mount(&server)
        .await;

    let transport = transport_for(&server.uri());
    assert!(transport.call(Endpoint::Startup, startup_request()).await.is_none());
}

#[tokio::test]
async fn malformed_body_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let transport = transport_for(&server.uri());
    assert!(transport.call(Endpoint::KeepAlive, startup_request()).await.is_none());
}

#[tokio::test]
async fn unsigned_response_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"instanceid": "8d1f6a52-0c3e-4f7b-9a21-5e6d7c8b9a01"})),
        )
        .mount(&server)
        .await;

    let transport = transport_for(&server.uri());
    assert!(transport.call(Endpoint::Startup, startup_request()).await.is_none());
}

#[tokio::test]
async fn foreign_signature_is_none() {
    let server = MockServer::start().await;
    let impostor = KeyPair::from_seed(&[99u8; 32]);
    let impostor = SignatureService::new(impostor.signing_key, impostor.verifying_key);
    let mut forged = SignedMessage::new().with("instanceid", "8d1f6a52-0c3e-4f7b-9a21-5e6d7c8b9a01");
    forged.sign_with(&impostor);

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forged.to_json()))
        .mount(&server)
        .await;

    let transport = transport_for(&server.uri());
    assert!(transport.call(Endpoint::Startup, startup_request()).await.is_none());
}

#[tokio::test]
async fn tampered_field_is_none() {
    let server = MockServer::start().await;
    let mut body = signed_body(&[("instanceid", "8d1f6a52-0c3e-4f7b-9a21-5e6d7c8b9a01")]);
    body["instanceid"] = json!("00000000-0000-0000-0000-000000000001");

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let transport = transport_for(&server.uri());
    assert!(transport.call(Endpoint::Startup, startup_request()).await.is_none());
}

#[tokio::test]
async fn server_error_status_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_json(signed_body(&[("ok", "1")])))
        .mount(&server)
        .await;

    let transport = transport_for(&server.uri());
    assert!(transport.call(Endpoint::KeepAlive, startup_request()).await.is_none());
}

#[tokio::test]
async fn unreachable_authority_is_none() {
    let transport = transport_for("http://127.0.0.1:1");
    assert!(transport.call(Endpoint::Shutdown, startup_request()).await.is_none());
}

#[tokio::test]
async fn slow_authority_times_out_to_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(signed_body(&[("ok", "1")]))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let transport = transport_for(&server.uri());
    assert!(transport.call(Endpoint::KeepAlive, startup_request()).await.is_none());
}

#[tokio::test]
async fn endpoints_route_to_configured_paths() {
    let server = MockServer::start().await;
    for route in ["/subscription/license", "/session/keepalive", "/session/shutdown"] {
        Mock::given(method("POST"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(signed_body(&[("route", route)])))
            .expect(1)
            .mount(&server)
            .await;
    }

    let transport = transport_for(&server.uri());
    for (endpoint, route) in [
        (Endpoint::AnonymousLicense, "/subscription/license"),
        (Endpoint::KeepAlive, "/session/keepalive"),
        (Endpoint::Shutdown, "/session/shutdown"),
    ] {
        let response = transport.call(endpoint, SignedMessage::new()).await.unwrap();
        assert_eq!(response.get("route"), Some(route));
    }
}

#[tokio::test]
async fn transport_keeps_its_config() {
    let transport = transport_for("http://authority.test");
    let config = transport.config();
    assert_eq!(config.request_timeout(), Duration::from_secs(2));
    assert_eq!(
        config.url(Endpoint::KeepAlive),
        "http://authority.test/session/keepalive"
    );
}
