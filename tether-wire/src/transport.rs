//! Remote call abstraction and its HTTP implementation.

use crate::config::{AuthorityConfig, Endpoint};
use crate::error::{WireError, WireResult};
use crate::message::{ERROR_FIELD, SignedMessage};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use std::sync::Arc;
use tether_crypto::SignatureService;
use tracing::{debug, warn};

/// A single signed request/response exchange with the authority.
///
/// Implementations sign the request, send it, and return the response only
/// if it verifies. Every failure, from a dropped connection to a bad
/// signature, is reported as `None`.
#[async_trait]
pub trait RemoteCall: Send + Sync {
    /// Performs the exchange. `request` must not carry a signature yet.
    async fn call(&self, endpoint: Endpoint, request: SignedMessage) -> Option<SignedMessage>;
}

/// JSON-over-HTTP transport.
pub struct HttpTransport {
    config: AuthorityConfig,
    client: Client,
    signer: Arc<SignatureService>,
}

impl HttpTransport {
    /// Creates a transport with the configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (TLS backend
    /// initialisation failure).
    pub fn new(config: AuthorityConfig, signer: Arc<SignatureService>) -> WireResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            config,
            client,
            signer,
        })
    }

    /// Returns the authority configuration.
    pub fn config(&self) -> &AuthorityConfig {
        &self.config
    }

    async fn exchange(
        &self,
        endpoint: Endpoint,
        mut request: SignedMessage,
    ) -> WireResult<SignedMessage> {
        request.sign_with(&self.signer);
        let url = self.config.url(endpoint);
        let body = serde_json::to_vec(&request.to_json())?;

        debug!("POST {} ({} fields)", url, request.len());
        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WireError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        let value: Value = serde_json::from_slice(&bytes)?;
        if let Some(reason) = value.get(ERROR_FIELD) {
            let reason = match reason {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return Err(WireError::Rejected(reason));
        }

        let message = SignedMessage::from_json(value)?;
        if message.signature().is_none() {
            return Err(WireError::Unsigned);
        }
        if !message.verify_with(&self.signer) {
            return Err(WireError::BadSignature);
        }
        Ok(message)
    }
}

#[async_trait]
impl RemoteCall for HttpTransport {
    async fn call(&self, endpoint: Endpoint, request: SignedMessage) -> Option<SignedMessage> {
        match self.exchange(endpoint, request).await {
            Ok(response) => {
                debug!("{} call verified ({} fields)", endpoint, response.len());
                Some(response)
            }
            Err(e) => {
                warn!("{} call produced no verified response: {}", endpoint, e);
                None
            }
        }
    }
}
