//! A scripted in-process transport for testing.

use crate::config::Endpoint;
use crate::message::SignedMessage;
use crate::transport::RemoteCall;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// A request seen by the mock.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub endpoint: Endpoint,
    pub request: SignedMessage,
}

/// Transport that returns scripted responses and records every request.
///
/// Responses are looked up per endpoint: queued one-shot responses first,
/// then the sticky default, then `None`.
#[derive(Default)]
pub struct MockTransport {
    once: Mutex<HashMap<Endpoint, VecDeque<Option<SignedMessage>>>>,
    sticky: Mutex<HashMap<Endpoint, Option<SignedMessage>>>,
    gates: Mutex<HashMap<Endpoint, Arc<Semaphore>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    /// Creates a mock that answers every call with `None`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the response returned for every call to `endpoint`.
    pub fn respond(&self, endpoint: Endpoint, response: Option<SignedMessage>) {
        self.sticky.lock().unwrap().insert(endpoint, response);
    }

    /// Queues a response for the next call to `endpoint` only.
    pub fn respond_once(&self, endpoint: Endpoint, response: Option<SignedMessage>) {
        self.once
            .lock()
            .unwrap()
            .entry(endpoint)
            .or_default()
            .push_back(response);
    }

    /// Makes calls to `endpoint` wait until a permit is added to the returned gate.
    ///
    /// The call is recorded before it starts waiting.
    pub fn hold(&self, endpoint: Endpoint) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        self.gates.lock().unwrap().insert(endpoint, gate.clone());
        gate
    }

    /// All recorded calls, in arrival order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Requests sent to one endpoint.
    pub fn calls_to(&self, endpoint: Endpoint) -> Vec<SignedMessage> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.endpoint == endpoint)
            .map(|c| c.request.clone())
            .collect()
    }

    fn next_response(&self, endpoint: Endpoint) -> Option<SignedMessage> {
        if let Some(queued) = self
            .once
            .lock()
            .unwrap()
            .get_mut(&endpoint)
            .and_then(VecDeque::pop_front)
        {
            return queued;
        }
        self.sticky
            .lock()
            .unwrap()
            .get(&endpoint)
            .cloned()
            .flatten()
    }
}

#[async_trait]
impl RemoteCall for MockTransport {
    async fn call(&self, endpoint: Endpoint, request: SignedMessage) -> Option<SignedMessage> {
        self.calls
            .lock()
            .unwrap()
            .push(RecordedCall { endpoint, request });

        let gate = self.gates.lock().unwrap().get(&endpoint).cloned();
        if let Some(gate) = gate {
            gate.acquire().await.ok()?.forget();
        }
        self.next_response(endpoint)
    }
}
