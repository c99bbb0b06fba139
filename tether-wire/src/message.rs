//! Ordered field messages.
//!
//! A message is a sequence of named text fields. When signed, a trailing
//! `signature` field covers the values of every field before it, in order.
//! On the wire a message is a JSON object whose keys keep their insertion
//! order.

use serde_json::{Map, Value};
use tether_crypto::SignatureService;

use crate::error::{WireError, WireResult};

/// Name of the trailing signature field.
pub const SIGNATURE_FIELD: &str = "signature";

/// Name of the field an authority rejection is reported in.
pub const ERROR_FIELD: &str = "error";

/// An ordered list of named text fields, optionally signed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignedMessage {
    fields: Vec<(String, String)>,
}

impl SignedMessage {
    /// Creates an empty message.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field and returns the message, for chained construction.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    /// Appends a field. A field with an existing name is overwritten in place.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Returns the value of a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates over `(name, value)` pairs in order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Number of fields, signature included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the message has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the signature, treating an empty value as absent.
    #[must_use]
    pub fn signature(&self) -> Option<&str> {
        self.get(SIGNATURE_FIELD).filter(|s| !s.is_empty())
    }

    /// Values of the fields preceding the signature, in order.
    #[must_use]
    pub fn payload_values(&self) -> Vec<&str> {
        self.fields
            .iter()
            .take_while(|(n, _)| n != SIGNATURE_FIELD)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Appends a signature over the current payload, unless one is present.
    pub fn sign_with(&mut self, signer: &SignatureService) {
        if self.get(SIGNATURE_FIELD).is_some() {
            return;
        }
        let signature = signer.sign(&self.payload_values());
        self.fields.push((SIGNATURE_FIELD.to_string(), signature));
    }

    /// Returns true if the message carries a signature that verifies.
    #[must_use]
    pub fn verify_with(&self, signer: &SignatureService) -> bool {
        match self.signature() {
            Some(signature) => signer.verify(signature, &self.payload_values()),
            None => false,
        }
    }

    /// Renders the message as a JSON object, preserving field order.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .map(|(n, v)| (n.clone(), Value::String(v.clone())))
            .collect();
        Value::Object(map)
    }

    /// Builds a message from a JSON object of string values.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Malformed`] for anything other than a flat object
    /// of strings.
    pub fn from_json(value: Value) -> WireResult<Self> {
        let Value::Object(map) = value else {
            return Err(WireError::Malformed("expected a JSON object".to_string()));
        };
        let mut message = Self::new();
        for (name, value) in map {
            match value {
                Value::String(s) => message.fields.push((name, s)),
                other => {
                    return Err(WireError::Malformed(format!(
                        "field `{name}` is not a string: {other}"
                    )));
                }
            }
        }
        Ok(message)
    }

    /// Parses a message from raw JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not JSON or not a flat string object.
    pub fn from_slice(bytes: &[u8]) -> WireResult<Self> {
        Self::from_json(serde_json::from_slice(bytes)?)
    }
}
