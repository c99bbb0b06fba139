//! The verified license record.
//!
//! A license is three fields, in this order: `email`, `licensekey`,
//! `signature`. The signature covers the email and the canonical text of
//! the license key, and must verify against the authority's public key.

use crate::error::{LicenseError, LicenseResult};
use tether_crypto::{SignatureService, render_uuid};
use tether_wire::{SIGNATURE_FIELD, SignedMessage, fields};
use uuid::Uuid;

/// Identity token used when no license has been purchased.
pub const ANONYMOUS_EMAIL: &str = "anonymous";

/// A license whose signature has been checked.
///
/// Only constructed through [`LicenseRecord::from_message`], so holding one
/// means verification passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseRecord {
    email: String,
    license_key: Uuid,
    signature: String,
}

impl LicenseRecord {
    /// Extracts and verifies a license from a message.
    ///
    /// # Errors
    ///
    /// Returns an error if a field is missing, the key is not a UUID, or the
    /// signature does not verify.
    pub fn from_message(message: &SignedMessage, signer: &SignatureService) -> LicenseResult<Self> {
        let email = message
            .get(fields::EMAIL)
            .ok_or(LicenseError::MissingField(fields::EMAIL))?;
        let raw_key = message
            .get(fields::LICENSE_KEY)
            .ok_or(LicenseError::MissingField(fields::LICENSE_KEY))?;
        let signature = message
            .signature()
            .ok_or(LicenseError::MissingField(SIGNATURE_FIELD))?;

        let license_key = Uuid::parse_str(raw_key.trim()).map_err(|e| LicenseError::InvalidField {
            field: fields::LICENSE_KEY,
            reason: e.to_string(),
        })?;

        if !signer.verify(signature, &[email, render_uuid(&license_key).as_str()]) {
            return Err(LicenseError::InvalidSignature);
        }

        Ok(Self {
            email: email.to_string(),
            license_key,
            signature: signature.to_string(),
        })
    }

    /// Renders the record in its persisted field order.
    #[must_use]
    pub fn to_message(&self) -> SignedMessage {
        SignedMessage::new()
            .with(fields::EMAIL, self.email.as_str())
            .with(fields::LICENSE_KEY, render_uuid(&self.license_key))
            .with(SIGNATURE_FIELD, self.signature.as_str())
    }

    /// The identity token the license was issued to.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// The license key.
    #[must_use]
    pub fn license_key(&self) -> Uuid {
        self.license_key
    }

    /// The authority's signature over email and license key.
    #[must_use]
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Returns true for a bootstrap license issued without an identity.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.email == ANONYMOUS_EMAIL
    }
}
