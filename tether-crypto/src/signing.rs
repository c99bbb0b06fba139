//! Ed25519 signing and verification over ordered field lists.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use ed25519_dalek::{
    Signature as DalekSignature, Signer as _, SigningKey as DalekSigningKey, Verifier as _,
    VerifyingKey as DalekVerifyingKey,
};
use rand::rngs::OsRng;

use crate::canonical::canonical_bytes;
use crate::error::{CryptoError, CryptoResult};

/// Embedded client signing seed. Requests sent to the authority are signed with it.
const CLIENT_SIGNING_SEED: [u8; 32] = [
    131, 246, 123, 97, 206, 38, 68, 98, 80, 226, 245, 143, 215, 54, 147, 200, 154, 123, 139, 212,
    3, 119, 117, 94, 19, 205, 102, 175, 222, 22, 245, 213,
];

/// Embedded authority public key. Licenses and responses must verify against it.
const AUTHORITY_PUBLIC_KEY: [u8; 32] = [
    40, 112, 69, 60, 139, 132, 194, 93, 35, 34, 108, 30, 201, 52, 139, 230, 17, 145, 64, 94, 98,
    22, 237, 190, 57, 164, 84, 54, 230, 249, 32, 82,
];

/// Ed25519 signing key (secret).
#[derive(Clone)]
pub struct SigningKey(DalekSigningKey);

/// Ed25519 verifying key (public).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VerifyingKey(DalekVerifyingKey);

/// A keypair for signing and verification.
pub struct KeyPair {
    pub signing_key: SigningKey,
    pub verifying_key: VerifyingKey,
}

impl KeyPair {
    /// Generates a new random Ed25519 keypair.
    pub fn generate() -> Self {
        let signing = DalekSigningKey::generate(&mut OsRng);
        let verifying = signing.verifying_key();
        Self {
            signing_key: SigningKey(signing),
            verifying_key: VerifyingKey(verifying),
        }
    }

    /// Derives a keypair from a fixed 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing = SigningKey::from_bytes(seed);
        let verifying_key = signing.verifying_key();
        Self {
            signing_key: signing,
            verifying_key,
        }
    }
}

impl SigningKey {
    /// Creates a signing key from raw 32-byte secret.
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        Self(DalekSigningKey::from_bytes(bytes))
    }

    /// Returns the corresponding verifying key.
    pub fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey(self.0.verifying_key())
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SigningKey").field(&"[REDACTED]").finish()
    }
}

impl VerifyingKey {
    /// Creates a verifying key from raw 32-byte public key.
    pub fn from_bytes(bytes: &[u8; 32]) -> CryptoResult<Self> {
        DalekVerifyingKey::from_bytes(bytes)
            .map(Self)
            .map_err(|_| CryptoError::InvalidPublicKey)
    }

    /// Parses a base64-encoded 32-byte public key.
    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        let bytes = BASE64
            .decode(encoded.trim())
            .map_err(|e| CryptoError::InvalidKeyEncoding(e.to_string()))?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyEncoding("expected 32 bytes".to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Returns the raw 32-byte public key.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }
}

/// Signs outgoing field lists and verifies incoming ones.
///
/// Holds the client's signing key and the authority's trusted public key.
/// Stateless apart from the keys, so it can be shared freely behind an `Arc`.
#[derive(Clone)]
pub struct SignatureService {
    signing_key: SigningKey,
    trusted_key: VerifyingKey,
}

impl SignatureService {
    /// Creates a service from explicit keys.
    pub fn new(signing_key: SigningKey, trusted_key: VerifyingKey) -> Self {
        Self {
            signing_key,
            trusted_key,
        }
    }

    /// Creates a service from the compiled-in client key and authority key.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidPublicKey`] if the embedded authority key
    /// is not a valid curve point.
    pub fn embedded() -> CryptoResult<Self> {
        Ok(Self::new(
            SigningKey::from_bytes(&CLIENT_SIGNING_SEED),
            VerifyingKey::from_bytes(&AUTHORITY_PUBLIC_KEY)?,
        ))
    }

    /// Returns a copy of this service that trusts a different public key.
    #[must_use]
    pub fn with_trusted_key(mut self, trusted_key: VerifyingKey) -> Self {
        self.trusted_key = trusted_key;
        self
    }

    /// Returns the trusted public key.
    pub fn trusted_key(&self) -> VerifyingKey {
        self.trusted_key
    }

    /// Returns the public half of the signing key.
    pub fn signer_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Signs `fields` in the given order, returning the base64 signature.
    pub fn sign<S: AsRef<str>>(&self, fields: &[S]) -> String {
        let signature = self.signing_key.0.sign(&canonical_bytes(fields));
        BASE64.encode(signature.to_bytes())
    }

    /// Verifies `signature` over `fields` against the trusted key.
    ///
    /// Malformed input is reported as `false`, never as an error.
    pub fn verify<S: AsRef<str>>(&self, signature: &str, fields: &[S]) -> bool {
        let Ok(bytes) = BASE64.decode(signature.trim()) else {
            return false;
        };
        let Ok(signature) = DalekSignature::from_slice(&bytes) else {
            return false;
        };
        self.trusted_key
            .0
            .verify(&canonical_bytes(fields), &signature)
            .is_ok()
    }
}

impl std::fmt::Debug for SignatureService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureService")
            .field("signing_key", &"[REDACTED]")
            .field("trusted_key", &self.trusted_key)
            .finish()
    }
}
