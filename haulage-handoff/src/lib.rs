//! Keyed signing of JSON handoff payloads.
//!
//! Pipeline stages exchange JSON payloads and authenticate them with a
//! signature computed by [`HandoffSigner`]. The payload is reduced to its
//! [canonical form](canonical_json) (keys sorted, ASCII only) and
//! authenticated with HMAC-SHA256 keyed by the configured secret.
//! Signatures are lowercase hexadecimal; verification decodes the candidate
//! and compares it in constant time.
//!
//! The secret is always explicit. A well-known fallback key exists for local
//! testing only, behind the `insecure-default-key` feature.

#![forbid(unsafe_code)]

mod canonical;

use std::fmt;

use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;
use thiserror::Error;

pub use canonical::canonical_json;

type HmacSha256 = Hmac<Sha256>;

/// Well-known fallback secret for local testing.
#[cfg(any(test, feature = "insecure-default-key"))]
pub const INSECURE_DEFAULT_KEY: &str = "default-handoff-secret-key";

/// Errors raised while signing or verifying payloads.
#[derive(Debug, Error)]
pub enum HandoffError {
    /// The configured secret is empty.
    #[error("handoff secret must not be empty")]
    EmptySecret,
    /// The secret was refused as an HMAC key.
    #[error("handoff secret is not a usable HMAC key")]
    InvalidKey(#[from] hmac::digest::InvalidLength),
    /// The payload could not be serialised as JSON.
    #[error("payload is not serialisable as JSON: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Signs and verifies handoff payloads under one secret.
///
/// # Examples
///
/// ```
/// use haulage_handoff::HandoffSigner;
/// use serde_json::json;
///
/// # fn main() -> Result<(), haulage_handoff::HandoffError> {
/// let signer = HandoffSigner::new("stage-secret")?;
/// let payload = json!({"route": [0, 2, 1, 0], "vehicle": 0});
/// let signature = signer.sign(&payload)?;
///
/// assert_eq!(signature.len(), 64);
/// assert!(signer.verify(&payload, &signature)?);
/// assert!(!signer.verify(&json!({"route": [0, 1, 2, 0], "vehicle": 0}), &signature)?);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HandoffSigner {
    mac: HmacSha256,
}

impl HandoffSigner {
    /// Key a signer with `secret`.
    ///
    /// # Errors
    ///
    /// Returns [`HandoffError::EmptySecret`] when `secret` is empty.
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, HandoffError> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(HandoffError::EmptySecret);
        }
        Ok(Self {
            mac: HmacSha256::new_from_slice(secret)?,
        })
    }

    /// Signer using [`INSECURE_DEFAULT_KEY`].
    ///
    /// # Errors
    ///
    /// Propagates [`HandoffError::InvalidKey`] from keying the MAC.
    #[cfg(any(test, feature = "insecure-default-key"))]
    pub fn insecure_default() -> Result<Self, HandoffError> {
        Self::new(INSECURE_DEFAULT_KEY)
    }

    /// Hex-encoded signature of `payload`.
    ///
    /// # Errors
    ///
    /// Returns [`HandoffError::Serialize`] when `payload` is not JSON.
    pub fn sign<T>(&self, payload: &T) -> Result<String, HandoffError>
    where
        T: Serialize + ?Sized,
    {
        Ok(hex::encode(self.keyed(payload)?.finalize().into_bytes()))
    }

    /// Whether `signature` matches `payload`.
    ///
    /// Malformed signatures (wrong length, non-hex characters) are reported
    /// as a mismatch.
    ///
    /// # Errors
    ///
    /// Returns [`HandoffError::Serialize`] when `payload` is not JSON.
    pub fn verify<T>(&self, payload: &T, signature: &str) -> Result<bool, HandoffError>
    where
        T: Serialize + ?Sized,
    {
        let Ok(candidate) = hex::decode(signature.trim()) else {
            return Ok(false);
        };
        Ok(self.keyed(payload)?.verify_slice(&candidate).is_ok())
    }

    fn keyed<T>(&self, payload: &T) -> Result<HmacSha256, HandoffError>
    where
        T: Serialize + ?Sized,
    {
        let message = canonical_json(payload)?;
        let mut mac = self.mac.clone();
        mac.update(message.as_bytes());
        Ok(mac)
    }
}

impl fmt::Debug for HandoffSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandoffSigner").finish_non_exhaustive()
    }
}
