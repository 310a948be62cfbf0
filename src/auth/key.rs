//! Per-request RSA-PSS signing for the access-key credential variant.
//!
//! Each request is signed over `timestamp + METHOD + path + canonical-body`
//! and attached as three headers. The key is parsed once at startup; a
//! missing or malformed key is fatal because no request can ever succeed
//! without it.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::pss::SigningKey;
use rsa::signature::{RandomizedSigner, SignatureEncoding};
use rsa::RsaPrivateKey;
use serde_json::Value;
use sha2::Sha256;
use tracing::debug;

use super::canonical::canonical_json;
use crate::error::AuthError;
use crate::metrics;

/// Header carrying the access key id.
pub const HEADER_ACCESS_KEY: &str = "KALSHI-ACCESS-KEY";
/// Header carrying the millisecond timestamp used in the payload.
pub const HEADER_TIMESTAMP: &str = "KALSHI-ACCESS-TIMESTAMP";
/// Header carrying the base64 RSA-PSS signature.
pub const HEADER_SIGNATURE: &str = "KALSHI-ACCESS-SIGNATURE";

/// Signs requests with a process-lifetime RSA private key.
#[derive(Clone)]
pub struct RequestSigner {
    access_key: String,
    signing_key: SigningKey<Sha256>,
}

impl RequestSigner {
    /// Parse a PEM private key (PKCS#8 or PKCS#1) and build a signer.
    pub fn from_pem(access_key: &str, pem: &str) -> Result<Self, AuthError> {
        let key = RsaPrivateKey::from_pkcs8_pem(pem)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
            .map_err(|e| AuthError::KeyRejected(e.to_string()))?;

        debug!("private key loaded");

        Ok(Self {
            access_key: access_key.to_string(),
            signing_key: SigningKey::<Sha256>::new(key),
        })
    }

    /// Build the canonical payload string for one request.
    ///
    /// The body is included when present, encoded canonically so the payload
    /// is reproducible regardless of map insertion order.
    pub fn signing_payload(
        timestamp_ms: &str,
        method: &str,
        path: &str,
        body: Option<&Value>,
    ) -> String {
        format!(
            "{}{}{}{}",
            timestamp_ms,
            method.to_uppercase(),
            path,
            canonical_json(body)
        )
    }

    /// Produce credential headers for one request.
    ///
    /// The PSS padding is randomized, so two calls over the same payload
    /// yield different signatures; only the public key is needed to verify.
    pub fn headers(
        &self,
        method: &str,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Vec<(String, String)>, AuthError> {
        let _timer = metrics::timer_signing();

        let timestamp = chrono::Utc::now().timestamp_millis().to_string();
        let payload = Self::signing_payload(&timestamp, method, path, body);

        let signature = self
            .signing_key
            .try_sign_with_rng(&mut rand::thread_rng(), payload.as_bytes())
            .map_err(|e| AuthError::SigningFailed(e.to_string()))?;

        Ok(vec![
            (HEADER_ACCESS_KEY.to_string(), self.access_key.clone()),
            (HEADER_TIMESTAMP.to_string(), timestamp),
            (HEADER_SIGNATURE.to_string(), BASE64.encode(signature.to_bytes())),
        ])
    }

    /// The access key id this signer authenticates as.
    pub fn access_key(&self) -> &str {
        &self.access_key
    }
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner")
            .field("access_key", &self.access_key)
            .field("signing_key", &"[REDACTED]")
            .finish()
    }
}
