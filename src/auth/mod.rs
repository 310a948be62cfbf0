//! Authentication strategies for the trading API.
//!
//! Two mutually exclusive credential variants sit behind one interface:
//! a session token obtained by login, or a per-request RSA-PSS signature.
//! The variant is selected by configuration at startup, not by parallel
//! code paths.

pub mod canonical;
pub mod key;
pub mod session;

pub use canonical::canonical_json;
pub use key::RequestSigner;
pub use session::SessionAuth;

use serde_json::Value;

use crate::config::{AuthMethod, Config};
use crate::error::AuthError;

/// Credential strategy: produces the headers that authenticate one request.
#[derive(Debug)]
pub enum Authenticator {
    /// Bearer token from a login call.
    Session(SessionAuth),
    /// Asymmetric signature per request; no refresh, key lives for the
    /// process lifetime.
    Key(RequestSigner),
}

impl Authenticator {
    /// Build the authenticator selected by the configuration.
    ///
    /// A malformed private key fails here, before any trading starts.
    pub fn from_config(config: &Config) -> Result<Self, AuthError> {
        match config.auth_method() {
            Some(AuthMethod::SignedKey) => {
                // auth_method() guarantees both fields are present
                let access_key = config.kalshi_access_key.as_deref().unwrap_or_default();
                let pem = config.kalshi_private_key.as_deref().unwrap_or_default();
                Ok(Self::Key(RequestSigner::from_pem(access_key, pem)?))
            }
            Some(AuthMethod::Session) => {
                let email = config.kalshi_email.clone().unwrap_or_default();
                let password = config.kalshi_password.clone().unwrap_or_default();
                Ok(Self::Session(SessionAuth::new(email, password)))
            }
            None => Err(AuthError::KeyRejected(
                "no credential pair configured".to_string(),
            )),
        }
    }

    /// The method this authenticator implements, for logging.
    pub fn method(&self) -> AuthMethod {
        match self {
            Self::Session(_) => AuthMethod::Session,
            Self::Key(_) => AuthMethod::SignedKey,
        }
    }

    /// Credential headers for one request.
    pub async fn request_headers(
        &self,
        method: &str,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Vec<(String, String)>, AuthError> {
        match self {
            Self::Session(session) => {
                Ok(vec![("Authorization".to_string(), session.bearer().await?)])
            }
            Self::Key(signer) => signer.headers(method, path, body),
        }
    }

    /// Establish credentials: logs in for the session variant, no-op for
    /// the signed-key variant. Called at startup and after cycle errors.
    pub async fn authenticate(
        &self,
        http: &reqwest::Client,
        base_url: &str,
    ) -> Result<(), AuthError> {
        match self {
            Self::Session(session) => session.login(http, base_url).await,
            Self::Key(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GuardFailMode;
    use crate::config::LegFailurePolicy;

    fn key_config(pem: &str) -> Config {
        Config {
            kalshi_email: None,
            kalshi_password: None,
            kalshi_access_key: Some("key-id".to_string()),
            kalshi_private_key: Some(pem.to_string()),
            kalshi_base_url: "https://test".to_string(),
            profit_threshold_cents: 1,
            contract_count: 1,
            scan_interval_secs: 60,
            market_page_limit: 1000,
            leg_delay_ms: 300,
            error_backoff_secs: 30,
            guard_fail_mode: GuardFailMode::Open,
            leg_failure_policy: LegFailurePolicy::Ignore,
            http_timeout_ms: 10_000,
            port: 8080,
            rust_log: "info".to_string(),
        }
    }

    #[test]
    fn malformed_key_is_fatal_at_construction() {
        let config = key_config("garbage");
        assert!(Authenticator::from_config(&config).is_err());
    }

    #[test]
    fn session_variant_constructs_without_network() {
        let mut config = key_config("unused");
        config.kalshi_access_key = None;
        config.kalshi_private_key = None;
        config.kalshi_email = Some("a@b.com".to_string());
        config.kalshi_password = Some("secret".to_string());

        let auth = Authenticator::from_config(&config).unwrap();
        assert_eq!(auth.method(), AuthMethod::Session);
    }

    #[tokio::test]
    async fn session_headers_require_login_first() {
        let auth = Authenticator::Session(SessionAuth::new("a@b.com", "secret"));
        let result = auth.request_headers("GET", "/markets", None).await;
        assert!(result.is_err());
    }
}
