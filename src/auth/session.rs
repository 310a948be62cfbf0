//! Session-token authentication: email/password login, bearer header.

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::AuthError;

/// Login request body.
#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Login response body.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// Holds the session token and re-logs-in on demand.
///
/// The token is session-scoped: the control loop calls [`SessionAuth::login`]
/// again after any cycle failure rather than retrying individual requests.
pub struct SessionAuth {
    email: String,
    password: String,
    token: RwLock<Option<String>>,
}

impl SessionAuth {
    /// Create an unauthenticated session holder.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            token: RwLock::new(None),
        }
    }

    /// Log in and replace the stored token. Non-2xx is an [`AuthError`].
    pub async fn login(
        &self,
        http: &reqwest::Client,
        base_url: &str,
    ) -> Result<(), AuthError> {
        let url = format!("{}/login", base_url);
        let body = LoginRequest {
            email: &self.email,
            password: &self.password,
        };

        let response = http.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::LoginFailed { status, body });
        }

        let login: LoginResponse = response
            .json()
            .await
            .map_err(|e| AuthError::LoginFailed {
                status: 200,
                body: format!("unparseable login response: {e}"),
            })?;

        *self.token.write().await = Some(login.token);
        info!("logged in, session token refreshed");
        Ok(())
    }

    /// The current bearer token, or [`AuthError::NotAuthenticated`] if no
    /// login has succeeded yet.
    pub async fn bearer(&self) -> Result<String, AuthError> {
        let guard = self.token.read().await;
        match guard.as_deref() {
            Some(token) => Ok(format!("Bearer {token}")),
            None => {
                debug!("bearer requested before login");
                Err(AuthError::NotAuthenticated)
            }
        }
    }
}

impl std::fmt::Debug for SessionAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionAuth")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bearer_before_login_is_an_error() {
        let auth = SessionAuth::new("a@b.com", "secret");
        let result = auth.bearer().await;
        assert!(matches!(result, Err(AuthError::NotAuthenticated)));
    }

    #[tokio::test]
    async fn bearer_reflects_stored_token() {
        let auth = SessionAuth::new("a@b.com", "secret");
        *auth.token.write().await = Some("tok-123".to_string());
        assert_eq!(auth.bearer().await.unwrap(), "Bearer tok-123");
    }

    #[test]
    fn debug_redacts_password() {
        let auth = SessionAuth::new("a@b.com", "secret");
        let debug_str = format!("{:?}", auth);
        assert!(!debug_str.contains("secret"));
        assert!(debug_str.contains("[REDACTED]"));
    }
}
