//! Unified error types for the arbitrage bot.

use thiserror::Error;

/// Unified error type for the arbitrage bot.
#[derive(Error, Debug)]
pub enum BotError {
    /// Configuration loading or validation error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Authentication or signing error.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// Market/position fetch error.
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Order submission error.
    #[error("order error: {0}")]
    Order(#[from] OrderError),

    /// HTTP request error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration errors. Always startup-fatal.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment deserialization failed.
    #[error("failed to load environment: {0}")]
    Load(#[from] envy::Error),

    /// One or more values failed validation. All problems are collected
    /// before reporting so a broken deployment surfaces everything at once.
    #[error("invalid configuration: {}", problems.join("; "))]
    Invalid {
        /// Every validation failure found.
        problems: Vec<String>,
    },
}

/// Authentication and request-signing errors.
///
/// A malformed or missing private key is startup-fatal; a failed session
/// login is retried by the control loop on its next cycle.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Session login rejected by the exchange.
    #[error("login failed: HTTP {status} - {body}")]
    LoginFailed {
        /// HTTP status returned.
        status: u16,
        /// Response body text.
        body: String,
    },

    /// No session token held yet (login never succeeded).
    #[error("not authenticated: no session token")]
    NotAuthenticated,

    /// Private key PEM could not be parsed.
    #[error("private key rejected: {0}")]
    KeyRejected(String),

    /// Signature computation failed.
    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// Transport failure during login.
    #[error("auth request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Read-endpoint errors (markets, positions). Treated as "no data this
/// cycle" by the control loop; never fatal.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Non-2xx response.
    #[error("fetch of {path} failed: HTTP {status}")]
    Status {
        /// Request path.
        path: String,
        /// HTTP status returned.
        status: u16,
    },

    /// Response body could not be parsed.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// Credential headers could not be produced.
    #[error("auth failure during fetch: {0}")]
    Auth(#[from] AuthError),

    /// Transport failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Order-submission errors. Logged per leg; no compensating action is taken.
#[derive(Error, Debug)]
pub enum OrderError {
    /// Order rejected with a non-2xx status.
    #[error("order rejected: HTTP {status} - {body}")]
    Rejected {
        /// HTTP status returned.
        status: u16,
        /// Response body text.
        body: String,
    },

    /// Credential headers could not be produced.
    #[error("auth failure during order submission: {0}")]
    Auth(#[from] AuthError),

    /// Order body could not be serialized.
    #[error("failed to encode order: {0}")]
    Encode(#[from] serde_json::Error),

    /// Transport failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, BotError>;
