//! Application configuration loaded from environment variables.

use serde::Deserialize;
use strum::{Display, EnumString};

use crate::error::ConfigError;

/// Which credential material the bot authenticates with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum AuthMethod {
    /// Email/password login producing a bearer token.
    #[strum(serialize = "session")]
    Session,
    /// Access-key + RSA private key, one signature per request.
    #[strum(serialize = "signed-key")]
    SignedKey,
}

/// What the position guard does when the positions fetch itself fails.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum GuardFailMode {
    /// Assume no position and keep trading. Matches the historical behavior;
    /// risks stacking a second position on top of an invisible first one.
    #[default]
    #[strum(serialize = "open")]
    Open,
    /// Assume a position exists and skip the cycle.
    #[strum(serialize = "closed")]
    Closed,
}

/// What happens after an execution leaves a one-sided position
/// (one leg accepted, the other rejected).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum LegFailurePolicy {
    /// Log the naked leg and keep running. Matches the historical behavior:
    /// no rollback, no retry, no cancel of the filled leg.
    #[default]
    #[strum(serialize = "ignore")]
    Ignore,
    /// Terminate the process so a human resolves the naked position.
    #[strum(serialize = "halt")]
    Halt,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Kalshi Credentials ===
    /// Account email (session login variant).
    #[serde(default)]
    pub kalshi_email: Option<String>,

    /// Account password (session login variant).
    #[serde(default)]
    pub kalshi_password: Option<String>,

    /// API access key id (signed-key variant).
    #[serde(default)]
    pub kalshi_access_key: Option<String>,

    /// RSA private key PEM (signed-key variant).
    #[serde(default)]
    pub kalshi_private_key: Option<String>,

    /// Trading API base URL.
    #[serde(default = "default_base_url")]
    pub kalshi_base_url: String,

    // === Trading Parameters ===
    /// Minimum profit per contract pair, in cents.
    #[serde(default = "default_threshold")]
    pub profit_threshold_cents: i64,

    /// Contracts per leg.
    #[serde(default = "default_count")]
    pub contract_count: i64,

    /// Seconds between scan cycles.
    #[serde(default = "default_scan_interval")]
    pub scan_interval_secs: u64,

    /// Markets listing page size. The scan is a single page; markets past
    /// this cap are not considered.
    #[serde(default = "default_page_limit")]
    pub market_page_limit: u32,

    /// Delay between the yes and no legs, in milliseconds.
    #[serde(default = "default_leg_delay")]
    pub leg_delay_ms: u64,

    /// Base backoff after a cycle error, in seconds.
    #[serde(default = "default_backoff")]
    pub error_backoff_secs: u64,

    // === Policies ===
    /// Position-guard behavior when the positions check fails.
    #[serde(default)]
    pub guard_fail_mode: GuardFailMode,

    /// Behavior after a one-sided execution.
    #[serde(default)]
    pub leg_failure_policy: LegFailurePolicy,

    // === HTTP ===
    /// Request timeout applied to every API call, in milliseconds.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_ms: u64,

    // === Server Configuration ===
    /// HTTP server port for health/metrics endpoints.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,
}

fn default_base_url() -> String {
    "https://api.elections.kalshi.com/trade-api/v2".to_string()
}

fn default_threshold() -> i64 {
    1
}

fn default_count() -> i64 {
    1
}

fn default_scan_interval() -> u64 {
    60
}

fn default_page_limit() -> u32 {
    1000
}

fn default_leg_delay() -> u64 {
    300
}

fn default_backoff() -> u64 {
    30
}

fn default_http_timeout() -> u64 {
    10_000
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Ok(envy::from_env()?)
    }

    /// Determine the auth method from which credential pair is present.
    /// The signed-key pair wins when both are set.
    pub fn auth_method(&self) -> Option<AuthMethod> {
        if self.kalshi_access_key.is_some() && self.kalshi_private_key.is_some() {
            Some(AuthMethod::SignedKey)
        } else if self.kalshi_email.is_some() && self.kalshi_password.is_some() {
            Some(AuthMethod::Session)
        } else {
            None
        }
    }

    /// Check the configuration, collecting every problem into one error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        if self.auth_method().is_none() {
            problems.push(
                "set KALSHI_ACCESS_KEY + KALSHI_PRIVATE_KEY or KALSHI_EMAIL + KALSHI_PASSWORD"
                    .to_string(),
            );
        }

        if self.contract_count < 1 {
            problems.push("CONTRACT_COUNT must be at least 1".to_string());
        }

        if self.profit_threshold_cents < 1 {
            problems.push("PROFIT_THRESHOLD_CENTS must be at least 1".to_string());
        }

        if self.scan_interval_secs == 0 {
            problems.push("SCAN_INTERVAL_SECS must be positive".to_string());
        }

        if self.market_page_limit == 0 || self.market_page_limit > 1000 {
            problems.push("MARKET_PAGE_LIMIT must be in 1..=1000".to_string());
        }

        if self.http_timeout_ms == 0 {
            problems.push("HTTP_TIMEOUT_MS must be positive".to_string());
        }

        if self.kalshi_base_url.is_empty() {
            problems.push("KALSHI_BASE_URL must not be empty".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid { problems })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn base_config() -> Config {
        Config {
            kalshi_email: None,
            kalshi_password: None,
            kalshi_access_key: Some("access-key".to_string()),
            kalshi_private_key: Some("pem".to_string()),
            kalshi_base_url: default_base_url(),
            profit_threshold_cents: default_threshold(),
            contract_count: default_count(),
            scan_interval_secs: default_scan_interval(),
            market_page_limit: default_page_limit(),
            leg_delay_ms: default_leg_delay(),
            error_backoff_secs: default_backoff(),
            guard_fail_mode: GuardFailMode::default(),
            leg_failure_policy: LegFailurePolicy::default(),
            http_timeout_ms: default_http_timeout(),
            port: default_port(),
            rust_log: default_log_level(),
        }
    }

    #[test]
    fn default_values_are_sensible() {
        assert_eq!(default_threshold(), 1);
        assert_eq!(default_count(), 1);
        assert_eq!(default_scan_interval(), 60);
        assert_eq!(default_page_limit(), 1000);
        assert_eq!(GuardFailMode::default(), GuardFailMode::Open);
        assert_eq!(LegFailurePolicy::default(), LegFailurePolicy::Ignore);
    }

    #[test]
    fn signed_key_pair_selects_signed_key() {
        let config = base_config();
        assert_eq!(config.auth_method(), Some(AuthMethod::SignedKey));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn email_password_selects_session() {
        let mut config = base_config();
        config.kalshi_access_key = None;
        config.kalshi_private_key = None;
        config.kalshi_email = Some("a@b.com".to_string());
        config.kalshi_password = Some("secret".to_string());
        assert_eq!(config.auth_method(), Some(AuthMethod::Session));
    }

    #[test]
    fn signed_key_wins_when_both_pairs_present() {
        let mut config = base_config();
        config.kalshi_email = Some("a@b.com".to_string());
        config.kalshi_password = Some("secret".to_string());
        assert_eq!(config.auth_method(), Some(AuthMethod::SignedKey));
    }

    #[test]
    fn validate_collects_all_problems() {
        let mut config = base_config();
        config.kalshi_access_key = None;
        config.kalshi_private_key = None;
        config.contract_count = 0;
        config.market_page_limit = 5000;

        let err = config.validate().unwrap_err();
        match err {
            ConfigError::Invalid { problems } => {
                assert_eq!(problems.len(), 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn guard_fail_mode_parses_from_string() {
        use std::str::FromStr;
        assert_eq!(GuardFailMode::from_str("open").unwrap(), GuardFailMode::Open);
        assert_eq!(GuardFailMode::from_str("closed").unwrap(), GuardFailMode::Closed);
        assert_eq!(
            LegFailurePolicy::from_str("halt").unwrap(),
            LegFailurePolicy::Halt
        );
    }
}
