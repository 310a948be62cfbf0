//! Kalshi yes/no pair arbitrage bot.
//!
//! A binary market's yes and no contracts settle to exactly 100 cents
//! between them. The bot polls the exchange's open markets, looks for
//! quote pairs that violate that bound, and submits two correlated limit
//! orders against the single best mispricing per scan:
//!
//! - asks summing below 100c: buy both sides, pocket the difference
//! - bids summing above 100c: sell both sides, pocket the difference
//!
//! A position guard keeps the account to at most one concurrent trade,
//! and a small HTTP API exposes health, status, and Prometheus metrics.
//!
//! # Architecture
//!
//! - [`config`] - Environment-based configuration
//! - [`error`] - Error types
//! - [`auth`] - Session-token and signed-key credential strategies
//! - [`market`] - Exchange interface, live client, and test mock
//! - [`arbitrage`] - Opportunity selection and two-leg execution
//! - [`trading`] - Order construction and the position guard
//! - [`api`] - Health/status/metrics HTTP endpoints
//! - [`metrics`] - Prometheus metric definitions

pub mod api;
pub mod arbitrage;
pub mod auth;
pub mod config;
pub mod error;
pub mod market;
pub mod metrics;
pub mod trading;
pub mod utils;

pub use config::Config;
pub use error::{BotError, Result};
