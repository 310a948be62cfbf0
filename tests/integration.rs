//! Integration tests for the Kalshi arbitrage bot.
//!
//! These tests require valid KALSHI credentials in the environment.
//! Run with: cargo test --test integration -- --ignored
//!
//! Note: These tests interact with the real Kalshi API. They only read;
//! no orders are submitted.

use kalshi_arb::auth::Authenticator;
use kalshi_arb::config::Config;
use kalshi_arb::market::{Exchange, KalshiClient};

/// Get a test config from environment, or None when credentials are absent.
fn test_config() -> Option<Config> {
    dotenvy::dotenv().ok();

    let config = Config::load().ok()?;
    config.auth_method()?;
    config.validate().ok()?;
    Some(config)
}

async fn live_client() -> Option<KalshiClient> {
    let config = test_config()?;
    let auth = Authenticator::from_config(&config).ok()?;
    let client = KalshiClient::new(&config, auth);
    client.authenticate().await.ok()?;
    Some(client)
}

/// Test that authentication succeeds with real credentials.
#[tokio::test]
#[ignore = "requires KALSHI credentials"]
async fn test_authenticate() {
    let config = match test_config() {
        Some(c) => c,
        None => {
            println!("Skipping: KALSHI credentials not set");
            return;
        }
    };

    let auth = Authenticator::from_config(&config).expect("credentials rejected");
    let client = KalshiClient::new(&config, auth);

    let result = client.authenticate().await;
    assert!(result.is_ok(), "Authentication failed: {:?}", result.err());
}

/// Test that the open-markets listing parses.
#[tokio::test]
#[ignore = "requires KALSHI credentials"]
async fn test_open_markets() {
    let client = match live_client().await {
        Some(c) => c,
        None => {
            println!("Skipping: KALSHI credentials not set");
            return;
        }
    };

    let markets = client.open_markets().await.expect("markets fetch failed");
    println!("Open markets: {}", markets.len());

    for market in markets.iter().take(5) {
        println!(
            "  {} yes_ask={:?} no_ask={:?}",
            market.ticker, market.yes_ask, market.no_ask
        );
        for price in [market.yes_bid, market.yes_ask, market.no_bid, market.no_ask]
            .into_iter()
            .flatten()
        {
            assert!((0..=100).contains(&price), "price {price} out of range");
        }
    }
}

/// Test that the positions listing parses.
#[tokio::test]
#[ignore = "requires KALSHI credentials"]
async fn test_positions() {
    let client = match live_client().await {
        Some(c) => c,
        None => {
            println!("Skipping: KALSHI credentials not set");
            return;
        }
    };

    let positions = client.positions().await.expect("positions fetch failed");
    println!("Position records: {}", positions.len());
}

/// Test a full read-only scan: fetch markets and run selection.
#[tokio::test]
#[ignore = "requires KALSHI credentials"]
async fn test_scan_without_trading() {
    let client = match live_client().await {
        Some(c) => c,
        None => {
            println!("Skipping: KALSHI credentials not set");
            return;
        }
    };

    let markets = client.open_markets().await.expect("markets fetch failed");
    match kalshi_arb::arbitrage::select_best(&markets, 1) {
        Some(opp) => println!(
            "Best opportunity: {} {} profit {}c",
            opp.action, opp.ticker, opp.profit_cents
        ),
        None => println!("No opportunity across {} markets", markets.len()),
    }
}
