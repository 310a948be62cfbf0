//! Kalshi trading API client.

use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::auth::Authenticator;
use crate::config::Config;
use crate::error::{AuthError, FetchError, OrderError};
use crate::metrics;
use crate::trading::{OrderConfirmation, OrderRequest};

use super::types::{MarketQuote, MarketsResponse, PositionRecord, PositionsResponse};
use super::Exchange;

/// Path orders are submitted to.
const ORDERS_PATH: &str = "/portfolio/orders";
/// Path positions are read from.
const POSITIONS_PATH: &str = "/portfolio/positions";

/// HTTP client for the trading API, credentialed per request by the
/// configured [`Authenticator`].
#[derive(Debug)]
pub struct KalshiClient {
    /// HTTP client for API requests.
    http: reqwest::Client,
    /// Base URL including the API version prefix.
    base_url: String,
    /// Credential strategy.
    auth: Authenticator,
    /// Markets listing page size.
    page_limit: u32,
}

impl KalshiClient {
    /// Create a client from config. Every call carries a request timeout so
    /// the single-threaded loop can never hang on a dead connection.
    pub fn new(config: &Config, auth: Authenticator) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(config.http_timeout_ms))
            .connect_timeout(std::time::Duration::from_millis(2_000))
            .tcp_nodelay(true)
            .tcp_keepalive(std::time::Duration::from_secs(30))
            .build()
            .expect("failed to create HTTP client");

        Self {
            http,
            base_url: config.kalshi_base_url.clone(),
            auth,
            page_limit: config.market_page_limit,
        }
    }

    /// Establish credentials: login for the session variant, no-op for the
    /// signed-key variant.
    pub async fn authenticate(&self) -> Result<(), AuthError> {
        self.auth.authenticate(&self.http, &self.base_url).await
    }

    /// The credential strategy in use.
    pub fn auth(&self) -> &Authenticator {
        &self.auth
    }

    /// Get the HTTP client reference.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Get the API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Signed/authorized GET returning parsed JSON.
    ///
    /// The signing payload covers the path exactly as requested, query
    /// string included.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let headers = self.auth.request_headers("GET", path, None).await?;
        let url = format!("{}{}", self.base_url, path);

        let mut request = self.http.get(&url);
        for (key, value) in headers {
            request = request.header(&key, &value);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                path: path.to_string(),
                status: response.status().as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))
    }
}

impl Exchange for KalshiClient {
    /// Fetch one page of open markets.
    ///
    /// This is a single bounded listing call, not a pagination loop: when
    /// the exchange has more open markets than the page limit the trailing
    /// markets are not considered. Accepted limitation, logged when hit.
    #[instrument(skip(self))]
    async fn open_markets(&self) -> Result<Vec<MarketQuote>, FetchError> {
        let path = format!("/markets?status=open&limit={}", self.page_limit);
        let response: MarketsResponse = self.get_json(&path).await?;

        if response.markets.len() as u32 >= self.page_limit {
            warn!(
                limit = self.page_limit,
                "markets page came back full; markets past the cap are not scanned"
            );
        }

        debug!(count = response.markets.len(), "fetched open markets");
        Ok(response.markets)
    }

    #[instrument(skip(self))]
    async fn positions(&self) -> Result<Vec<PositionRecord>, FetchError> {
        let response: PositionsResponse = self.get_json(POSITIONS_PATH).await?;
        debug!(count = response.positions.len(), "fetched positions");
        Ok(response.positions)
    }

    /// Submit one limit order. Non-2xx is reported, never retried here.
    #[instrument(skip(self, order), fields(ticker = %order.ticker, side = %order.side))]
    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderConfirmation, OrderError> {
        let _timer = metrics::timer_order_submit();

        let body = serde_json::to_value(order)?;
        let headers = self
            .auth
            .request_headers("POST", ORDERS_PATH, Some(&body))
            .await?;

        let url = format!("{}{}", self.base_url, ORDERS_PATH);
        let mut request = self.http.post(&url).json(&body);
        for (key, value) in headers {
            request = request.header(&key, &value);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            metrics::inc_orders_failed();
            return Err(OrderError::Rejected { status, body });
        }

        metrics::inc_orders_submitted();

        // Confirmation shape varies across API revisions; an unparseable
        // body still counts as an accepted order.
        Ok(response.json().await.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SessionAuth;
    use crate::config::{GuardFailMode, LegFailurePolicy};

    fn test_config() -> Config {
        Config {
            kalshi_email: Some("a@b.com".to_string()),
            kalshi_password: Some("secret".to_string()),
            kalshi_access_key: None,
            kalshi_private_key: None,
            kalshi_base_url: "https://api.elections.kalshi.com/trade-api/v2".to_string(),
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
    fn client_creation_works() {
        let config = test_config();
        let auth = Authenticator::Session(SessionAuth::new("a@b.com", "secret"));
        let client = KalshiClient::new(&config, auth);
        assert_eq!(
            client.base_url(),
            "https://api.elections.kalshi.com/trade-api/v2"
        );
    }
}
