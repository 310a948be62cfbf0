//! Market data access: the exchange interface, the live client, and a
//! scriptable mock for tests.

pub mod client;
pub mod mock;
pub mod types;

pub use client::KalshiClient;
pub use types::{MarketQuote, MarketsResponse, PositionRecord, PositionsResponse};

use crate::error::{FetchError, OrderError};
use crate::trading::{OrderConfirmation, OrderRequest};

/// Everything the control loop needs from an exchange.
///
/// The guard and executor are generic over this so they can run against
/// [`mock::MockExchange`] in tests.
#[allow(async_fn_in_trait)]
pub trait Exchange {
    /// One page of open markets with best quotes.
    async fn open_markets(&self) -> Result<Vec<MarketQuote>, FetchError>;

    /// All position records for the account.
    async fn positions(&self) -> Result<Vec<PositionRecord>, FetchError>;

    /// Submit a limit order.
    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderConfirmation, OrderError>;
}
