//! Scriptable in-memory exchange for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::{FetchError, OrderError};
use crate::trading::{OrderConfirmation, OrderRequest};

use super::types::{MarketQuote, PositionRecord};
use super::Exchange;

/// Mock exchange with canned market data, canned positions, and per-order
/// scripted outcomes. Every submitted order is recorded for inspection.
#[derive(Debug, Default)]
pub struct MockExchange {
    quotes: Vec<MarketQuote>,
    positions: Vec<PositionRecord>,
    fail_markets: bool,
    fail_positions: bool,
    /// Scripted outcomes consumed front-to-back, one per submitted order.
    /// When the script runs dry, orders succeed.
    order_script: Mutex<VecDeque<Result<OrderConfirmation, OrderError>>>,
    submitted: Mutex<Vec<OrderRequest>>,
}

impl MockExchange {
    /// Empty mock: no markets, no positions, every order accepted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve these market quotes.
    pub fn with_quotes(mut self, quotes: Vec<MarketQuote>) -> Self {
        self.quotes = quotes;
        self
    }

    /// Serve these position records.
    pub fn with_positions(mut self, positions: Vec<PositionRecord>) -> Self {
        self.positions = positions;
        self
    }

    /// Make the markets fetch fail.
    pub fn failing_markets(mut self) -> Self {
        self.fail_markets = true;
        self
    }

    /// Make the positions fetch fail.
    pub fn failing_positions(mut self) -> Self {
        self.fail_positions = true;
        self
    }

    /// Script the outcome of the next submitted order. Chain to script
    /// several in submission order.
    pub fn then_order_result(self, result: Result<OrderConfirmation, OrderError>) -> Self {
        if let Ok(mut script) = self.order_script.lock() {
            script.push_back(result);
        }
        self
    }

    /// Script the next order to be rejected.
    pub fn then_order_rejected(self) -> Self {
        self.then_order_result(Err(OrderError::Rejected {
            status: 400,
            body: "scripted rejection".to_string(),
        }))
    }

    /// Orders submitted so far, in submission order.
    pub fn submitted(&self) -> Vec<OrderRequest> {
        self.submitted
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

impl Exchange for MockExchange {
    async fn open_markets(&self) -> Result<Vec<MarketQuote>, FetchError> {
        if self.fail_markets {
            return Err(FetchError::Status {
                path: "/markets".to_string(),
                status: 500,
            });
        }
        Ok(self.quotes.clone())
    }

    async fn positions(&self) -> Result<Vec<PositionRecord>, FetchError> {
        if self.fail_positions {
            return Err(FetchError::Status {
                path: "/portfolio/positions".to_string(),
                status: 500,
            });
        }
        Ok(self.positions.clone())
    }

    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderConfirmation, OrderError> {
        if let Ok(mut submitted) = self.submitted.lock() {
            submitted.push(order.clone());
        }
        if let Ok(mut script) = self.order_script.lock() {
            if let Some(result) = script.pop_front() {
                return result;
            }
        }
        Ok(OrderConfirmation::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trading::{Action, Side};

    #[tokio::test]
    async fn records_submissions_in_order() {
        let exchange = MockExchange::new();
        let first = OrderRequest::limit("ABC", Action::Buy, Side::Yes, 1, 40);
        let second = OrderRequest::limit("ABC", Action::Buy, Side::No, 1, 55);
        exchange.submit_order(&first).await.unwrap();
        exchange.submit_order(&second).await.unwrap();

        let submitted = exchange.submitted();
        assert_eq!(submitted.len(), 2);
        assert_eq!(submitted[0].side, Side::Yes);
        assert_eq!(submitted[1].side, Side::No);
    }

    #[tokio::test]
    async fn scripted_failure_applies_once() {
        let exchange = MockExchange::new().then_order_rejected();
        let order = OrderRequest::limit("ABC", Action::Buy, Side::Yes, 1, 40);
        assert!(exchange.submit_order(&order).await.is_err());
        assert!(exchange.submit_order(&order).await.is_ok());
    }
}
