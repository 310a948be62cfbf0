//! Position guard: refuse to trade while a position is already held.

use tracing::{info, warn};

use crate::config::GuardFailMode;
use crate::market::Exchange;

/// Check whether any instrument holds a nonzero position.
///
/// The at-most-one-position invariant is enforced here: the control loop
/// skips trading entirely while this returns true. When the positions fetch
/// itself fails the outcome is governed by `fail_mode` — `Open` assumes no
/// position and proceeds (the historical behavior), `Closed` assumes one
/// and skips the cycle.
pub async fn has_open_position<E: Exchange>(exchange: &E, fail_mode: GuardFailMode) -> bool {
    match exchange.positions().await {
        Ok(positions) => {
            let open = positions.iter().filter(|p| p.quantity != 0).count();
            if open > 0 {
                info!(count = open, "holding open position(s), skipping trade");
            }
            open > 0
        }
        Err(e) => match fail_mode {
            GuardFailMode::Open => {
                warn!(error = %e, "position check failed, proceeding (fail-open)");
                false
            }
            GuardFailMode::Closed => {
                warn!(error = %e, "position check failed, skipping cycle (fail-closed)");
                true
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::mock::MockExchange;
    use crate::market::PositionRecord;

    #[tokio::test]
    async fn no_positions_means_clear_to_trade() {
        let exchange = MockExchange::new();
        assert!(!has_open_position(&exchange, GuardFailMode::Open).await);
    }

    #[tokio::test]
    async fn nonzero_quantity_blocks_trading() {
        let exchange = MockExchange::new().with_positions(vec![PositionRecord {
            ticker: Some("ABC".to_string()),
            quantity: 3,
        }]);
        assert!(has_open_position(&exchange, GuardFailMode::Open).await);
    }

    #[tokio::test]
    async fn short_positions_count_as_open() {
        let exchange = MockExchange::new().with_positions(vec![PositionRecord {
            ticker: Some("ABC".to_string()),
            quantity: -2,
        }]);
        assert!(has_open_position(&exchange, GuardFailMode::Open).await);
    }

    #[tokio::test]
    async fn zero_quantity_records_do_not_block() {
        let exchange = MockExchange::new().with_positions(vec![PositionRecord {
            ticker: Some("ABC".to_string()),
            quantity: 0,
        }]);
        assert!(!has_open_position(&exchange, GuardFailMode::Open).await);
    }

    #[tokio::test]
    async fn fetch_failure_fails_open_by_default_policy() {
        let exchange = MockExchange::new().failing_positions();
        assert!(!has_open_position(&exchange, GuardFailMode::Open).await);
    }

    #[tokio::test]
    async fn fetch_failure_fails_closed_when_configured() {
        let exchange = MockExchange::new().failing_positions();
        assert!(has_open_position(&exchange, GuardFailMode::Closed).await);
    }
}
