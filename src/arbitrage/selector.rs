//! Scan a page of market quotes for the single best mispricing.

use tracing::{debug, info};

use crate::market::MarketQuote;
use crate::trading::Action;

/// Contract payout in cents. A yes/no pair always settles to exactly this.
pub const PAYOUT_CENTS: i64 = 100;

/// One actionable mispricing in a single market.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opportunity {
    /// Buy both contracts (asks sum below payout) or sell both (bids sum
    /// above payout).
    pub action: Action,
    /// Market to trade.
    pub ticker: String,
    /// Yes-leg limit price, cents.
    pub yes_price: i64,
    /// No-leg limit price, cents.
    pub no_price: i64,
    /// Guaranteed profit per contract pair, cents.
    pub profit_cents: i64,
}

impl Opportunity {
    /// Sum of the two leg prices.
    pub fn pair_sum(&self) -> i64 {
        self.yes_price + self.no_price
    }
}

/// Pick the most profitable opportunity at or above `threshold_cents`.
///
/// Each market is checked for both violations of the no-arbitrage bound:
/// asks summing below 100 (buy both) and bids summing above 100 (sell
/// both). A side missing either quote is skipped, not treated as zero.
/// Ties keep the first opportunity seen, so the scan is deterministic for
/// a given listing order. At most one opportunity is returned per scan.
pub fn select_best(quotes: &[MarketQuote], threshold_cents: i64) -> Option<Opportunity> {
    let mut best: Option<Opportunity> = None;

    for quote in quotes {
        if let Some((yes_ask, no_ask)) = quote.ask_pair() {
            let sum = yes_ask + no_ask;
            if sum < PAYOUT_CENTS {
                consider(
                    &mut best,
                    Opportunity {
                        action: Action::Buy,
                        ticker: quote.ticker.clone(),
                        yes_price: yes_ask,
                        no_price: no_ask,
                        profit_cents: PAYOUT_CENTS - sum,
                    },
                    threshold_cents,
                );
            }
        }

        if let Some((yes_bid, no_bid)) = quote.bid_pair() {
            let sum = yes_bid + no_bid;
            if sum > PAYOUT_CENTS {
                consider(
                    &mut best,
                    Opportunity {
                        action: Action::Sell,
                        ticker: quote.ticker.clone(),
                        yes_price: yes_bid,
                        no_price: no_bid,
                        profit_cents: sum - PAYOUT_CENTS,
                    },
                    threshold_cents,
                );
            }
        }
    }

    match &best {
        Some(opp) => info!(
            ticker = %opp.ticker,
            action = %opp.action,
            profit_cents = opp.profit_cents,
            "selected opportunity"
        ),
        None => debug!(
            markets = quotes.len(),
            threshold_cents, "no opportunity above threshold"
        ),
    }

    best
}

/// Strictly-greater comparison keeps the first-seen opportunity on ties.
fn consider(best: &mut Option<Opportunity>, candidate: Opportunity, threshold_cents: i64) {
    if candidate.profit_cents < threshold_cents {
        return;
    }
    let beats = match best {
        Some(current) => candidate.profit_cents > current.profit_cents,
        None => true,
    };
    if beats {
        *best = Some(candidate);
    }
}
