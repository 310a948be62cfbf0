//! Market and position snapshot types.

use serde::Deserialize;

/// Best-quote snapshot for one binary market.
///
/// Prices are integer cents in [0,100]. An absent field means the exchange
/// published no quote on that side — distinct from a real quote of 0, which
/// is a legitimate price. Presence is always tested with `Option`, never
/// with truthiness on the value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MarketQuote {
    /// Unique market identifier.
    pub ticker: String,
    /// Best yes-side bid, cents.
    #[serde(default)]
    pub yes_bid: Option<i64>,
    /// Best yes-side ask, cents.
    #[serde(default)]
    pub yes_ask: Option<i64>,
    /// Best no-side bid, cents.
    #[serde(default)]
    pub no_bid: Option<i64>,
    /// Best no-side ask, cents.
    #[serde(default)]
    pub no_ask: Option<i64>,
}

impl MarketQuote {
    /// Both ask prices, when both sides are quoted.
    pub fn ask_pair(&self) -> Option<(i64, i64)> {
        Some((self.yes_ask?, self.no_ask?))
    }

    /// Both bid prices, when both sides are quoted.
    pub fn bid_pair(&self) -> Option<(i64, i64)> {
        Some((self.yes_bid?, self.no_bid?))
    }
}

/// Markets listing response.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketsResponse {
    /// One page of open markets, exchange-defined order.
    #[serde(default)]
    pub markets: Vec<MarketQuote>,
}

/// One position record from the portfolio endpoint.
///
/// Only the quantity matters to the guard; everything else is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct PositionRecord {
    /// Instrument ticker.
    #[serde(default)]
    pub ticker: Option<String>,
    /// Contracts held; nonzero means an open position.
    #[serde(default)]
    pub quantity: i64,
}

/// Positions listing response.
#[derive(Debug, Clone, Deserialize)]
pub struct PositionsResponse {
    /// All position records for the account.
    #[serde(default)]
    pub positions: Vec<PositionRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pairs_require_both_sides() {
        let quote = MarketQuote {
            ticker: "ABC".to_string(),
            yes_bid: Some(50),
            yes_ask: Some(52),
            no_bid: None,
            no_ask: Some(49),
        };
        assert_eq!(quote.ask_pair(), Some((52, 49)));
        assert_eq!(quote.bid_pair(), None);
    }

    #[test]
    fn zero_is_a_real_quote() {
        let quote = MarketQuote {
            ticker: "ABC".to_string(),
            yes_bid: None,
            yes_ask: Some(0),
            no_bid: None,
            no_ask: Some(95),
        };
        assert_eq!(quote.ask_pair(), Some((0, 95)));
    }

    #[test]
    fn missing_fields_deserialize_as_none() {
        let quote: MarketQuote =
            serde_json::from_str(r#"{"ticker":"ABC","yes_ask":40}"#).unwrap();
        assert_eq!(quote.yes_ask, Some(40));
        assert_eq!(quote.no_ask, None);
        assert_eq!(quote.yes_bid, None);
    }

    #[test]
    fn positions_parse_with_extra_fields() {
        let response: PositionsResponse = serde_json::from_str(
            r#"{"positions":[{"ticker":"ABC","quantity":2,"market_exposure":100}]}"#,
        )
        .unwrap();
        assert_eq!(response.positions.len(), 1);
        assert_eq!(response.positions[0].quantity, 2);
    }
}
