//! Order types and request construction.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Order action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Action {
    /// Buy both contracts below the 100c payout.
    Buy,
    /// Sell both contracts above the 100c payout.
    Sell,
}

/// Contract side of a binary market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Side {
    /// The "yes" contract.
    Yes,
    /// The "no" contract.
    No,
}

impl Side {
    /// Get the opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            Side::Yes => Side::No,
            Side::No => Side::Yes,
        }
    }
}

/// Limit-order submission body.
///
/// Exactly one of `yes_price`/`no_price` is set. For buys the price rides in
/// the leg's own side field; for sells it rides in the opposite side's field,
/// mirroring the exchange's complementary-price convention (yes + no = 100).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRequest {
    /// Market ticker.
    pub ticker: String,
    /// Buy or sell.
    pub action: Action,
    /// Always "limit".
    #[serde(rename = "type")]
    pub order_type: &'static str,
    /// Contracts to trade.
    pub count: i64,
    /// Which contract this leg trades.
    pub side: Side,
    /// Limit price in cents, yes-side field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yes_price: Option<i64>,
    /// Limit price in cents, no-side field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_price: Option<i64>,
}

impl OrderRequest {
    /// Build a limit order, routing the price into the correct field.
    pub fn limit(
        ticker: impl Into<String>,
        action: Action,
        side: Side,
        count: i64,
        price_cents: i64,
    ) -> Self {
        let price_field = match action {
            Action::Buy => side,
            Action::Sell => side.opposite(),
        };

        let (yes_price, no_price) = match price_field {
            Side::Yes => (Some(price_cents), None),
            Side::No => (None, Some(price_cents)),
        };

        Self {
            ticker: ticker.into(),
            action,
            order_type: "limit",
            count,
            side,
            yes_price,
            no_price,
        }
    }

    /// The limit price, whichever field carries it.
    pub fn price_cents(&self) -> Option<i64> {
        self.yes_price.or(self.no_price)
    }

    /// Validate order parameters before submission.
    pub fn validate(&self) -> Result<(), String> {
        if self.ticker.is_empty() {
            return Err("ticker is required".to_string());
        }
        if self.count < 1 {
            return Err("count must be at least 1".to_string());
        }
        match self.price_cents() {
            Some(p) if (0..=100).contains(&p) => Ok(()),
            Some(p) => Err(format!("price {p} out of range 0..=100")),
            None => Err("price is required".to_string()),
        }
    }
}

/// Order confirmation returned by the exchange.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderConfirmation {
    /// Confirmed order, when the exchange nests it.
    #[serde(default)]
    pub order: Option<ConfirmedOrder>,
}

/// Fields of a confirmed order we care about.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfirmedOrder {
    /// Exchange-assigned order id.
    #[serde(default)]
    pub order_id: Option<String>,
    /// Order status string.
    #[serde(default)]
    pub status: Option<String>,
}

impl OrderConfirmation {
    /// The exchange-assigned order id, if reported.
    pub fn order_id(&self) -> Option<&str> {
        self.order.as_ref()?.order_id.as_deref()
    }
}
