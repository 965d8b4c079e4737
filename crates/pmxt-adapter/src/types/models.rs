/*
[INPUT]:  Sidecar wire schema (camelCase JSON) and serde requirements
[OUTPUT]: Immutable value objects for markets, books, orders and accounts
[POS]:    Data layer - type definitions for sidecar communication
[UPDATE]: When the sidecar schema changes or new types added
[UPDATE]: 2026-10-12 Added binary outcome normalization for two-outcome markets
*/

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::enums::{OrderStatus, OrderType, OutcomeSlot, Side, TradeSide};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketOutcome {
    /// Identifier used for order book, history and trade queries.
    /// Distinct from the owning market's id.
    pub outcome_id: String,
    pub label: String,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub price: Decimal,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price_change_24h: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedMarket {
    pub market_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub outcomes: Vec<MarketOutcome>,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub volume_24h: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub liquidity: Decimal,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub volume: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub open_interest: Option<Decimal>,
    #[serde(default)]
    pub resolution_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yes: Option<MarketOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no: Option<MarketOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up: Option<MarketOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down: Option<MarketOutcome>,
}

impl UnifiedMarket {
    /// Outcome stored in a named slot, if the venue models the market that way.
    pub fn outcome(&self, slot: OutcomeSlot) -> Option<&MarketOutcome> {
        match slot {
            OutcomeSlot::Yes => self.yes.as_ref(),
            OutcomeSlot::No => self.no.as_ref(),
            OutcomeSlot::Up => self.up.as_ref(),
            OutcomeSlot::Down => self.down.as_ref(),
        }
    }

    pub fn has_slots(&self) -> bool {
        self.yes.is_some() || self.no.is_some() || self.up.is_some() || self.down.is_some()
    }

    /// Every populated slot aliases a member of `outcomes`.
    pub fn slots_consistent(&self) -> bool {
        [self.yes.as_ref(), self.no.as_ref(), self.up.as_ref(), self.down.as_ref()]
            .into_iter()
            .flatten()
            .all(|slot| {
                self.outcomes
                    .iter()
                    .any(|outcome| outcome.outcome_id == slot.outcome_id)
            })
    }

    /// Fill `yes`/`no` (and the `up`/`down` aliases) for two-outcome markets.
    ///
    /// Positive labels are `yes`, `up` and `over`; negative labels are `no`,
    /// `down` and `under`. A label starting with `not ` is treated as the
    /// negative side. Anything else keeps listing order. Markets with any
    /// other number of outcomes are left as they are.
    pub fn assign_binary_outcomes(&mut self) {
        let [first, second] = self.outcomes.as_slice() else {
            return;
        };

        let l1 = first.label.to_lowercase();
        let l2 = second.label.to_lowercase();
        let positive = |label: &str| matches!(label, "yes" | "up" | "over");
        let negative = |label: &str| matches!(label, "no" | "down" | "under");

        let (yes, no) = if positive(&l1) || negative(&l2) {
            (first, second)
        } else if positive(&l2) || negative(&l1) {
            (second, first)
        } else if l2.starts_with("not ") {
            (first, second)
        } else if l1.starts_with("not ") {
            (second, first)
        } else {
            (first, second)
        };

        let (yes, no) = (yes.clone(), no.clone());
        self.up = Some(yes.clone());
        self.down = Some(no.clone());
        self.yes = Some(yes);
        self.no = Some(no);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedEvent {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub markets: Vec<UnifiedMarket>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl UnifiedEvent {
    /// Sum of the child markets' 24h volume.
    pub fn total_volume(&self) -> Decimal {
        self.markets.iter().map(|market| market.volume_24h).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceCandle {
    /// Bucket start, Unix milliseconds.
    pub timestamp: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub open: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub high: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub low: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub close: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub volume: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLevel {
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub size: Decimal,
}

impl OrderLevel {
    pub fn new(price: Decimal, size: Decimal) -> Self {
        Self { price, size }
    }
}

/// Snapshot of resting liquidity for one outcome.
///
/// Bids are conventionally best-first (descending) and asks ascending, but
/// nothing upstream guarantees it. Every accessor here scans or sorts instead
/// of trusting position.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrderBook {
    #[serde(default)]
    pub bids: Vec<OrderLevel>,
    #[serde(default)]
    pub asks: Vec<OrderLevel>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl OrderBook {
    pub fn best_bid(&self) -> Option<&OrderLevel> {
        self.bids
            .iter()
            .filter(|level| level.size > Decimal::ZERO)
            .max_by(|a, b| a.price.cmp(&b.price))
    }

    pub fn best_ask(&self) -> Option<&OrderLevel> {
        self.asks
            .iter()
            .filter(|level| level.size > Decimal::ZERO)
            .min_by(|a, b| a.price.cmp(&b.price))
    }

    pub fn spread(&self) -> Option<Decimal> {
        Some(self.best_ask()?.price - self.best_bid()?.price)
    }

    pub fn mid_price(&self) -> Option<Decimal> {
        Some((self.best_ask()?.price + self.best_bid()?.price) / Decimal::TWO)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: String,
    pub timestamp: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(default)]
    pub side: TradeSide,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub market_id: String,
    pub outcome_id: String,
    pub side: Side,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub status: OrderStatus,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub filled: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub remaining: Decimal,
    pub timestamp: i64,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub fee: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub market_id: String,
    pub outcome_id: String,
    #[serde(default)]
    pub outcome_label: String,
    /// Positive for long, negative for short.
    #[serde(with = "rust_decimal::serde::float")]
    pub size: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub entry_price: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub current_price: Decimal,
    #[serde(
        rename = "unrealizedPnL",
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub unrealized_pnl: Decimal,
    #[serde(
        rename = "realizedPnL",
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub realized_pnl: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub currency: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub available: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub locked: Decimal,
}

/// Outcome of walking one side of a book for a given quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionPriceResult {
    /// Volume-weighted average fill price, zero when nothing matched.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub filled_amount: Decimal,
    pub fully_filled: bool,
}

mod serde_helpers {
    use super::Decimal;
    use rust_decimal::prelude::ToPrimitive;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;
    use std::str::FromStr;

    pub fn deserialize_decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        if value.is_null() {
            return Ok(Decimal::ZERO);
        }

        if let Some(raw) = value.as_str() {
            if raw.trim().is_empty() {
                return Ok(Decimal::ZERO);
            }
            return Decimal::from_str(raw).map_err(serde::de::Error::custom);
        }

        if value.is_number() {
            let raw = value.to_string();
            return Decimal::from_str(&raw)
                .or_else(|_| Decimal::from_scientific(&raw))
                .map_err(serde::de::Error::custom);
        }

        Err(serde::de::Error::custom("invalid decimal value"))
    }

    pub fn serialize_decimal<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value.to_f64() {
            Some(number) => serializer.serialize_f64(number),
            None => Err(serde::ser::Error::custom("decimal out of f64 range")),
        }
    }
}
