/*
[INPUT]:  Structured filter settings (code, JSON or YAML)
[OUTPUT]: Typed criteria records whose keys are each optional
[POS]:    Filter layer - criteria definitions shared by market and event filters
[UPDATE]: When a filter dimension is added or its bounds change
*/

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{MarketOutcome, OutcomeSlot, UnifiedMarket};

/// Inclusive `[min, max]` bound; either side may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Range<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<T>,
}

impl<T: PartialOrd> Range<T> {
    pub fn at_least(min: T) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub fn at_most(max: T) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    pub fn between(min: T, max: T) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn contains(&self, value: &T) -> bool {
        if let Some(min) = &self.min {
            if value < min {
                return false;
            }
        }
        if let Some(max) = &self.max {
            if value > max {
                return false;
            }
        }
        true
    }
}

/// Exclusive time window over a market's resolution date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateWindow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<DateTime<Utc>>,
}

impl DateWindow {
    /// Undated markets never fall inside a window.
    pub fn contains(&self, date: Option<&DateTime<Utc>>) -> bool {
        let Some(date) = date else {
            return false;
        };
        if self.before.is_some_and(|before| *date >= before) {
            return false;
        }
        if self.after.is_some_and(|after| *date <= after) {
            return false;
        }
        true
    }
}

/// Range applied to one named outcome of a market.
///
/// Without an `outcome` the bound has nothing to select and is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutcomeRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<OutcomeSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Decimal>,
}

impl OutcomeRange {
    pub fn new(outcome: OutcomeSlot, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        Self {
            outcome: Some(outcome),
            min,
            max,
        }
    }

    fn bounds(&self) -> Range<Decimal> {
        Range {
            min: self.min,
            max: self.max,
        }
    }

    pub(crate) fn matches<F>(&self, market: &UnifiedMarket, value: F) -> bool
    where
        F: Fn(&MarketOutcome) -> Option<Decimal>,
    {
        let Some(slot) = self.outcome else {
            return true;
        };
        match market.outcome(slot).and_then(value) {
            Some(value) => self.bounds().contains(&value),
            None => false,
        }
    }
}

/// Market fields searched by a criteria `text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    Title,
    Description,
    Category,
    Tags,
    Outcomes,
}

/// Event fields searched by a criteria `text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSearchField {
    Title,
    Description,
    Category,
    Tags,
}

/// Structured market criteria. Every present key must hold.
///
/// Keys not listed here are dropped during deserialization.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MarketCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Defaults to `[title]` when `text` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_in: Option<Vec<SearchField>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_24h: Option<Range<Decimal>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<Range<Decimal>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liquidity: Option<Range<Decimal>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_interest: Option<Range<Decimal>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution_date: Option<DateWindow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<OutcomeRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_change_24h: Option<OutcomeRange>,
}

impl MarketCriteria {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn search_in(mut self, fields: impl IntoIterator<Item = SearchField>) -> Self {
        self.search_in = Some(fields.into_iter().collect());
        self
    }
}

/// Structured event criteria. Every present key must hold.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_in: Option<Vec<EventSearchField>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_count: Option<Range<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_volume: Option<Range<Decimal>>,
}

impl EventCriteria {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }
}
