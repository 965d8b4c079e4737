/*
[INPUT]:  Markets and a MarketFilter (predicate, title text or MarketCriteria)
[OUTPUT]: Matching markets in their original order
[POS]:    Filter layer - market selection
[UPDATE]: When market criteria keys or their evaluation order change
*/

use std::fmt;

use rust_decimal::Decimal;

use super::criteria::{MarketCriteria, SearchField};
use super::{Matcher, contains_folded, contains_folded_opt, tags_overlap};
use crate::types::UnifiedMarket;

type MarketPredicate<'f> = Box<dyn Fn(&UnifiedMarket) -> bool + Send + Sync + 'f>;

/// The three ways a caller can select markets.
pub enum MarketFilter<'f> {
    /// Arbitrary test. Panics propagate to the caller.
    Predicate(MarketPredicate<'f>),
    /// Case-insensitive substring of the title.
    Text(String),
    Criteria(MarketCriteria),
}

impl<'f> MarketFilter<'f> {
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&UnifiedMarket) -> bool + Send + Sync + 'f,
    {
        MarketFilter::Predicate(Box::new(f))
    }
}

impl fmt::Debug for MarketFilter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketFilter::Predicate(_) => f.write_str("Predicate(..)"),
            MarketFilter::Text(text) => f.debug_tuple("Text").field(text).finish(),
            MarketFilter::Criteria(criteria) => f.debug_tuple("Criteria").field(criteria).finish(),
        }
    }
}

impl From<&str> for MarketFilter<'_> {
    fn from(text: &str) -> Self {
        MarketFilter::Text(text.to_string())
    }
}

impl From<String> for MarketFilter<'_> {
    fn from(text: String) -> Self {
        MarketFilter::Text(text)
    }
}

impl From<MarketCriteria> for MarketFilter<'_> {
    fn from(criteria: MarketCriteria) -> Self {
        MarketFilter::Criteria(criteria)
    }
}

impl Matcher<UnifiedMarket> for MarketFilter<'_> {
    fn matches(&self, market: &UnifiedMarket) -> bool {
        match self {
            MarketFilter::Predicate(predicate) => predicate(market),
            MarketFilter::Text(text) => contains_folded(&market.title, &text.to_lowercase()),
            MarketFilter::Criteria(criteria) => criteria.matches(market),
        }
    }
}

impl Matcher<UnifiedMarket> for MarketCriteria {
    fn matches(&self, market: &UnifiedMarket) -> bool {
        if let Some(text) = &self.text {
            if !self.text_matches(market, &text.to_lowercase()) {
                return false;
            }
        }

        if let Some(category) = &self.category {
            if market.category.as_deref() != Some(category.as_str()) {
                return false;
            }
        }

        if let Some(tags) = &self.tags {
            if !tags_overlap(tags, market.tags.as_deref()) {
                return false;
            }
        }

        if let Some(range) = &self.volume_24h {
            if !range.contains(&market.volume_24h) {
                return false;
            }
        }

        if let Some(range) = &self.volume {
            if !range.contains(&market.volume.unwrap_or(Decimal::ZERO)) {
                return false;
            }
        }

        if let Some(range) = &self.liquidity {
            if !range.contains(&market.liquidity) {
                return false;
            }
        }

        if let Some(range) = &self.open_interest {
            if !range.contains(&market.open_interest.unwrap_or(Decimal::ZERO)) {
                return false;
            }
        }

        if let Some(window) = &self.resolution_date {
            if !window.contains(market.resolution_date.as_ref()) {
                return false;
            }
        }

        if let Some(range) = &self.price {
            if !range.matches(market, |outcome| Some(outcome.price)) {
                return false;
            }
        }

        if let Some(range) = &self.price_change_24h {
            if !range.matches(market, |outcome| outcome.price_change_24h) {
                return false;
            }
        }

        true
    }
}

impl MarketCriteria {
    fn text_matches(&self, market: &UnifiedMarket, needle: &str) -> bool {
        let fields = self.search_in.as_deref().unwrap_or(&[SearchField::Title]);
        fields.iter().any(|field| match field {
            SearchField::Title => contains_folded(&market.title, needle),
            SearchField::Description => contains_folded_opt(market.description.as_deref(), needle),
            SearchField::Category => contains_folded_opt(market.category.as_deref(), needle),
            SearchField::Tags => market
                .tags
                .iter()
                .flatten()
                .any(|tag| contains_folded(tag, needle)),
            SearchField::Outcomes => market
                .outcomes
                .iter()
                .any(|outcome| contains_folded(&outcome.label, needle)),
        })
    }
}

/// Markets from `markets` accepted by `filter`, in their original order.
pub fn filter_markets<'a>(markets: &'a [UnifiedMarket], filter: &MarketFilter<'_>) -> Vec<&'a UnifiedMarket> {
    filter.select(markets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::criteria::{DateWindow, OutcomeRange, Range};
    use crate::types::{MarketOutcome, OutcomeSlot};
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn outcome(id: &str, label: &str, price: Decimal, change: Option<Decimal>) -> MarketOutcome {
        MarketOutcome {
            outcome_id: id.to_string(),
            label: label.to_string(),
            price,
            price_change_24h: change,
            metadata: None,
        }
    }

    fn market(id: &str, title: &str) -> UnifiedMarket {
        UnifiedMarket {
            market_id: id.to_string(),
            title: title.to_string(),
            description: None,
            outcomes: Vec::new(),
            volume_24h: Decimal::ZERO,
            liquidity: Decimal::ZERO,
            volume: None,
            open_interest: None,
            resolution_date: None,
            url: None,
            image: None,
            category: None,
            tags: None,
            yes: None,
            no: None,
            up: None,
            down: None,
        }
    }

    fn binary(id: &str, title: &str, yes_price: Decimal, change: Option<Decimal>) -> UnifiedMarket {
        let mut m = market(id, title);
        m.outcomes = vec![
            outcome(&format!("{id}-y"), "Yes", yes_price, change),
            outcome(&format!("{id}-n"), "No", Decimal::ONE - yes_price, None),
        ];
        m.assign_binary_outcomes();
        m
    }

    fn sample() -> Vec<UnifiedMarket> {
        let mut fed = binary("fed", "Fed cuts rates in December?", dec!(0.35), Some(dec!(0.05)));
        fed.category = Some("Economics".to_string());
        fed.tags = Some(vec!["Fed".to_string(), "Rates".to_string()]);
        fed.volume_24h = dec!(1000);
        fed.liquidity = dec!(5000);
        fed.resolution_date = Some(Utc.with_ymd_and_hms(2026, 12, 18, 0, 0, 0).unwrap());

        let mut election = binary("elec", "Who wins the Senate?", dec!(0.62), None);
        election.category = Some("Politics".to_string());
        election.tags = Some(vec!["Politics".to_string()]);
        election.description = Some("Resolves on certified federal results".to_string());
        election.volume_24h = dec!(25000);
        election.volume = Some(dec!(900000));
        election.liquidity = dec!(40000);

        let mut multi = market("multi", "Largest company by market cap");
        multi.outcomes = vec![
            outcome("m-a", "Apple", dec!(0.4), None),
            outcome("m-b", "Nvidia", dec!(0.5), None),
        ];
        multi.volume_24h = dec!(300);
        multi.open_interest = Some(dec!(12));

        let untitled = market("blank", "");

        vec![fed, election, multi, untitled]
    }

    fn ids(markets: &[&UnifiedMarket]) -> Vec<String> {
        markets.iter().map(|m| m.market_id.clone()).collect()
    }

    #[test]
    fn text_filter_matches_title_case_insensitively() {
        let markets = sample();

        let found = filter_markets(&markets, &"SENATE".into());

        assert_eq!(ids(&found), vec!["elec"]);
    }

    #[test]
    fn text_filter_never_matches_missing_title() {
        let markets = sample();

        let found = filter_markets(&markets, &"".into());

        assert!(!ids(&found).contains(&"blank".to_string()));
    }

    #[test]
    fn text_filter_equals_title_only_criteria() {
        let markets = sample();
        for query in ["fed", "WHO", "cap", "zzz"] {
            let by_text = filter_markets(&markets, &query.into());
            let by_criteria = filter_markets(
                &markets,
                &MarketCriteria::text(query).search_in([SearchField::Title]).into(),
            );
            assert_eq!(ids(&by_text), ids(&by_criteria), "query {query}");
        }
    }

    #[test]
    fn text_search_spans_selected_fields() {
        let markets = sample();

        let by_description = filter_markets(
            &markets,
            &MarketCriteria::text("federal")
                .search_in([SearchField::Description])
                .into(),
        );
        assert_eq!(ids(&by_description), vec!["elec"]);

        let by_outcome = filter_markets(
            &markets,
            &MarketCriteria::text("nvid")
                .search_in([SearchField::Title, SearchField::Outcomes])
                .into(),
        );
        assert_eq!(ids(&by_outcome), vec!["multi"]);

        let by_tag = filter_markets(
            &markets,
            &MarketCriteria::text("rat").search_in([SearchField::Tags]).into(),
        );
        assert_eq!(ids(&by_tag), vec!["fed"]);
    }

    #[test]
    fn category_is_exact_and_case_sensitive() {
        let markets = sample();
        let criteria = |category: &str| MarketCriteria {
            category: Some(category.to_string()),
            ..MarketCriteria::default()
        };

        assert_eq!(ids(&filter_markets(&markets, &criteria("Politics").into())), vec!["elec"]);
        assert!(filter_markets(&markets, &criteria("politics").into()).is_empty());
    }

    #[test]
    fn tags_match_any_ignoring_case() {
        let markets = sample();
        let criteria = MarketCriteria {
            tags: Some(vec!["politics".to_string(), "sports".to_string()]),
            ..MarketCriteria::default()
        };

        assert_eq!(ids(&filter_markets(&markets, &criteria.into())), vec!["elec"]);
    }

    #[test]
    fn volume_range_boundary_is_inclusive() {
        let markets = sample();
        let at = |min| MarketCriteria {
            volume_24h: Some(Range::at_least(min)),
            ..MarketCriteria::default()
        };

        assert!(ids(&filter_markets(&markets, &at(dec!(1000)).into())).contains(&"fed".to_string()));
        assert!(!ids(&filter_markets(&markets, &at(dec!(1000.01)).into())).contains(&"fed".to_string()));
    }

    #[test]
    fn missing_volume_and_open_interest_count_as_zero() {
        let markets = sample();
        let criteria = MarketCriteria {
            volume: Some(Range::at_most(dec!(0))),
            open_interest: Some(Range::at_most(dec!(0))),
            ..MarketCriteria::default()
        };

        assert_eq!(ids(&filter_markets(&markets, &criteria.into())), vec!["fed", "blank"]);
    }

    #[test]
    fn resolution_window_excludes_undated_markets() {
        let markets = sample();
        let criteria = MarketCriteria {
            resolution_date: Some(DateWindow {
                before: Some(Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap()),
                after: None,
            }),
            ..MarketCriteria::default()
        };

        assert_eq!(ids(&filter_markets(&markets, &criteria.into())), vec!["fed"]);
    }

    #[test]
    fn price_filter_reads_named_slot() {
        let markets = sample();
        let criteria = MarketCriteria {
            price: Some(OutcomeRange::new(OutcomeSlot::Yes, Some(dec!(0.5)), None)),
            ..MarketCriteria::default()
        };

        assert_eq!(ids(&filter_markets(&markets, &criteria.into())), vec!["elec"]);

        let down = MarketCriteria {
            price: Some(OutcomeRange::new(OutcomeSlot::Down, None, Some(dec!(0.5)))),
            ..MarketCriteria::default()
        };
        assert_eq!(ids(&filter_markets(&markets, &down.into())), vec!["elec"]);
    }

    #[test]
    fn price_change_filter_excludes_missing_change() {
        let markets = sample();
        let criteria = MarketCriteria {
            price_change_24h: Some(OutcomeRange::new(OutcomeSlot::Yes, Some(dec!(-1)), None)),
            ..MarketCriteria::default()
        };

        assert_eq!(ids(&filter_markets(&markets, &criteria.into())), vec!["fed"]);
    }

    #[test]
    fn price_filter_without_outcome_is_ignored() {
        let markets = sample();
        let criteria = MarketCriteria {
            price: Some(OutcomeRange {
                outcome: None,
                min: Some(dec!(0.99)),
                max: None,
            }),
            ..MarketCriteria::default()
        };

        assert_eq!(filter_markets(&markets, &criteria.into()).len(), markets.len());
    }

    #[test]
    fn structured_keys_compose_as_intersection() {
        let markets = sample();
        let volume = MarketCriteria {
            volume_24h: Some(Range::at_least(dec!(500))),
            ..MarketCriteria::default()
        };
        let liquidity = MarketCriteria {
            liquidity: Some(Range::at_most(dec!(10000))),
            ..MarketCriteria::default()
        };
        let both = MarketCriteria {
            volume_24h: volume.volume_24h,
            liquidity: liquidity.liquidity,
            ..MarketCriteria::default()
        };

        let a = ids(&filter_markets(&markets, &volume.into()));
        let b = ids(&filter_markets(&markets, &liquidity.into()));
        let expected: Vec<String> = a.into_iter().filter(|id| b.contains(id)).collect();

        assert_eq!(ids(&filter_markets(&markets, &both.into())), expected);
        assert_eq!(expected, vec!["fed"]);
    }

    #[test]
    fn predicate_keeps_input_order() {
        let markets = sample();
        let filter = MarketFilter::predicate(|m| m.outcomes.len() == 2);

        assert_eq!(ids(&filter_markets(&markets, &filter)), vec!["fed", "elec", "multi"]);
    }

    #[test]
    #[should_panic(expected = "predicate failure")]
    fn predicate_panics_propagate() {
        let markets = sample();
        let filter = MarketFilter::predicate(|_| panic!("predicate failure"));

        let _ = filter_markets(&markets, &filter);
    }
}
