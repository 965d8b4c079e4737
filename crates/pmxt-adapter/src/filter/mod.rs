/*
[INPUT]:  Already-fetched markets/events and a filter (predicate, text or criteria)
[OUTPUT]: Order-preserving subsequence of the items that match
[POS]:    Filter layer - pure, in-memory selection over value objects
[UPDATE]: When adding filter forms or new criteria dimensions
*/

pub mod criteria;
pub mod event;
pub mod market;

pub use criteria::{
    DateWindow, EventCriteria, EventSearchField, MarketCriteria, OutcomeRange, Range, SearchField,
};
pub use event::{EventFilter, filter_events};
pub use market::{MarketFilter, filter_markets};

/// Something that can accept or reject an item of type `T`.
pub trait Matcher<T> {
    fn matches(&self, item: &T) -> bool;

    /// Items that match, in their original order.
    fn select<'a>(&self, items: &'a [T]) -> Vec<&'a T> {
        items.iter().filter(|item| self.matches(item)).collect()
    }
}

/// Case-insensitive containment against an already lower-cased needle.
pub(crate) fn contains_folded(haystack: &str, needle: &str) -> bool {
    !haystack.is_empty() && haystack.to_lowercase().contains(needle)
}

pub(crate) fn contains_folded_opt(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|value| contains_folded(value, needle))
}

/// ANY-of tag match, ignoring case. An empty query places no constraint.
pub(crate) fn tags_overlap(query: &[String], tags: Option<&[String]>) -> bool {
    if query.is_empty() {
        return true;
    }
    let Some(tags) = tags.filter(|tags| !tags.is_empty()) else {
        return false;
    };
    let tags: Vec<String> = tags.iter().map(|tag| tag.to_lowercase()).collect();
    query
        .iter()
        .any(|wanted| tags.contains(&wanted.to_lowercase()))
}
