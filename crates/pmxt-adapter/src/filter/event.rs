/*
[INPUT]:  Events and an EventFilter (predicate, title text or EventCriteria)
[OUTPUT]: Matching events in their original order
[POS]:    Filter layer - event selection
[UPDATE]: When event criteria keys change
*/

use std::fmt;

use super::criteria::{EventCriteria, EventSearchField};
use super::{Matcher, contains_folded, contains_folded_opt, tags_overlap};
use crate::types::UnifiedEvent;

type EventPredicate<'f> = Box<dyn Fn(&UnifiedEvent) -> bool + Send + Sync + 'f>;

pub enum EventFilter<'f> {
    Predicate(EventPredicate<'f>),
    Text(String),
    Criteria(EventCriteria),
}

impl<'f> EventFilter<'f> {
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&UnifiedEvent) -> bool + Send + Sync + 'f,
    {
        EventFilter::Predicate(Box::new(f))
    }
}

impl fmt::Debug for EventFilter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventFilter::Predicate(_) => f.write_str("Predicate(..)"),
            EventFilter::Text(text) => f.debug_tuple("Text").field(text).finish(),
            EventFilter::Criteria(criteria) => f.debug_tuple("Criteria").field(criteria).finish(),
        }
    }
}

impl From<&str> for EventFilter<'_> {
    fn from(text: &str) -> Self {
        EventFilter::Text(text.to_string())
    }
}

impl From<String> for EventFilter<'_> {
    fn from(text: String) -> Self {
        EventFilter::Text(text)
    }
}

impl From<EventCriteria> for EventFilter<'_> {
    fn from(criteria: EventCriteria) -> Self {
        EventFilter::Criteria(criteria)
    }
}

impl Matcher<UnifiedEvent> for EventFilter<'_> {
    fn matches(&self, event: &UnifiedEvent) -> bool {
        match self {
            EventFilter::Predicate(predicate) => predicate(event),
            EventFilter::Text(text) => contains_folded(&event.title, &text.to_lowercase()),
            EventFilter::Criteria(criteria) => criteria.matches(event),
        }
    }
}

impl Matcher<UnifiedEvent> for EventCriteria {
    fn matches(&self, event: &UnifiedEvent) -> bool {
        if let Some(text) = &self.text {
            let needle = text.to_lowercase();
            let fields = self.search_in.as_deref().unwrap_or(&[EventSearchField::Title]);
            let hit = fields.iter().any(|field| match field {
                EventSearchField::Title => contains_folded(&event.title, &needle),
                EventSearchField::Description => {
                    contains_folded_opt(event.description.as_deref(), &needle)
                }
                EventSearchField::Category => {
                    contains_folded_opt(event.category.as_deref(), &needle)
                }
                EventSearchField::Tags => event
                    .tags
                    .iter()
                    .flatten()
                    .any(|tag| contains_folded(tag, &needle)),
            });
            if !hit {
                return false;
            }
        }

        if let Some(category) = &self.category {
            if event.category.as_deref() != Some(category.as_str()) {
                return false;
            }
        }

        if let Some(tags) = &self.tags {
            if !tags_overlap(tags, event.tags.as_deref()) {
                return false;
            }
        }

        if let Some(range) = &self.market_count {
            if !range.contains(&event.markets.len()) {
                return false;
            }
        }

        if let Some(range) = &self.total_volume {
            if !range.contains(&event.total_volume()) {
                return false;
            }
        }

        true
    }
}

/// Events from `events` accepted by `filter`, in their original order.
pub fn filter_events<'a>(events: &'a [UnifiedEvent], filter: &EventFilter<'_>) -> Vec<&'a UnifiedEvent> {
    filter.select(events)
}
