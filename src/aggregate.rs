use std::collections::HashMap;

use crate::classify::{is_new, is_today};
use crate::config::FeedConfig;
use crate::fetcher::RawEntry;

/// One report row: a distinct identifier merged across every feed that carried it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedEntry {
    pub guid: String,
    pub title: String,
    pub pub_date: String,
    /// `[name](url)` labels in first-sighting order
    pub sources: Vec<String>,
    pub is_new: bool,
    pub is_today: bool,
}

impl AggregatedEntry {
    pub fn feeds_label(&self) -> String {
        self.sources.join(", ")
    }
}

/// Merges entries by identifier, preserving first-sighting order.
///
/// Novelty and "today" are computed once when an identifier is first seen;
/// later sightings only append their feed label.
pub struct Aggregator<'a> {
    prior_report: &'a str,
    reference_date: String,
    entries: Vec<AggregatedEntry>,
    index: HashMap<String, usize>,
}

impl<'a> Aggregator<'a> {
    pub fn new(prior_report: &'a str, reference_date: impl Into<String>) -> Self {
        Self {
            prior_report,
            reference_date: reference_date.into(),
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn add(&mut self, feed: &FeedConfig, entry: RawEntry) {
        let label = feed.label();

        if let Some(&pos) = self.index.get(&entry.guid) {
            let existing = &mut self.entries[pos];
            if !existing.sources.contains(&label) {
                existing.sources.push(label);
            }
            return;
        }

        let aggregated = AggregatedEntry {
            is_new: is_new(&entry.guid, self.prior_report),
            is_today: is_today(&entry.pub_date, &self.reference_date),
            guid: entry.guid,
            title: entry.title,
            pub_date: entry.pub_date,
            sources: vec![label],
        };
        self.index.insert(aggregated.guid.clone(), self.entries.len());
        self.entries.push(aggregated);
    }

    pub fn extend<I>(&mut self, feed: &FeedConfig, entries: I)
    where
        I: IntoIterator<Item = RawEntry>,
    {
        for entry in entries {
            self.add(feed, entry);
        }
    }

    pub fn into_entries(self) -> Vec<AggregatedEntry> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TODAY: &str = "Mon, 09 Dec 2024";

    fn raw(guid: &str, title: &str, pub_date: &str) -> RawEntry {
        RawEntry {
            title: title.to_string(),
            guid: guid.to_string(),
            pub_date: pub_date.to_string(),
        }
    }

    fn feed(tag: &str) -> FeedConfig {
        FeedConfig::new(format!("https://medium.com/feed/tag/{}", tag))
    }

    #[test]
    fn test_one_entry_per_identifier() {
        let mut agg = Aggregator::new("", TODAY);
        agg.add(&feed("security"), raw("a", "A", "Mon, 09 Dec 2024 12:00:00 GMT"));
        agg.add(&feed("security"), raw("b", "B", "Sun, 08 Dec 2024 12:00:00 GMT"));
        agg.add(&feed("bug-bounty"), raw("a", "A again", "Mon, 09 Dec 2024 12:00:00 GMT"));

        let entries = agg.into_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].guid, "a");
        assert_eq!(entries[0].title, "A");
        assert_eq!(entries[1].guid, "b");
    }

    #[test]
    fn test_sources_accumulate_in_first_sighting_order() {
        let mut agg = Aggregator::new("", TODAY);
        agg.add(&feed("vulnerability"), raw("a", "A", ""));
        agg.add(&feed("bug-bounty"), raw("a", "A", ""));
        agg.add(&feed("security"), raw("a", "A", ""));

        let entries = agg.into_entries();
        assert_eq!(
            entries[0].feeds_label(),
            "[vulnerability](https://medium.com/feed/tag/vulnerability), \
             [bug-bounty](https://medium.com/feed/tag/bug-bounty), \
             [security](https://medium.com/feed/tag/security)"
        );
    }

    #[test]
    fn test_same_feed_repeat_adds_no_label() {
        let mut agg = Aggregator::new("", TODAY);
        agg.add(&feed("security"), raw("a", "A", ""));
        agg.add(&feed("security"), raw("a", "A", ""));

        let entries = agg.into_entries();
        assert_eq!(entries[0].sources.len(), 1);
    }

    #[test]
    fn test_flags_fixed_at_first_sighting() {
        let mut agg = Aggregator::new("", TODAY);
        agg.add(&feed("security"), raw("a", "A", "Mon, 09 Dec 2024 12:00:00 GMT"));
        // Same identifier, different date: flags must not change
        agg.add(&feed("bug-bounty"), raw("a", "A", "Sun, 08 Dec 2024 12:00:00 GMT"));

        let entries = agg.into_entries();
        assert!(entries[0].is_new);
        assert!(entries[0].is_today);
        assert_eq!(entries[0].pub_date, "Mon, 09 Dec 2024 12:00:00 GMT");
    }

    #[test]
    fn test_novelty_from_prior_report() {
        let prior =
            "| x | [Old](guid-123) | [security](https://medium.com/feed/tag/security) | Yes |  |";
        let mut agg = Aggregator::new(prior, TODAY);
        agg.add(&feed("vulnerability"), raw("guid-123", "Old", ""));
        agg.add(&feed("vulnerability"), raw("guid-999", "Fresh", ""));

        let entries = agg.into_entries();
        assert!(!entries[0].is_new);
        assert!(entries[1].is_new);
    }

    #[test]
    fn test_malformed_date_not_today() {
        let mut agg = Aggregator::new("", TODAY);
        agg.extend(&feed("security"), vec![raw("a", "A", "garbage")]);

        let entries = agg.into_entries();
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].is_today);
    }

    #[test]
    fn test_empty() {
        let agg = Aggregator::new("", TODAY);
        assert!(agg.into_entries().is_empty());
    }
}
