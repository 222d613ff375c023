// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Substring name search.
use std::ops::Range;

use crate::dataset::Dataset;
use crate::ident::PersonId;
use crate::names::normalize_name;

/// Maximum results returned by [`SearchIndex::search`].
pub const MAX_RESULTS: usize = 8;

#[derive(Debug, Clone)]
struct Entry {
    id: PersonId,
    display: String,
    key: String,
}

/// Lowercased normalised names in dataset order.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    entries: Vec<Entry>,
}

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Matching person.
    pub id: PersonId,
    /// Normalised display name.
    pub display: String,
    /// Byte range of the match inside `display`, when it maps cleanly.
    pub highlight: Option<Range<usize>>,
}

impl SearchIndex {
    /// Indexes every person of `dataset`.
    pub fn build(dataset: &Dataset) -> Self {
        let entries = dataset
            .people()
            .iter()
            .map(|p| {
                let display = normalize_name(&p.name);
                let key = display.to_lowercase();
                Entry {
                    id: p.id.clone(),
                    display,
                    key,
                }
            })
            .collect();
        Self { entries }
    }

    /// Case-insensitive substring match on the trimmed `query`.
    ///
    /// An empty query matches nothing. At most [`MAX_RESULTS`] hits are
    /// returned, in dataset order.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.entries
            .iter()
            .filter_map(|e| {
                let at = e.key.find(&needle)?;
                Some(SearchHit {
                    id: e.id.clone(),
                    display: e.display.clone(),
                    highlight: highlight_range(e, at, needle.len()),
                })
            })
            .take(MAX_RESULTS)
            .collect()
    }

    /// Number of indexed people.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Lowercasing can change byte lengths outside ASCII; only hand back a range
// when the two strings line up.
fn highlight_range(entry: &Entry, at: usize, len: usize) -> Option<Range<usize>> {
    let range = at..at + len;
    let aligned = entry.key.len() == entry.display.len()
        && entry.display.is_char_boundary(range.start)
        && entry.display.is_char_boundary(range.end);
    aligned.then_some(range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Person;

    fn index(names: &[&str]) -> SearchIndex {
        let people = names
            .iter()
            .enumerate()
            .map(|(i, n)| Person::new(format!("p{i}"), *n))
            .collect();
        SearchIndex::build(&Dataset::new(people, vec![]))
    }

    #[test]
    fn matches_case_insensitively_with_highlight() {
        let idx = index(&["ali bin hassan", "Siti binti Yusof"]);
        let hits = idx.search("  HASS ");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].display, "Ali bin Hassan");
        assert_eq!(hits[0].highlight, Some(8..12));
        assert_eq!(&hits[0].display[8..12], "Hass");
    }

    #[test]
    fn empty_query_matches_nothing() {
        let idx = index(&["a"]);
        assert!(idx.search("   ").is_empty());
    }

    #[test]
    fn results_are_capped() {
        let names: Vec<String> = (0..20).map(|i| format!("Nur {i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let hits = index(&refs).search("nur");
        assert_eq!(hits.len(), MAX_RESULTS);
        assert_eq!(hits[0].id, "p0");
    }
}
