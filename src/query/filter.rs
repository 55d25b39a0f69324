//! Multi-criteria filter engine

use crate::core::FilterCriteria;
use crate::store::Snapshot;
use rayon::prelude::*;
use serde::Serialize;

/// Collections at least this large are scanned in parallel
pub const PARALLEL_THRESHOLD: usize = 50_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterResult {
    /// Matches in store order, truncated to the requested limit
    pub words: Vec<String>,
    /// Matches before truncation
    pub total_matches: usize,
}

/// Evaluate `criteria` against every word in `snapshot`
///
/// The full collection is always scanned; `limit` only truncates the
/// returned page, so `total_matches` stays exact.
#[must_use]
pub fn filter(snapshot: &Snapshot, criteria: &FilterCriteria) -> FilterResult {
    let criteria = criteria.normalized();
    let words = snapshot.words();

    let mut matches: Vec<String> = if criteria.is_unconstrained() {
        words.to_vec()
    } else if words.len() >= PARALLEL_THRESHOLD {
        // par_iter + collect keeps the original order
        words
            .par_iter()
            .filter(|w| criteria.accepts(w))
            .cloned()
            .collect()
    } else {
        words
            .iter()
            .filter(|w| criteria.accepts(w))
            .cloned()
            .collect()
    };

    let total_matches = matches.len();
    if let Some(limit) = criteria.limit {
        matches.truncate(limit);
    }

    FilterResult {
        words: matches,
        total_matches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(words: &[&str]) -> Snapshot {
        Snapshot::from_words(words.iter().map(|w| (*w).to_string()).collect(), 1)
    }

    #[test]
    fn contains_substring() {
        let snap = snapshot(&["cat", "dog"]);
        let result = filter(&snap, &FilterCriteria::new().contains("a"));
        assert_eq!(result.words, vec!["cat"]);
        assert_eq!(result.total_matches, 1);
    }

    #[test]
    fn predicates_are_and_combined() {
        let snap = snapshot(&["crane", "crate", "trace", "cranes", "cat"]);
        let criteria = FilterCriteria::new()
            .starts_with("cr")
            .ends_with("e")
            .exact_length(5)
            .min_length(5)
            .max_length(5);
        assert_eq!(filter(&snap, &criteria).words, vec!["crane", "crate"]);
    }

    #[test]
    fn conflicting_lengths_match_nothing() {
        let snap = snapshot(&["crane", "cat"]);
        let criteria = FilterCriteria::new().exact_length(5).max_length(3);
        let result = filter(&snap, &criteria);
        assert!(result.words.is_empty());
        assert_eq!(result.total_matches, 0);
    }

    #[test]
    fn limit_truncates_after_counting() {
        let snap = snapshot(&["cat", "car", "cab", "dog"]);
        let result = filter(&snap, &FilterCriteria::new().starts_with("ca").limit(2));
        assert_eq!(result.words, vec!["cat", "car"]);
        assert_eq!(result.total_matches, 3);
    }

    #[test]
    fn empty_criteria_returns_store_order() {
        let snap = snapshot(&["dog", "cat", "owl"]);
        let result = filter(&snap, &FilterCriteria::new());
        assert_eq!(result.words, vec!["dog", "cat", "owl"]);

        let limited = filter(&snap, &FilterCriteria::new().limit(1));
        assert_eq!(limited.words, vec!["dog"]);
        assert_eq!(limited.total_matches, 3);
    }

    #[test]
    fn criteria_are_case_insensitive() {
        let snap = snapshot(&["cat", "dog"]);
        let result = filter(&snap, &FilterCriteria::new().starts_with(" CA "));
        assert_eq!(result.words, vec!["cat"]);
    }

    #[test]
    fn no_match_is_empty_not_error() {
        let snap = snapshot(&["cat", "dog"]);
        assert!(filter(&snap, &FilterCriteria::new().contains("z")).words.is_empty());
    }

    #[test]
    fn parallel_scan_preserves_order() {
        let words: Vec<String> = (0..PARALLEL_THRESHOLD + 10)
            .map(|i| {
                let mut w = String::new();
                let mut n = i;
                loop {
                    w.push((b'a' + (n % 26) as u8) as char);
                    n /= 26;
                    if n == 0 {
                        break;
                    }
                }
                w
            })
            .collect();
        let snap = Snapshot::from_words(words.clone(), 1);
        let criteria = FilterCriteria::new().starts_with("b");

        let expected: Vec<String> = words.into_iter().filter(|w| w.starts_with('b')).collect();
        let result = filter(&snap, &criteria);
        assert_eq!(result.total_matches, expected.len());
        assert_eq!(result.words, expected);
    }
}
