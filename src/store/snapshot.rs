//! Immutable, versioned view of the word set
//!
//! Readers clone an `Arc<Snapshot>` and work on it without holding any lock;
//! writers build a new snapshot and swap it in. Words keep insertion order,
//! and a length index backs pattern queries.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

#[derive(Debug, Default)]
pub struct Snapshot {
    words: Vec<String>,
    index: FxHashSet<String>,
    by_length: FxHashMap<usize, Vec<usize>>,
    version: u64,
}

/// Derived collection statistics
///
/// Length figures are `None` for an empty collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionStats {
    pub total_words: usize,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub avg_length: Option<f64>,
}

impl Snapshot {
    /// Build from entries that are already normalized and unique
    #[must_use]
    pub fn from_words(words: Vec<String>, version: u64) -> Self {
        let index: FxHashSet<String> = words.iter().cloned().collect();
        let mut by_length: FxHashMap<usize, Vec<usize>> = FxHashMap::default();
        for (i, w) in words.iter().enumerate() {
            by_length.entry(w.len()).or_default().push(i);
        }
        Self {
            words,
            index,
            by_length,
            version,
        }
    }

    #[inline]
    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Monotonic per-instance version, bumped on every committed change
    #[inline]
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Membership test on a normalized word
    #[inline]
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.index.contains(word)
    }

    /// Words of exactly `length` letters, in insertion order
    pub fn of_length(&self, length: usize) -> impl Iterator<Item = &str> {
        self.by_length
            .get(&length)
            .into_iter()
            .flatten()
            .map(|&i| self.words[i].as_str())
    }

    /// Count of words with exactly `length` letters
    #[must_use]
    pub fn count_of_length(&self, length: usize) -> usize {
        self.by_length.get(&length).map_or(0, Vec::len)
    }

    #[must_use]
    pub fn stats(&self) -> CollectionStats {
        let total_words = self.words.len();
        if total_words == 0 {
            return CollectionStats {
                total_words,
                min_length: None,
                max_length: None,
                avg_length: None,
            };
        }
        let total_letters: usize = self.words.iter().map(String::len).sum();
        CollectionStats {
            total_words,
            min_length: self.by_length.keys().min().copied(),
            max_length: self.by_length.keys().max().copied(),
            avg_length: Some(total_letters as f64 / total_words as f64),
        }
    }

    /// New snapshot with `additions` appended (callers pass only new words)
    #[must_use]
    pub(crate) fn with_added(&self, additions: &[String]) -> Self {
        let mut words = self.words.clone();
        words.extend(additions.iter().cloned());
        Self::from_words(words, self.version + 1)
    }

    /// New snapshot without the given words, preserving order of the rest
    #[must_use]
    pub(crate) fn without(&self, removed: &FxHashSet<String>) -> Self {
        let words = self
            .words
            .iter()
            .filter(|w| !removed.contains(*w))
            .cloned()
            .collect();
        Self::from_words(words, self.version + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(words: &[&str]) -> Snapshot {
        Snapshot::from_words(words.iter().map(|w| (*w).to_string()).collect(), 1)
    }

    #[test]
    fn length_index_preserves_order() {
        let snap = snapshot(&["dog", "crane", "cat", "owl"]);
        let three: Vec<&str> = snap.of_length(3).collect();
        assert_eq!(three, vec!["dog", "cat", "owl"]);
        assert_eq!(snap.count_of_length(5), 1);
        assert_eq!(snap.of_length(7).count(), 0);
    }

    #[test]
    fn stats_over_words() {
        let stats = snapshot(&["cat", "crane", "at"]).stats();
        assert_eq!(stats.total_words, 3);
        assert_eq!(stats.min_length, Some(2));
        assert_eq!(stats.max_length, Some(5));
        let avg = stats.avg_length.unwrap();
        assert!((avg - 10.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn stats_empty_collection() {
        let stats = Snapshot::default().stats();
        assert_eq!(stats.total_words, 0);
        assert_eq!(stats.min_length, None);
        assert_eq!(stats.max_length, None);
        assert_eq!(stats.avg_length, None);
    }

    #[test]
    fn with_added_bumps_version() {
        let snap = snapshot(&["cat"]);
        let next = snap.with_added(&["dog".to_string()]);
        assert_eq!(next.version(), 2);
        assert!(next.contains("dog"));
        assert_eq!(next.words(), &["cat", "dog"]);
        assert!(!snap.contains("dog"));
    }

    #[test]
    fn without_keeps_remaining_order() {
        let snap = snapshot(&["cat", "dog", "owl"]);
        let removed: FxHashSet<String> = std::iter::once("dog".to_string()).collect();
        let next = snap.without(&removed);
        assert_eq!(next.words(), &["cat", "owl"]);
        assert!(!next.contains("dog"));
        assert_eq!(next.of_length(3).collect::<Vec<_>>(), vec!["cat", "owl"]);
    }
}
