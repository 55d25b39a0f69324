//! Resumable batch scan over a collection snapshot
//!
//! A scan owns the snapshot it started from, so concurrent mutations never
//! shift its position. Each [`CollectionScan::step`] validates one batch
//! and folds the outcomes into running totals; the caller decides when to
//! pause, resume or give up.

use crate::store::Snapshot;
use crate::validation::{AcceptancePolicy, Decision, ValidationCache};
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;

/// A word that did not pass, with the reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlaggedWord {
    pub word: String,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScanProgress {
    pub processed: usize,
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub unavailable: usize,
    pub batch: usize,
    pub total_batches: usize,
}

/// Aggregate result of validating the collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationSummary {
    pub total_words: usize,
    pub processed: usize,
    pub valid_count: usize,
    pub invalid_count: usize,
    pub unavailable_count: usize,
    /// Definitively rejected words
    pub invalid_words: Vec<FlaggedWord>,
    /// Words the dictionary could not be asked about
    pub unavailable_words: Vec<FlaggedWord>,
    /// Valid share of processed words, rounded to two decimals
    pub validity_percentage: f64,
    /// False when the scan stopped early
    pub complete: bool,
}

pub struct CollectionScan {
    snapshot: Arc<Snapshot>,
    position: usize,
    batch_size: usize,
    batch: usize,
    valid: usize,
    invalid: Vec<FlaggedWord>,
    unavailable: Vec<FlaggedWord>,
}

impl CollectionScan {
    #[must_use]
    pub fn new(snapshot: Arc<Snapshot>, batch_size: usize) -> Self {
        Self {
            snapshot,
            position: 0,
            batch_size: batch_size.max(1),
            batch: 0,
            valid: 0,
            invalid: Vec::new(),
            unavailable: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.position >= self.snapshot.len()
    }

    #[must_use]
    pub fn progress(&self) -> ScanProgress {
        let total = self.snapshot.len();
        ScanProgress {
            processed: self.position,
            total,
            valid: self.valid,
            invalid: self.invalid.len(),
            unavailable: self.unavailable.len(),
            batch: self.batch,
            total_batches: total.div_ceil(self.batch_size),
        }
    }

    /// Words the next step will validate
    #[must_use]
    pub fn next_batch(&self) -> &[String] {
        let words = self.snapshot.words();
        let end = (self.position + self.batch_size).min(words.len());
        &words[self.position.min(end)..end]
    }

    /// Validate the next batch concurrently
    ///
    /// Returns `None` once every word has been processed. A word whose
    /// lookup fails is recorded as unavailable and the scan moves on.
    pub async fn step(
        &mut self,
        cache: &ValidationCache,
        policy: &AcceptancePolicy,
    ) -> Option<ScanProgress> {
        if self.is_finished() {
            return None;
        }
        let batch = self.next_batch();
        let count = batch.len();
        let records = join_all(batch.iter().map(|w| cache.validate(w))).await;

        for record in records {
            match policy.evaluate(&record) {
                Decision::Accept => self.valid += 1,
                Decision::Reject(reason) => self.invalid.push(FlaggedWord {
                    word: record.word,
                    reason,
                }),
                Decision::Unverified(reason) => self.unavailable.push(FlaggedWord {
                    word: record.word,
                    reason,
                }),
            }
        }
        self.position += count;
        self.batch += 1;
        Some(self.progress())
    }

    /// Totals so far; `complete` reflects whether the scan reached the end
    #[must_use]
    pub fn summary(&self) -> ValidationSummary {
        let processed = self.position;
        let validity_percentage = if processed == 0 {
            0.0
        } else {
            (self.valid as f64 / processed as f64 * 10_000.0).round() / 100.0
        };
        ValidationSummary {
            total_words: self.snapshot.len(),
            processed,
            valid_count: self.valid,
            invalid_count: self.invalid.len(),
            unavailable_count: self.unavailable.len(),
            invalid_words: self.invalid.clone(),
            unavailable_words: self.unavailable.clone(),
            validity_percentage,
            complete: self.is_finished(),
        }
    }
}
