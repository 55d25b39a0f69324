//! Collection Maintainer: whole-store validation, cleanup and screening
//!
//! Long runs are driven batch by batch through [`CollectionScan`] with a
//! pause between batches. Every run takes a [`CancellationToken`]; a
//! cancelled run stops at the next batch boundary (or mid-batch, dropping
//! that batch) and never mutates the store.

mod scan;
mod screen;

pub use scan::{CollectionScan, FlaggedWord, ScanProgress, ValidationSummary};
pub use screen::{EXCLUDED_FORMS, ScreenFinding, ScreenReason, form_flag, surface_flag};

use crate::core::normalize;
use crate::error::{Result, ServiceError};
use crate::store::{RemoveOutcome, WordStore};
use crate::validation::{AcceptancePolicy, ValidationCache};
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub struct MaintenanceOptions {
    pub batch_size: usize,
    pub batch_pause: Duration,
    pub policy: AcceptancePolicy,
}

impl Default for MaintenanceOptions {
    fn default() -> Self {
        Self {
            batch_size: 20,
            batch_pause: Duration::from_millis(500),
            policy: AcceptancePolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanupReport {
    pub auto_remove: bool,
    pub summary: ValidationSummary,
    /// Definitively invalid words found
    pub found_invalid: usize,
    pub removed: Vec<String>,
    pub removed_count: usize,
    /// Left in place because the dictionary could not be consulted
    pub skipped_unavailable: usize,
    pub total_before: usize,
    pub total_after: usize,
}

pub struct CollectionMaintainer {
    store: Arc<WordStore>,
    cache: Arc<ValidationCache>,
    options: MaintenanceOptions,
}

impl CollectionMaintainer {
    #[must_use]
    pub fn new(
        store: Arc<WordStore>,
        cache: Arc<ValidationCache>,
        options: MaintenanceOptions,
    ) -> Self {
        Self {
            store,
            cache,
            options,
        }
    }

    /// Fresh scan over the current mirror
    #[must_use]
    pub fn scan(&self) -> CollectionScan {
        CollectionScan::new(self.store.snapshot(), self.options.batch_size)
    }

    /// Drive `scan` to completion or cancellation
    ///
    /// `on_progress` is called after every batch.
    pub async fn run_scan<F>(
        &self,
        scan: &mut CollectionScan,
        cancel: &CancellationToken,
        mut on_progress: F,
    ) -> ValidationSummary
    where
        F: FnMut(&ScanProgress) + Send,
    {
        let policy = self.options.policy;
        while !scan.is_finished() {
            let started = Instant::now();
            let progress = tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                p = scan.step(&self.cache, &policy) => p,
            };
            let Some(progress) = progress else { break };
            tracing::info!(
                batch = progress.batch,
                total_batches = progress.total_batches,
                processed = progress.processed,
                invalid = progress.invalid,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "validated batch"
            );
            on_progress(&progress);

            if !scan.is_finished() && !self.options.batch_pause.is_zero() {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    () = tokio::time::sleep(self.options.batch_pause) => {}
                }
            }
        }

        let summary = scan.summary();
        if !summary.complete {
            tracing::warn!(
                processed = summary.processed,
                total = summary.total_words,
                "collection validation cancelled"
            );
        }
        summary
    }

    /// Validate every word in the store
    ///
    /// A cancelled run returns the partial summary with `complete == false`.
    #[tracing::instrument(skip_all)]
    pub async fn validate_collection<F>(
        &self,
        cancel: &CancellationToken,
        on_progress: F,
    ) -> ValidationSummary
    where
        F: FnMut(&ScanProgress) + Send,
    {
        let started = Instant::now();
        let mut scan = self.scan();
        tracing::info!(total = scan.progress().total, "validating collection");
        let summary = self.run_scan(&mut scan, cancel, on_progress).await;
        tracing::info!(
            processed = summary.processed,
            valid = summary.valid_count,
            invalid = summary.invalid_count,
            unavailable = summary.unavailable_count,
            validity_percentage = summary.validity_percentage,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "collection validated"
        );
        summary
    }

    /// Validate the collection and optionally remove invalid words
    ///
    /// The store is reloaded first. With `auto_remove` a failed reload is
    /// fatal; a dry run carries on against the stale mirror. Words whose
    /// lookup was unavailable are never removed.
    ///
    /// # Errors
    /// - `StorageUnavailable` if the reload fails and `auto_remove` is set
    /// - `Cancelled` if an `auto_remove` run is cancelled; nothing is removed
    /// - `PersistenceFailure` if the removal write fails
    #[tracing::instrument(skip(self, cancel, on_progress))]
    pub async fn cleanup<F>(
        &self,
        auto_remove: bool,
        cancel: &CancellationToken,
        on_progress: F,
    ) -> Result<CleanupReport>
    where
        F: FnMut(&ScanProgress) + Send,
    {
        let started = Instant::now();
        if let Err(e) = self.store.load().await {
            if auto_remove {
                return Err(e);
            }
            tracing::warn!(error = %e, "cleanup dry run on stale collection");
        }

        let total_before = self.store.snapshot().len();
        let summary = self.validate_collection(cancel, on_progress).await;

        let mut report = CleanupReport {
            auto_remove,
            found_invalid: summary.invalid_count,
            removed: Vec::new(),
            removed_count: 0,
            skipped_unavailable: summary.unavailable_count,
            total_before,
            total_after: total_before,
            summary,
        };

        if !auto_remove {
            tracing::info!(
                found = report.found_invalid,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "cleanup dry run finished"
            );
            return Ok(report);
        }
        if !report.summary.complete {
            return Err(ServiceError::Cancelled);
        }
        if report.summary.invalid_words.is_empty() {
            tracing::info!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                "cleanup found nothing to remove"
            );
            return Ok(report);
        }

        let doomed: Vec<&str> = report
            .summary
            .invalid_words
            .iter()
            .map(|f| f.word.as_str())
            .collect();
        let outcomes = self.store.remove_batch(doomed.as_slice()).await?;
        report.removed = outcomes
            .into_iter()
            .filter(|(_, o)| *o == RemoveOutcome::Removed)
            .map(|(w, _)| w)
            .collect();
        report.removed_count = report.removed.len();
        report.total_after = self.store.snapshot().len();
        tracing::info!(
            found = report.found_invalid,
            removed = report.removed_count,
            skipped_unavailable = report.skipped_unavailable,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "cleanup removed invalid words"
        );
        Ok(report)
    }

    /// Screen words for puzzle suitability
    ///
    /// Surface checks run locally; the remaining words are looked up in
    /// batches and judged by their dictionary forms.
    ///
    /// # Errors
    /// `Cancelled` if the token fires before the screen completes.
    pub async fn screen<S: AsRef<str>>(
        &self,
        words: &[S],
        cancel: &CancellationToken,
    ) -> Result<Vec<ScreenFinding>> {
        let started = Instant::now();
        let mut findings = Vec::new();
        let mut pending = Vec::new();
        for raw in words {
            let word = normalize(raw.as_ref());
            match surface_flag(&word) {
                Some(reason) => findings.push(ScreenFinding { word, reason }),
                None => pending.push(word),
            }
        }

        for chunk in pending.chunks(self.options.batch_size.max(1)) {
            let records = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(ServiceError::Cancelled),
                r = join_all(chunk.iter().map(|w| self.cache.validate(w))) => r,
            };
            findings.extend(records.iter().filter_map(|record| {
                form_flag(record).map(|reason| ScreenFinding {
                    word: record.word.clone(),
                    reason,
                })
            }));
        }
        tracing::info!(
            screened = words.len(),
            flagged = findings.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "screened words"
        );
        Ok(findings)
    }
}
