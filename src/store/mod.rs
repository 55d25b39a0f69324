//! Word Store: the authoritative word set and its durable backing
//!
//! Each running instance keeps an in-memory mirror of the durable document.
//! Reads go to an immutable [`Snapshot`] and never block on writers.
//! Mutations are serialized per instance by a writer lock. Under that lock a
//! write re-reads the durable document, applies only its own change to it,
//! persists the result and then publishes it as the new mirror. A failed
//! write leaves the mirror exactly at the last confirmed state.
//!
//! Replicas sharing one backend converge on their next [`WordStore::load`];
//! a write from a stale replica never drops words committed elsewhere.

mod backend;
mod file;
mod memory;
mod object;
mod retry;
mod snapshot;

pub use backend::{
    StorageBackend, StorageError, StorageErrorCode, StorageInfo, parse_document, render_document,
};
pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use object::ObjectStoreBackend;
pub use retry::RetryPolicy;
pub use snapshot::{CollectionStats, Snapshot};

use crate::core::{Word, normalize};
use crate::error::{Result, ServiceError};
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;
use tokio::sync::Mutex;

/// Per-word result of a removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoveOutcome {
    Removed,
    NotFound,
}

/// Result of adding many words in one durable write
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchAddReport {
    pub added: Vec<String>,
    /// Already present (or repeated within the batch)
    pub skipped: Vec<String>,
    /// Failed local format checks, with the reason
    pub rejected: Vec<(String, String)>,
}

/// Where a backup was written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupReport {
    pub location: String,
    pub word_count: usize,
    pub timestamp: String,
}

pub struct WordStore {
    backend: Arc<dyn StorageBackend>,
    snapshot: RwLock<Arc<Snapshot>>,
    writer: Mutex<()>,
    degraded: AtomicBool,
    min_word_length: usize,
    retry: RetryPolicy,
}

impl WordStore {
    /// Create an empty store over `backend`; call [`WordStore::load`] to fill it
    pub fn new(backend: Arc<dyn StorageBackend>, min_word_length: usize) -> Self {
        Self {
            backend,
            snapshot: RwLock::new(Arc::new(Snapshot::default())),
            writer: Mutex::new(()),
            degraded: AtomicBool::new(false),
            min_word_length: min_word_length.max(1),
            retry: RetryPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub const fn min_word_length(&self) -> usize {
        self.min_word_length
    }

    /// Current mirror; cheap to clone and safe to hold across awaits
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn publish(&self, next: Snapshot) {
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(next);
    }

    /// True after a failed reload, until the next successful one
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn info(&self) -> StorageInfo {
        self.backend.info()
    }

    /// Check that the durable backing is reachable
    ///
    /// # Errors
    /// Returns the backend's error when the probe fails.
    pub async fn probe(&self) -> std::result::Result<(), StorageError> {
        self.backend.probe().await
    }

    /// Read the durable document, dropping malformed entries
    ///
    /// `Ok(None)` when the document does not exist yet.
    async fn read_durable(&self) -> std::result::Result<Option<Vec<String>>, StorageError> {
        let Some(content) = self.backend.get().await? else {
            return Ok(None);
        };
        let parsed = parse_document(&content);
        let total = parsed.len();
        let valid: Vec<String> = parsed
            .into_iter()
            .filter_map(|w| Word::new(&w).ok().map(Word::into_string))
            .collect();
        if valid.len() < total {
            tracing::warn!(dropped = total - valid.len(), "skipped malformed entries");
        }
        Ok(Some(valid))
    }

    /// Replace the mirror with the full durable contents
    ///
    /// On failure the previous mirror keeps serving reads and the store is
    /// flagged degraded. Entries that are not alphabetic are dropped with a
    /// warning; a missing document is created empty.
    ///
    /// # Errors
    /// Returns `StorageUnavailable` if the backend cannot be read.
    pub async fn load(&self) -> Result<usize> {
        let _guard = self.writer.lock().await;
        let started = Instant::now();

        let words = match self.read_durable().await {
            Ok(Some(words)) => words,
            Ok(None) => {
                tracing::warn!(location = %self.info().location, "word document missing, creating empty");
                if let Err(e) = self.backend.put("").await {
                    tracing::warn!(error = %e, "could not create empty word document");
                }
                Vec::new()
            }
            Err(e) => {
                self.degraded.store(true, Ordering::SeqCst);
                tracing::warn!(
                    error = %e,
                    stale_words = self.snapshot().len(),
                    "reload failed, serving stale mirror"
                );
                return Err(ServiceError::StorageUnavailable(e));
            }
        };

        let count = words.len();
        let version = self.snapshot().version() + 1;
        self.publish(Snapshot::from_words(words, version));
        self.degraded.store(false, Ordering::SeqCst);
        tracing::info!(
            count,
            location = %self.info().location,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "loaded words"
        );
        Ok(count)
    }

    /// Current durable contents as the base for a write
    ///
    /// Must be called with the writer lock held. Writes fail closed when the
    /// document cannot be read.
    async fn durable_base(&self) -> Result<Snapshot> {
        let words = match self.read_durable().await {
            Ok(words) => words.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "cannot read durable collection, write refused");
                return Err(ServiceError::StorageUnavailable(e));
            }
        };
        self.degraded.store(false, Ordering::SeqCst);
        Ok(Snapshot::from_words(words, self.snapshot().version() + 1))
    }

    /// Case-insensitive membership against the mirror
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.snapshot().contains(&normalize(word))
    }

    #[must_use]
    pub fn stats(&self) -> CollectionStats {
        self.snapshot().stats()
    }

    async fn persist(&self, snapshot: &Snapshot) -> std::result::Result<(), StorageError> {
        let document = render_document(snapshot.words().iter().map(String::as_str));
        let attempts = self.retry.max_attempts.max(1);
        let started = Instant::now();
        let mut attempt = 1;
        loop {
            match self.backend.put(&document).await {
                Ok(()) => {
                    tracing::debug!(
                        attempt,
                        words = snapshot.len(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "persisted collection"
                    );
                    return Ok(());
                }
                Err(e) if attempt < attempts => {
                    let delay = self.retry.delay_for_attempt(attempt);
                    tracing::warn!(attempt, error = %e, ?delay, "durable write failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Commit `next` durably, then publish it
    async fn commit(&self, next: Snapshot) -> Result<()> {
        if let Err(e) = self.persist(&next).await {
            tracing::warn!(error = %e, "durable write failed, mutation rolled back");
            return Err(ServiceError::PersistenceFailure(e));
        }
        self.publish(next);
        Ok(())
    }

    /// Insert one word; returns whether it was newly added
    ///
    /// # Errors
    /// `InvalidWord` for local format failures (non-letters, below the
    /// minimum length), `StorageUnavailable` if the durable document cannot
    /// be read and `PersistenceFailure` if the durable write fails.
    pub async fn add(&self, raw: &str) -> Result<bool> {
        let word = Word::with_min_length(raw, self.min_word_length)
            .map_err(|e| ServiceError::invalid_word(raw, &e))?;

        let _guard = self.writer.lock().await;
        let base = self.durable_base().await?;
        if base.contains(word.text()) {
            self.publish(base);
            return Ok(false);
        }

        let total = base.len() + 1;
        self.commit(base.with_added(&[word.text().to_string()]))
            .await?;
        tracing::info!(word = %word, total, "added word");
        Ok(true)
    }

    /// Insert many words with a single durable write
    ///
    /// Malformed entries are reported, not fatal. If the write fails nothing
    /// from the batch is kept.
    ///
    /// # Errors
    /// `StorageUnavailable` if the durable document cannot be read and
    /// `PersistenceFailure` if the durable write fails.
    pub async fn add_batch<S: AsRef<str>>(&self, raws: &[S]) -> Result<BatchAddReport> {
        let _guard = self.writer.lock().await;
        let current = self.durable_base().await?;

        let mut report = BatchAddReport::default();
        let mut fresh = FxHashSet::default();
        for raw in raws {
            let raw = raw.as_ref();
            match Word::with_min_length(raw, self.min_word_length) {
                Ok(word) => {
                    let text = word.into_string();
                    if current.contains(&text) || !fresh.insert(text.clone()) {
                        report.skipped.push(text);
                    } else {
                        report.added.push(text);
                    }
                }
                Err(e) => report.rejected.push((raw.trim().to_string(), e.to_string())),
            }
        }

        if report.added.is_empty() {
            self.publish(current);
        } else {
            self.commit(current.with_added(&report.added)).await?;
            tracing::info!(
                added = report.added.len(),
                submitted = raws.len(),
                "added words"
            );
        }
        Ok(report)
    }

    /// Remove one word
    ///
    /// # Errors
    /// `PersistenceFailure` if the durable write fails; the word stays.
    pub async fn remove(&self, raw: &str) -> Result<RemoveOutcome> {
        let mut outcomes = self.remove_batch(&[raw]).await?;
        Ok(outcomes.pop().map_or(RemoveOutcome::NotFound, |(_, o)| o))
    }

    /// Remove many words with a single durable write
    ///
    /// Every submitted word gets its own outcome, judged against the durable
    /// document; a miss never fails the batch.
    ///
    /// # Errors
    /// `StorageUnavailable` if the durable document cannot be read and
    /// `PersistenceFailure` if the durable write fails; nothing is removed.
    pub async fn remove_batch<S: AsRef<str>>(
        &self,
        raws: &[S],
    ) -> Result<Vec<(String, RemoveOutcome)>> {
        let _guard = self.writer.lock().await;
        let current = self.durable_base().await?;

        let mut doomed = FxHashSet::default();
        let outcomes: Vec<(String, RemoveOutcome)> = raws
            .iter()
            .map(|raw| {
                let word = normalize(raw.as_ref());
                let outcome = if current.contains(&word) && doomed.insert(word.clone()) {
                    RemoveOutcome::Removed
                } else {
                    RemoveOutcome::NotFound
                };
                (word, outcome)
            })
            .collect();

        if doomed.is_empty() {
            self.publish(current);
        } else {
            self.commit(current.without(&doomed)).await?;
            tracing::info!(
                removed = doomed.len(),
                submitted = raws.len(),
                "removed words"
            );
        }
        Ok(outcomes)
    }

    /// Write a timestamped copy of the current mirror
    ///
    /// # Errors
    /// `PersistenceFailure` if the backup write fails.
    pub async fn backup(&self) -> Result<BackupReport> {
        let snapshot = self.snapshot();
        let timestamp = chrono::Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
        let document = render_document(snapshot.words().iter().map(String::as_str));
        let location = self
            .backend
            .put_backup(&timestamp, &document)
            .await
            .map_err(ServiceError::PersistenceFailure)?;
        tracing::info!(location = %location, count = snapshot.len(), "backup written");
        Ok(BackupReport {
            location,
            word_count: snapshot.len(),
            timestamp,
        })
    }
}
