//! The operation surface consumed by front ends
//!
//! [`WordService`] wires the store, the query engines, the validation
//! cache and the maintainer together. It holds no global state; every
//! collaborator is passed in, so several services (replicas) can share one
//! backend.

use crate::core::{FilterCriteria, MAX_WORD_LENGTH, PatternError, Word};
use crate::error::{Result, ServiceError};
use crate::maintenance::{
    CleanupReport, CollectionMaintainer, MaintenanceOptions, ScanProgress, ScreenFinding,
    ValidationSummary,
};
use crate::query::{self, FilterResult};
use crate::store::{
    BackupReport, BatchAddReport, CollectionStats, RemoveOutcome, StorageInfo, WordStore,
};
use crate::validation::{AcceptancePolicy, CacheStats, Decision, ValidationCache, ValidationRecord};
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddOutcome {
    pub success: bool,
    pub was_new: bool,
    pub word: String,
    /// Present when the word went through dictionary validation
    pub validation: Option<ValidationRecord>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoveReport {
    pub outcomes: Vec<(String, RemoveOutcome)>,
    pub removed_count: usize,
    pub not_found_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordPage {
    pub words: Vec<String>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub total_words: usize,
    pub degraded: bool,
    pub snapshot_version: u64,
    pub storage: StorageInfo,
    pub storage_reachable: bool,
    pub storage_error: Option<String>,
    pub dictionary: String,
}

pub struct WordService {
    store: Arc<WordStore>,
    cache: Arc<ValidationCache>,
    maintainer: CollectionMaintainer,
    policy: AcceptancePolicy,
}

impl WordService {
    #[must_use]
    pub fn new(
        store: Arc<WordStore>,
        cache: Arc<ValidationCache>,
        options: MaintenanceOptions,
    ) -> Self {
        let policy = options.policy;
        Self {
            maintainer: CollectionMaintainer::new(store.clone(), cache.clone(), options),
            store,
            cache,
            policy,
        }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<WordStore> {
        &self.store
    }

    #[must_use]
    pub const fn maintainer(&self) -> &CollectionMaintainer {
        &self.maintainer
    }

    // Reads

    #[must_use]
    pub fn filter(&self, criteria: &FilterCriteria) -> FilterResult {
        query::filter(&self.store.snapshot(), criteria)
    }

    #[must_use]
    pub fn stats(&self) -> CollectionStats {
        self.store.stats()
    }

    /// Wildcard search over words of exactly `length` letters
    ///
    /// # Errors
    /// `InvalidPattern` when the pattern is malformed or its length differs
    /// from `length`.
    pub fn interactive(&self, length: usize, pattern: &str) -> Result<Vec<String>> {
        Ok(query::match_pattern(&self.store.snapshot(), length, pattern)?)
    }

    #[must_use]
    pub fn check(&self, word: &str) -> bool {
        self.store.contains(word)
    }

    /// # Errors
    /// `InvalidPattern` when `length` is outside `1..=50`.
    pub fn by_length(&self, length: usize) -> Result<Vec<String>> {
        if length == 0 || length > MAX_WORD_LENGTH {
            return Err(PatternError::InvalidLength(length).into());
        }
        Ok(query::words_of_length(&self.store.snapshot(), length))
    }

    /// First `limit` words in store order, plus the collection size
    #[must_use]
    pub fn all(&self, limit: Option<usize>) -> WordPage {
        let snapshot = self.store.snapshot();
        let words = snapshot.words();
        let end = limit.map_or(words.len(), |l| l.min(words.len()));
        WordPage {
            words: words[..end].to_vec(),
            total: words.len(),
        }
    }

    // Validation

    pub async fn validate(&self, word: &str) -> ValidationRecord {
        self.cache.validate(word).await
    }

    pub async fn invalidate(&self, word: &str) -> bool {
        self.cache.invalidate(word).await
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    // Mutations

    /// Add one word, validating it against the dictionary unless skipped
    ///
    /// A dictionary rejection is reported as `success == false` with the
    /// validation record attached. Words already present are reported
    /// without a lookup.
    ///
    /// # Errors
    /// - `InvalidWord` for local format failures
    /// - `ExternalServiceUnavailable` if the dictionary could not be consulted
    /// - `PersistenceFailure` if the durable write fails
    pub async fn add(&self, raw: &str, skip_validation: bool) -> Result<AddOutcome> {
        let word = Word::with_min_length(raw, self.store.min_word_length())
            .map_err(|e| ServiceError::invalid_word(raw, &e))?
            .into_string();

        if skip_validation {
            let was_new = self.store.add(&word).await?;
            return Ok(added(word, was_new, None));
        }

        if self.store.contains(&word) {
            return Ok(added(word, false, None));
        }

        let record = self.cache.validate(&word).await;
        match self.policy.evaluate(&record) {
            Decision::Accept => {
                let was_new = self.store.add(&word).await?;
                Ok(added(word, was_new, Some(record)))
            }
            Decision::Reject(reason) => {
                tracing::info!(word = %word, reason = %reason, "word rejected by validation");
                Ok(AddOutcome {
                    success: false,
                    was_new: false,
                    message: format!("'{word}' was not added: {reason}"),
                    word,
                    validation: Some(record),
                })
            }
            Decision::Unverified(reason) => Err(ServiceError::ExternalServiceUnavailable(reason)),
        }
    }

    /// Add many words without dictionary validation
    ///
    /// # Errors
    /// `StorageUnavailable` if the durable document cannot be read and
    /// `PersistenceFailure` if the durable write fails; nothing is added.
    pub async fn add_batch<S: AsRef<str>>(&self, words: &[S]) -> Result<BatchAddReport> {
        self.store.add_batch(words).await
    }

    /// # Errors
    /// `PersistenceFailure` if the durable write fails.
    pub async fn remove(&self, word: &str) -> Result<RemoveOutcome> {
        self.store.remove(word).await
    }

    /// # Errors
    /// `PersistenceFailure` if the durable write fails; nothing is removed.
    pub async fn remove_batch<S: AsRef<str>>(&self, words: &[S]) -> Result<RemoveReport> {
        let outcomes = self.store.remove_batch(words).await?;
        let removed_count = outcomes
            .iter()
            .filter(|(_, o)| *o == RemoveOutcome::Removed)
            .count();
        Ok(RemoveReport {
            not_found_count: outcomes.len() - removed_count,
            removed_count,
            outcomes,
        })
    }

    // Maintenance

    pub async fn validate_collection<F>(
        &self,
        cancel: &CancellationToken,
        on_progress: F,
    ) -> ValidationSummary
    where
        F: FnMut(&ScanProgress) + Send,
    {
        self.maintainer.validate_collection(cancel, on_progress).await
    }

    /// # Errors
    /// See [`CollectionMaintainer::cleanup`].
    pub async fn cleanup<F>(
        &self,
        auto_remove: bool,
        cancel: &CancellationToken,
        on_progress: F,
    ) -> Result<CleanupReport>
    where
        F: FnMut(&ScanProgress) + Send,
    {
        self.maintainer
            .cleanup(auto_remove, cancel, on_progress)
            .await
    }

    /// Screen `words`, or the whole collection when `None`
    ///
    /// # Errors
    /// `Cancelled` if the token fires first.
    pub async fn screen(
        &self,
        words: Option<&[String]>,
        cancel: &CancellationToken,
    ) -> Result<Vec<ScreenFinding>> {
        match words {
            Some(words) => self.maintainer.screen(words, cancel).await,
            None => {
                let snapshot = self.store.snapshot();
                self.maintainer.screen(snapshot.words(), cancel).await
            }
        }
    }

    // Administration

    /// # Errors
    /// `StorageUnavailable` if the backend cannot be read; the previous
    /// collection keeps serving.
    pub async fn reload(&self) -> Result<usize> {
        self.store.load().await
    }

    /// # Errors
    /// `PersistenceFailure` if the backup cannot be written.
    pub async fn backup(&self) -> Result<BackupReport> {
        self.store.backup().await
    }

    pub async fn health(&self) -> HealthReport {
        let snapshot = self.store.snapshot();
        let probe = self.store.probe().await;
        HealthReport {
            total_words: snapshot.len(),
            degraded: self.store.is_degraded(),
            snapshot_version: snapshot.version(),
            storage: self.store.info(),
            storage_reachable: probe.is_ok(),
            storage_error: probe.err().map(|e| e.to_string()),
            dictionary: self.cache.source_name().to_string(),
        }
    }
}

fn added(word: String, was_new: bool, validation: Option<ValidationRecord>) -> AddOutcome {
    let message = if was_new {
        format!("Added '{word}'")
    } else {
        format!("'{word}' already exists")
    };
    AddOutcome {
        success: true,
        was_new,
        word,
        validation,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryBackend;
    use crate::validation::{CacheOptions, ScriptedSource, SourceError};
    use std::time::Duration;

    async fn service(words: &[&str], source: ScriptedSource) -> (Arc<ScriptedSource>, WordService) {
        let backend = Arc::new(MemoryBackend::with_words(words));
        let store = Arc::new(WordStore::new(backend, 2));
        store.load().await.unwrap();
        let source = Arc::new(source);
        let cache = Arc::new(ValidationCache::new(
            source.clone(),
            CacheOptions {
                min_interval: Duration::ZERO,
                ..CacheOptions::default()
            },
        ));
        let options = MaintenanceOptions {
            batch_pause: Duration::ZERO,
            ..MaintenanceOptions::default()
        };
        (source, WordService::new(store, cache, options))
    }

    #[tokio::test]
    async fn add_validated_word() {
        let (_, svc) = service(&["cat", "dog"], ScriptedSource::new().with_word("owl", &["a bird"])).await;
        let outcome = svc.add("owl", false).await.unwrap();
        assert!(outcome.success && outcome.was_new);
        assert!(outcome.validation.unwrap().is_valid());
        assert_eq!(svc.stats().total_words, 3);
    }

    #[tokio::test]
    async fn existing_word_skips_lookup() {
        let (source, svc) = service(&["cat"], ScriptedSource::new()).await;
        let outcome = svc.add("CAT", false).await.unwrap();
        assert!(outcome.success);
        assert!(!outcome.was_new);
        assert_eq!(source.call_count(), 0);
    }

    #[tokio::test]
    async fn rejected_word_is_not_added() {
        let (_, svc) = service(&["cat"], ScriptedSource::new().with_word("ox", &["a bovine"])).await;

        let unknown = svc.add("qzxv", false).await.unwrap();
        assert!(!unknown.success);
        assert!(unknown.validation.is_some());

        // Real word, but below the validation length floor
        let short = svc.add("ox", false).await.unwrap();
        assert!(!short.success);
        assert_eq!(svc.stats().total_words, 1);
    }

    #[tokio::test]
    async fn outage_fails_closed() {
        let (_, svc) = service(&[], ScriptedSource::new().with_error("owl", SourceError::Timeout)).await;
        assert!(matches!(
            svc.add("owl", false).await,
            Err(ServiceError::ExternalServiceUnavailable(_))
        ));
        assert!(!svc.check("owl"));
    }

    #[tokio::test]
    async fn skip_validation_adds_directly() {
        let (source, svc) = service(&[], ScriptedSource::new()).await;
        let outcome = svc.add("zyxt", true).await.unwrap();
        assert!(outcome.was_new);
        assert!(outcome.validation.is_none());
        assert_eq!(source.call_count(), 0);
    }

    #[tokio::test]
    async fn malformed_add_is_invalid_word() {
        let (_, svc) = service(&[], ScriptedSource::new()).await;
        assert!(matches!(
            svc.add("c4t", true).await,
            Err(ServiceError::InvalidWord { .. })
        ));
    }

    #[tokio::test]
    async fn remove_batch_counts() {
        let (_, svc) = service(&["cat", "dog"], ScriptedSource::new()).await;
        let report = svc.remove_batch(&["cat", "emu"]).await.unwrap();
        assert_eq!(report.removed_count, 1);
        assert_eq!(report.not_found_count, 1);
    }

    #[tokio::test]
    async fn by_length_bounds() {
        let (_, svc) = service(&["cat", "crane"], ScriptedSource::new()).await;
        assert_eq!(svc.by_length(5).unwrap(), vec!["crane"]);
        assert!(matches!(svc.by_length(0), Err(ServiceError::InvalidPattern(_))));
        assert!(matches!(svc.by_length(51), Err(ServiceError::InvalidPattern(_))));
    }

    #[tokio::test]
    async fn all_pages() {
        let (_, svc) = service(&["cat", "dog", "owl"], ScriptedSource::new()).await;
        let page = svc.all(Some(2));
        assert_eq!(page.words, vec!["cat", "dog"]);
        assert_eq!(page.total, 3);
        assert_eq!(svc.all(None).words.len(), 3);
    }

    #[tokio::test]
    async fn health_reports_backend() {
        let (_, svc) = service(&["cat"], ScriptedSource::new()).await;
        let health = svc.health().await;
        assert_eq!(health.total_words, 1);
        assert!(!health.degraded);
        assert!(health.storage_reachable);
        assert_eq!(health.storage.provider, "memory");
        assert_eq!(health.dictionary, "scripted");
    }

    #[tokio::test]
    async fn invalidate_refetches() {
        let (source, svc) = service(&[], ScriptedSource::new().with_word("owl", &["a bird"])).await;
        svc.validate("owl").await;
        assert!(svc.invalidate("owl").await);
        svc.validate("owl").await;
        assert_eq!(source.call_count(), 2);
        assert_eq!(svc.cache_stats().await.misses, 2);
    }

    #[tokio::test]
    async fn screen_whole_collection() {
        let (_, svc) = service(&["ox", "owl"], ScriptedSource::new().with_word("owl", &["a bird"])).await;
        let findings = svc.screen(None, &CancellationToken::new()).await.unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].word, "ox");
    }
}
