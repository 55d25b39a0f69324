//! Memoized, rate-limited, de-duplicated dictionary lookups
//!
//! Per word the cache moves `uncached -> pending -> cached(...)`. While a
//! lookup is pending, other callers for the same word wait on a per-word
//! slot and take the result straight from it, so one cold word costs at
//! most one external call whatever the TTLs are. Distinct words only share
//! the rate limiter.
//!
//! Definitive outcomes live for `ttl`; "service unavailable" outcomes
//! expire after the much shorter `unavailable_ttl` so an outage heals
//! without manual invalidation.

use super::limiter::RateLimiter;
use super::record::{InvalidReason, UnavailableReason, ValidationRecord, Verdict};
use super::source::{DictionaryEntry, DictionarySource, SourceError};
use crate::core::{Word, normalize};
use lru::LruCache;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Default number of cached records
pub const DEFAULT_CACHE_CAPACITY: usize = 10_000;

/// Default lifetime of a definitive record (7 days)
pub const DEFAULT_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

#[derive(Debug, Clone)]
pub struct CacheOptions {
    pub capacity: usize,
    pub ttl: Duration,
    pub unavailable_ttl: Duration,
    /// Bound on one external lookup
    pub timeout: Duration,
    /// Minimum spacing between external lookups
    pub min_interval: Duration,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_CAPACITY,
            ttl: DEFAULT_TTL,
            unavailable_ttl: Duration::from_secs(60),
            timeout: Duration::from_secs(10),
            min_interval: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    pub external_calls: u64,
    /// Callers that waited on another caller's in-flight lookup
    pub coalesced: u64,
}

struct CachedRecord {
    record: ValidationRecord,
    stored_at: Instant,
}

/// Result slot shared by every caller waiting on one word
type Slot = Arc<Mutex<Option<ValidationRecord>>>;
type InflightMap = std::sync::Mutex<FxHashMap<String, Slot>>;

/// Unregisters a word's slot when its caller finishes or is dropped
struct InflightGuard<'a> {
    map: &'a InflightMap,
    word: &'a str,
    slot: Slot,
}

impl Drop for InflightGuard<'_> {
    fn drop(&mut self) {
        let mut map = self.map.lock().unwrap_or_else(PoisonError::into_inner);
        if map.get(self.word).is_some_and(|s| Arc::ptr_eq(s, &self.slot)) {
            map.remove(self.word);
        }
    }
}

pub struct ValidationCache {
    source: Arc<dyn DictionarySource>,
    limiter: RateLimiter,
    entries: Mutex<LruCache<String, CachedRecord>>,
    inflight: InflightMap,
    options: CacheOptions,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    external_calls: AtomicU64,
    coalesced: AtomicU64,
}

impl ValidationCache {
    #[must_use]
    pub fn new(source: Arc<dyn DictionarySource>, options: CacheOptions) -> Self {
        let capacity = NonZeroUsize::new(options.capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            source,
            limiter: RateLimiter::new(options.min_interval),
            entries: Mutex::new(LruCache::new(capacity)),
            inflight: std::sync::Mutex::new(FxHashMap::default()),
            capacity: capacity.get(),
            options,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            external_calls: AtomicU64::new(0),
            coalesced: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    const fn ttl_for(&self, verdict: Verdict) -> Duration {
        match verdict {
            Verdict::Unavailable(_) => self.options.unavailable_ttl,
            _ => self.options.ttl,
        }
    }

    async fn cached(&self, word: &str) -> Option<ValidationRecord> {
        let mut entries = self.entries.lock().await;
        let expired = match entries.get(word) {
            None => return None,
            Some(entry) => entry.stored_at.elapsed() >= self.ttl_for(entry.record.verdict),
        };
        if expired {
            entries.pop(word);
            return None;
        }
        entries.get(word).map(|e| e.record.clone())
    }

    /// Check one word against the dictionary
    ///
    /// Never fails: transport problems and timeouts come back as records
    /// with an `Unavailable` verdict. Malformed tokens are answered locally
    /// without an external call.
    pub async fn validate(&self, raw: &str) -> ValidationRecord {
        let word = match Word::new(raw) {
            Ok(w) => w.into_string(),
            Err(_) => {
                return ValidationRecord::bare(
                    normalize(raw),
                    Verdict::Invalid(InvalidReason::MalformedWord),
                );
            }
        };

        if let Some(record) = self.cached(&word).await {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(word = %word, "validation cache hit");
            return record;
        }

        let slot = Arc::clone(
            self.inflight
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .entry(word.clone())
                .or_default(),
        );
        let _registered = InflightGuard {
            map: &self.inflight,
            word: &word,
            slot: Arc::clone(&slot),
        };
        let mut pending = slot.lock().await;

        // Whoever held the slot before us may already have the answer.
        if let Some(record) = pending.clone() {
            self.coalesced.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(word = %word, "joined in-flight lookup");
            return record;
        }
        if let Some(record) = self.cached(&word).await {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return record;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(word = %word, "validation cache miss");
        let record = self.fetch(&word).await;

        self.entries.lock().await.put(
            word.clone(),
            CachedRecord {
                record: record.clone(),
                stored_at: Instant::now(),
            },
        );
        *pending = Some(record.clone());
        record
    }

    #[cfg(test)]
    fn inflight_len(&self) -> usize {
        self.inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    async fn fetch(&self, word: &str) -> ValidationRecord {
        self.limiter.acquire().await;
        self.external_calls.fetch_add(1, Ordering::Relaxed);

        let outcome = tokio::time::timeout(self.options.timeout, self.source.lookup(word))
            .await
            .unwrap_or(Err(SourceError::Timeout));

        match outcome {
            Ok(Some(entry)) => record_from_entry(word, entry),
            Ok(None) => ValidationRecord::bare(word, Verdict::Invalid(InvalidReason::NotFound)),
            Err(e) => {
                tracing::warn!(word = %word, error = %e, "dictionary lookup failed");
                let reason = match e {
                    SourceError::Timeout => UnavailableReason::Timeout,
                    SourceError::Transport(_) => UnavailableReason::Transport,
                    SourceError::Status(_) => UnavailableReason::Status,
                    SourceError::Malformed(_) => UnavailableReason::Malformed,
                };
                ValidationRecord::bare(word, Verdict::Unavailable(reason))
            }
        }
    }

    /// Drop the cached record for `word`; returns whether one existed
    pub async fn invalidate(&self, word: &str) -> bool {
        let removed = self.entries.lock().await.pop(&normalize(word)).is_some();
        if removed {
            tracing::info!(word = %normalize(word), "validation cache entry invalidated");
        }
        removed
    }

    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.lock().await.len(),
            capacity: self.capacity,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            external_calls: self.external_calls.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
        }
    }
}

fn record_from_entry(word: &str, entry: DictionaryEntry) -> ValidationRecord {
    let verdict = if entry.definitions.is_empty() {
        Verdict::Invalid(InvalidReason::NoDefinitions)
    } else {
        Verdict::Valid
    };
    ValidationRecord {
        word: word.to_string(),
        verdict,
        definitions: entry.definitions,
        word_forms: entry.word_forms,
        pronunciations: entry.pronunciations,
        examples: entry.examples,
    }
}
