//! In-process backend
//!
//! Useful for ephemeral runs and as a shared "durable" store between
//! several `WordStore` replicas in tests. Failures can be injected per
//! direction.

use super::backend::{StorageBackend, StorageError, StorageErrorCode, StorageInfo};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

#[derive(Default)]
pub struct MemoryBackend {
    document: Mutex<Option<String>>,
    backups: Mutex<Vec<(String, String)>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing document
    #[must_use]
    pub fn with_document(document: impl Into<String>) -> Self {
        Self {
            document: Mutex::new(Some(document.into())),
            ..Self::default()
        }
    }

    /// Seed from a word list
    #[must_use]
    pub fn with_words(words: &[&str]) -> Self {
        Self::with_document(words.join("\n"))
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful `put` calls
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn document(&self) -> Option<String> {
        self.document
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn backups(&self) -> Vec<(String, String)> {
        self.backups
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn check(flag: &AtomicBool, what: &str) -> Result<(), StorageError> {
        if flag.load(Ordering::SeqCst) {
            Err(StorageError::new(
                StorageErrorCode::Injected,
                format!("{what} disabled"),
            ))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    fn info(&self) -> StorageInfo {
        StorageInfo {
            provider: "memory",
            kind: "memory",
            location: "in-process".to_string(),
        }
    }

    async fn get(&self) -> Result<Option<String>, StorageError> {
        Self::check(&self.fail_reads, "reads")?;
        Ok(self.document())
    }

    async fn put(&self, document: &str) -> Result<(), StorageError> {
        Self::check(&self.fail_writes, "writes")?;
        *self.document.lock().unwrap_or_else(PoisonError::into_inner) = Some(document.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn put_backup(&self, stamp: &str, document: &str) -> Result<String, StorageError> {
        Self::check(&self.fail_writes, "writes")?;
        let location = format!("memory://backup/{stamp}");
        self.backups
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((location.clone(), document.to_string()));
        Ok(location)
    }

    async fn probe(&self) -> Result<(), StorageError> {
        Self::check(&self.fail_reads, "reads")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn injected_failures() {
        let backend = MemoryBackend::with_words(&["cat"]);
        backend.set_fail_reads(true);
        assert!(backend.get().await.is_err());
        assert!(backend.probe().await.is_err());

        backend.set_fail_reads(false);
        backend.set_fail_writes(true);
        assert!(backend.put("dog").await.is_err());
        assert_eq!(backend.write_count(), 0);
        assert_eq!(backend.document().as_deref(), Some("cat"));
    }

    #[tokio::test]
    async fn writes_are_counted() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.get().await.unwrap(), None);
        backend.put("cat\n").await.unwrap();
        backend.put("cat\ndog\n").await.unwrap();
        assert_eq!(backend.write_count(), 2);
        assert_eq!(backend.get().await.unwrap().as_deref(), Some("cat\ndog\n"));
    }
}
