//! Durable storage contract
//!
//! The collection is persisted as one flat, newline-delimited document. A
//! backend only knows how to fetch and overwrite that document (plus write
//! side copies for backups); the set semantics live in [`super::WordStore`].

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageErrorCode {
    Network,
    Status,
    Io,
    Injected,
}

impl StorageErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network_error",
            Self::Status => "status_error",
            Self::Io => "io_error",
            Self::Injected => "injected_failure",
        }
    }
}

impl fmt::Display for StorageErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure talking to the durable backing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct StorageError {
    pub code: StorageErrorCode,
    pub message: String,
}

impl StorageError {
    #[must_use]
    pub fn new(code: StorageErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn io(err: &std::io::Error) -> Self {
        Self::new(StorageErrorCode::Io, err.to_string())
    }
}

/// Description of a configured backend, reported by the health surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageInfo {
    pub provider: &'static str,
    pub kind: &'static str,
    pub location: String,
}

#[async_trait]
pub trait StorageBackend: Send + Sync {
    fn info(&self) -> StorageInfo;

    /// Fetch the full document; `Ok(None)` when it does not exist yet
    async fn get(&self) -> Result<Option<String>, StorageError>;

    /// Overwrite the full document
    async fn put(&self, document: &str) -> Result<(), StorageError>;

    /// Write a side copy tagged with `stamp`; returns where it landed
    async fn put_backup(&self, stamp: &str, document: &str) -> Result<String, StorageError>;

    /// Cheap reachability check
    async fn probe(&self) -> Result<(), StorageError>;
}

/// Split a stored document into normalized, de-duplicated entries
///
/// Blank lines are skipped and first occurrence wins, so a hand-edited file
/// with duplicates or mixed case still yields a valid set.
#[must_use]
pub fn parse_document(content: &str) -> Vec<String> {
    let mut seen = rustc_hash::FxHashSet::default();
    content
        .lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .filter(|w| seen.insert(w.clone()))
        .collect()
}

/// Render entries as a sorted newline-delimited document
#[must_use]
pub fn render_document<'a>(words: impl IntoIterator<Item = &'a str>) -> String {
    let mut sorted: Vec<&str> = words.into_iter().collect();
    sorted.sort_unstable();
    let mut out = sorted.join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}
