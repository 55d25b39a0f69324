//! Service-level error taxonomy

use crate::core::{PatternError, WordError};
use crate::store::StorageError;
use thiserror::Error;

/// Errors surfaced by [`crate::service::WordService`] and its components
///
/// Read paths degrade to stale data instead of returning
/// `StorageUnavailable`; write paths fail closed.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Durable backing could not be reached
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[source] StorageError),

    /// A durable write failed; the in-memory change was rolled back
    #[error("persistence failure: {0}")]
    PersistenceFailure(#[source] StorageError),

    /// Malformed pattern query
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] PatternError),

    /// The dictionary source could not be consulted
    #[error("dictionary service unavailable: {0}")]
    ExternalServiceUnavailable(String),

    /// Word failed local format checks or dictionary validation
    #[error("invalid word '{word}': {reason}")]
    InvalidWord { word: String, reason: String },

    /// A long-running batch was cancelled before completion
    #[error("operation cancelled")]
    Cancelled,
}

impl ServiceError {
    #[must_use]
    pub fn invalid_word(word: &str, err: &WordError) -> Self {
        Self::InvalidWord {
            word: word.trim().to_string(),
            reason: err.to_string(),
        }
    }

    /// Stable machine-readable code
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::StorageUnavailable(_) => "storage_unavailable",
            Self::PersistenceFailure(_) => "persistence_failure",
            Self::InvalidPattern(_) => "invalid_pattern",
            Self::ExternalServiceUnavailable(_) => "external_service_unavailable",
            Self::InvalidWord { .. } => "invalid_word",
            Self::Cancelled => "cancelled",
        }
    }
}

pub type Result<T, E = ServiceError> = std::result::Result<T, E>;
