//! Composite acceptance rule applied on top of raw lookups
//!
//! A lookup only says whether the dictionary knows a word. Whether the
//! collection wants it is decided here: at least one definition, letters
//! only, and a minimum length for the puzzle domain.

use super::record::ValidationRecord;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "reason", rename_all = "snake_case")]
pub enum Decision {
    Accept,
    /// Definitively not wanted
    Reject(String),
    /// The dictionary could not be consulted; nothing is known
    Unverified(String),
}

impl Decision {
    #[must_use]
    pub const fn is_accept(&self) -> bool {
        matches!(self, Self::Accept)
    }

    #[must_use]
    pub const fn is_reject(&self) -> bool {
        matches!(self, Self::Reject(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptancePolicy {
    pub min_valid_length: usize,
}

impl Default for AcceptancePolicy {
    fn default() -> Self {
        Self {
            min_valid_length: 3,
        }
    }
}

impl AcceptancePolicy {
    #[must_use]
    pub fn evaluate(&self, record: &ValidationRecord) -> Decision {
        if record.is_unavailable() {
            return Decision::Unverified(record.reason());
        }
        if !record.is_valid() {
            return Decision::Reject(record.reason());
        }
        if !record.word.chars().all(|c| c.is_ascii_alphabetic()) {
            return Decision::Reject("word must contain only letters".to_string());
        }
        if record.word.len() < self.min_valid_length {
            return Decision::Reject(format!(
                "word must be at least {} letters",
                self.min_valid_length
            ));
        }
        if record.definitions.is_empty() {
            return Decision::Reject("no definitions found".to_string());
        }
        Decision::Accept
    }
}
