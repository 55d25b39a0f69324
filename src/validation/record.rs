//! Outcome of one dictionary lookup
//!
//! A record is immutable once built. Re-validation replaces it wholesale.

use serde::Serialize;
use std::fmt;

/// Why a word is not in the dictionary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    /// The source has no entry for the word
    NotFound,
    /// An entry exists but carries no definitions
    NoDefinitions,
    /// The token failed local format checks before any lookup
    MalformedWord,
}

/// Why the source could not give an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    Timeout,
    Transport,
    /// Unexpected HTTP status (rate limited, server error)
    Status,
    /// Response body could not be decoded
    Malformed,
}

/// Closed lookup verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum Verdict {
    Valid,
    Invalid(InvalidReason),
    Unavailable(UnavailableReason),
}

impl Verdict {
    /// True only for definitive negatives, never for outages
    #[must_use]
    pub const fn is_definitively_invalid(self) -> bool {
        matches!(self, Self::Invalid(_))
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Valid => "valid word",
            Self::Invalid(InvalidReason::NotFound) => "word not found in dictionary",
            Self::Invalid(InvalidReason::NoDefinitions) => "no definitions found",
            Self::Invalid(InvalidReason::MalformedWord) => "word must contain only letters",
            Self::Unavailable(UnavailableReason::Timeout) => "service unavailable: timeout",
            Self::Unavailable(UnavailableReason::Transport) => "service unavailable: transport error",
            Self::Unavailable(UnavailableReason::Status) => "service unavailable: unexpected status",
            Self::Unavailable(UnavailableReason::Malformed) => {
                "service unavailable: malformed response"
            }
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pronunciation {
    /// Region label derived from the audio file ("uk", "us"), if any
    pub prefix: Option<String>,
    pub phonetic: String,
    pub audio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationRecord {
    pub word: String,
    pub verdict: Verdict,
    pub definitions: Vec<String>,
    /// Parts of speech, deduplicated in source order
    pub word_forms: Vec<String>,
    pub pronunciations: Vec<Pronunciation>,
    pub examples: Vec<String>,
}

impl ValidationRecord {
    /// Record with no dictionary payload
    #[must_use]
    pub fn bare(word: impl Into<String>, verdict: Verdict) -> Self {
        Self {
            word: word.into(),
            verdict,
            definitions: Vec::new(),
            word_forms: Vec::new(),
            pronunciations: Vec::new(),
            examples: Vec::new(),
        }
    }

    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self.verdict, Verdict::Valid)
    }

    /// The source could not be consulted; says nothing about the word
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self.verdict, Verdict::Unavailable(_))
    }

    /// Human-readable reason string
    #[must_use]
    pub fn reason(&self) -> String {
        self.verdict.to_string()
    }
}
