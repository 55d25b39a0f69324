//! Normalized word representation
//!
//! A Word is a lowercase, ASCII-alphabetic token. Identity is its text.

use std::fmt;
use thiserror::Error;

/// Longest word the collection accepts or queries for
pub const MAX_WORD_LENGTH: usize = 50;

/// A normalized collection word
///
/// Always lowercase and made of `a-z` only, so equality is case-insensitive
/// with respect to the raw input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Word {
    text: String,
}

/// Error type for words that fail local format checks
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WordError {
    #[error("Word cannot be empty")]
    Empty,
    #[error("Word must be at least {min} letters, got {len}")]
    TooShort { min: usize, len: usize },
    #[error("Word must be at most 50 letters, got {0}")]
    TooLong(usize),
    #[error("Word must contain only ASCII letters")]
    NonAscii,
    #[error("Word must contain only letters")]
    InvalidCharacters,
}

impl Word {
    /// Create a new Word from raw input
    ///
    /// Trims surrounding whitespace and lowercases. Any length from 1 to
    /// [`MAX_WORD_LENGTH`] is accepted; use [`Word::with_min_length`] to apply
    /// a quality floor.
    ///
    /// # Errors
    /// Returns `WordError` if the input is empty, too long, or contains
    /// anything other than ASCII letters.
    ///
    /// # Examples
    /// ```
    /// use word_filter::core::Word;
    ///
    /// let word = Word::new("  Crane ").unwrap();
    /// assert_eq!(word.text(), "crane");
    ///
    /// assert!(Word::new("don't").is_err());
    /// assert!(Word::new("sh0rt").is_err());
    /// ```
    pub fn new(text: impl AsRef<str>) -> Result<Self, WordError> {
        let text = text.as_ref().trim();

        if text.is_empty() {
            return Err(WordError::Empty);
        }

        if !text.is_ascii() {
            return Err(WordError::NonAscii);
        }

        if !text.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(WordError::InvalidCharacters);
        }

        if text.len() > MAX_WORD_LENGTH {
            return Err(WordError::TooLong(text.len()));
        }

        Ok(Self {
            text: text.to_ascii_lowercase(),
        })
    }

    /// Create a Word and reject anything shorter than `min` letters
    ///
    /// # Errors
    /// Returns `WordError::TooShort` below the floor, or any error from [`Word::new`].
    pub fn with_min_length(text: impl AsRef<str>, min: usize) -> Result<Self, WordError> {
        let word = Self::new(text)?;
        if word.len() < min {
            return Err(WordError::TooShort {
                min,
                len: word.len(),
            });
        }
        Ok(word)
    }

    /// Get the word as a string slice
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of letters
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl AsRef<str> for Word {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Lowercase and trim without validating
///
/// Used for lookups where a malformed token should simply miss.
#[must_use]
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}
