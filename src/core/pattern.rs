//! Fixed-length wildcard patterns for puzzle solving
//!
//! A pattern is a string over `a-z` plus the wildcard `?`. Each position
//! either pins a letter or accepts any letter:
//! - `c?t` matches "cat", "cot", "cut"
//! - `???` matches every three-letter word
//!
//! Patterns are stored as one `Option<u8>` per position so matching is a
//! single byte comparison per letter.

use super::word::MAX_WORD_LENGTH;
use thiserror::Error;

/// Wildcard symbol accepted in pattern strings
pub const WILDCARD: char = '?';

/// A parsed, validated wildcard pattern
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    slots: Vec<Option<u8>>,
}

/// Reasons a pattern query is malformed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("Pattern length {actual} does not match declared length {declared}")]
    LengthMismatch { declared: usize, actual: usize },
    #[error("Declared length must be between 1 and 50, got {0}")]
    InvalidLength(usize),
    #[error("Pattern contains invalid character {ch:?} at position {position}")]
    InvalidCharacter { ch: char, position: usize },
}

impl Pattern {
    /// Parse a pattern against a declared word length
    ///
    /// The declared length and the pattern length must agree exactly; a
    /// mismatch is a caller error, never an empty result.
    ///
    /// # Errors
    /// Returns `PatternError` for out-of-range lengths, length mismatches,
    /// and characters other than letters and `?`.
    ///
    /// # Examples
    /// ```
    /// use word_filter::core::Pattern;
    ///
    /// let pattern = Pattern::parse(3, "?A?").unwrap();
    /// assert!(pattern.matches("cat"));
    /// assert!(!pattern.matches("dog"));
    ///
    /// assert!(Pattern::parse(4, "?a?").is_err());
    /// ```
    pub fn parse(declared_length: usize, text: &str) -> Result<Self, PatternError> {
        if declared_length == 0 || declared_length > MAX_WORD_LENGTH {
            return Err(PatternError::InvalidLength(declared_length));
        }

        let actual = text.chars().count();
        if actual != declared_length {
            return Err(PatternError::LengthMismatch {
                declared: declared_length,
                actual,
            });
        }

        let slots = text
            .chars()
            .enumerate()
            .map(|(position, ch)| match ch {
                WILDCARD => Ok(None),
                c if c.is_ascii_alphabetic() => Ok(Some(c.to_ascii_lowercase() as u8)),
                c => Err(PatternError::InvalidCharacter { ch: c, position }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { slots })
    }

    /// Number of positions (equals the declared word length)
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// True when every position is a wildcard
    #[must_use]
    pub fn is_all_wildcards(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Check a normalized (lowercase) word against the pattern
    #[must_use]
    pub fn matches(&self, word: &str) -> bool {
        let bytes = word.as_bytes();
        bytes.len() == self.slots.len()
            && self
                .slots
                .iter()
                .zip(bytes)
                .all(|(slot, &b)| slot.is_none_or(|pinned| pinned == b.to_ascii_lowercase()))
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for slot in &self.slots {
            match slot {
                Some(b) => write!(f, "{}", char::from(*b))?,
                None => write!(f, "{WILDCARD}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_pattern() {
        let pattern = Pattern::parse(5, "c?a?e").unwrap();
        assert_eq!(pattern.len(), 5);
        assert_eq!(pattern.to_string(), "c?a?e");
    }

    #[test]
    fn parse_is_case_insensitive() {
        let upper = Pattern::parse(3, "C?T").unwrap();
        let lower = Pattern::parse(3, "c?t").unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn parse_length_mismatch() {
        assert_eq!(
            Pattern::parse(4, "?a?"),
            Err(PatternError::LengthMismatch {
                declared: 4,
                actual: 3
            })
        );
        assert!(matches!(
            Pattern::parse(2, "?a?"),
            Err(PatternError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn parse_invalid_length() {
        assert_eq!(Pattern::parse(0, ""), Err(PatternError::InvalidLength(0)));
        assert_eq!(
            Pattern::parse(51, &"?".repeat(51)),
            Err(PatternError::InvalidLength(51))
        );
    }

    #[test]
    fn parse_invalid_character() {
        assert_eq!(
            Pattern::parse(3, "c*t"),
            Err(PatternError::InvalidCharacter { ch: '*', position: 1 })
        );
        assert!(Pattern::parse(3, "c1t").is_err());
    }

    #[test]
    fn matches_pinned_positions() {
        let pattern = Pattern::parse(3, "?a?").unwrap();
        assert!(pattern.matches("cat"));
        assert!(pattern.matches("bat"));
        assert!(!pattern.matches("dog"));
        assert!(!pattern.matches("cart"));
    }

    #[test]
    fn all_wildcards_match_any_word_of_length() {
        let pattern = Pattern::parse(3, "???").unwrap();
        assert!(pattern.is_all_wildcards());
        assert!(pattern.matches("owl"));
        assert!(!pattern.matches("ow"));
    }

    #[test]
    fn fully_pinned_pattern_matches_only_itself() {
        let pattern = Pattern::parse(5, "crane").unwrap();
        assert!(!pattern.is_all_wildcards());
        assert!(pattern.matches("crane"));
        assert!(!pattern.matches("crate"));
    }
}
