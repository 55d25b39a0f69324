//! Core domain types for the word collection
//!
//! Pure value types with no I/O: normalized words, wildcard patterns and
//! filter criteria.

mod criteria;
mod pattern;
mod word;

pub use criteria::FilterCriteria;
pub use pattern::{Pattern, PatternError, WILDCARD};
pub use word::{MAX_WORD_LENGTH, Word, WordError, normalize};
