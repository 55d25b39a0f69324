//! Fixed-length wildcard matching for interactive puzzle solving
//!
//! Candidates come from the snapshot's length index, so a query only
//! touches words of the declared length.

use crate::core::{Pattern, PatternError};
use crate::store::Snapshot;

/// Words of length `length` that match `pattern` position by position
///
/// # Errors
/// Returns a [`PatternError`] if the pattern is malformed or its length
/// differs from `length`. A well-formed query with no matches is `Ok(vec![])`.
pub fn match_pattern(
    snapshot: &Snapshot,
    length: usize,
    pattern: &str,
) -> Result<Vec<String>, PatternError> {
    let pattern = Pattern::parse(length, pattern)?;

    let candidates = snapshot.of_length(pattern.len());
    if pattern.is_all_wildcards() {
        return Ok(candidates.map(str::to_string).collect());
    }
    Ok(candidates
        .filter(|w| pattern.matches(w))
        .map(str::to_string)
        .collect())
}

/// Every word with exactly `length` letters, in store order
#[must_use]
pub fn words_of_length(snapshot: &Snapshot, length: usize) -> Vec<String> {
    snapshot.of_length(length).map(str::to_string).collect()
}
