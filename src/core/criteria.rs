//! Multi-criteria filter description
//!
//! Every field is optional; an absent field places no constraint on that
//! dimension. Active predicates are combined with logical AND.

use serde::{Deserialize, Serialize};

/// Immutable set of optional filter predicates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub contains: Option<String>,
    pub starts_with: Option<String>,
    pub ends_with: Option<String>,
    pub exact_length: Option<usize>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub limit: Option<usize>,
}

impl FilterCriteria {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(mut self, needle: impl Into<String>) -> Self {
        self.contains = Some(needle.into());
        self
    }

    #[must_use]
    pub fn starts_with(mut self, prefix: impl Into<String>) -> Self {
        self.starts_with = Some(prefix.into());
        self
    }

    #[must_use]
    pub fn ends_with(mut self, suffix: impl Into<String>) -> Self {
        self.ends_with = Some(suffix.into());
        self
    }

    #[must_use]
    pub const fn exact_length(mut self, length: usize) -> Self {
        self.exact_length = Some(length);
        self
    }

    #[must_use]
    pub const fn min_length(mut self, length: usize) -> Self {
        self.min_length = Some(length);
        self
    }

    #[must_use]
    pub const fn max_length(mut self, length: usize) -> Self {
        self.max_length = Some(length);
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// True when no predicate is active (limit does not count)
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.contains.is_none()
            && self.starts_with.is_none()
            && self.ends_with.is_none()
            && self.exact_length.is_none()
            && self.min_length.is_none()
            && self.max_length.is_none()
    }

    /// Lowercase all text predicates and drop empty ones
    ///
    /// An empty substring constrains nothing, so it is treated as absent.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let clean = |s: &Option<String>| {
            s.as_deref()
                .map(|v| v.trim().to_lowercase())
                .filter(|v| !v.is_empty())
        };
        Self {
            contains: clean(&self.contains),
            starts_with: clean(&self.starts_with),
            ends_with: clean(&self.ends_with),
            ..self.clone()
        }
    }

    /// Evaluate every active predicate against a normalized word
    ///
    /// Text predicates are compared as given, so call this on a
    /// [`FilterCriteria::normalized`] copy.
    #[must_use]
    pub fn accepts(&self, word: &str) -> bool {
        let len = word.len();
        self.contains.as_deref().is_none_or(|c| word.contains(c))
            && self.starts_with.as_deref().is_none_or(|p| word.starts_with(p))
            && self.ends_with.as_deref().is_none_or(|s| word.ends_with(s))
            && self.exact_length.is_none_or(|n| len == n)
            && self.min_length.is_none_or(|n| len >= n)
            && self.max_length.is_none_or(|n| len <= n)
    }
}
