//! Puzzle-suitability screen
//!
//! Flags words that are real but unwelcome in a word game. Surface checks
//! run first and need no lookup; the rest relies on the parts of speech
//! the dictionary reports.

use crate::validation::ValidationRecord;
use serde::Serialize;
use std::fmt;

/// Dictionary word forms that disqualify a word
pub const EXCLUDED_FORMS: [&str; 6] = [
    "profanity",
    "slang",
    "proper noun",
    "abbreviation",
    "interjection",
    "exclamation",
];

/// Leading run of one letter at or above this length is flagged
const REPEAT_RUN: usize = 4;

/// Words at or below this length are flagged
const SHORT_WORD: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ScreenReason {
    RepeatedLetters,
    TooShort,
    ExcludedForm(String),
}

impl fmt::Display for ScreenReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RepeatedLetters => write!(f, "starts with {REPEAT_RUN}+ repeated letters"),
            Self::TooShort => write!(f, "{SHORT_WORD} letters or fewer"),
            Self::ExcludedForm(form) => write!(f, "dictionary marks it as {form}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreenFinding {
    pub word: String,
    pub reason: ScreenReason,
}

/// Checks that need only the word itself
#[must_use]
pub fn surface_flag(word: &str) -> Option<ScreenReason> {
    if word.len() <= SHORT_WORD {
        return Some(ScreenReason::TooShort);
    }
    let bytes = word.as_bytes();
    let run = bytes.iter().take_while(|&&b| b == bytes[0]).count();
    (run >= REPEAT_RUN).then_some(ScreenReason::RepeatedLetters)
}

/// Checks on the dictionary's word forms; only valid records qualify
#[must_use]
pub fn form_flag(record: &ValidationRecord) -> Option<ScreenReason> {
    if !record.is_valid() {
        return None;
    }
    let forms = record.word_forms.join(" ").to_lowercase();
    EXCLUDED_FORMS
        .iter()
        .find(|excluded| forms.contains(*excluded))
        .map(|excluded| ScreenReason::ExcludedForm((*excluded).to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Verdict;

    fn record(word: &str, forms: &[&str]) -> ValidationRecord {
        ValidationRecord {
            word_forms: forms.iter().map(|f| (*f).to_string()).collect(),
            definitions: vec!["something".to_string()],
            ..ValidationRecord::bare(word, Verdict::Valid)
        }
    }

    #[test]
    fn short_words_are_flagged() {
        assert_eq!(surface_flag("a"), Some(ScreenReason::TooShort));
        assert_eq!(surface_flag("ox"), Some(ScreenReason::TooShort));
        assert_eq!(surface_flag("owl"), None);
    }

    #[test]
    fn repeated_leading_letters() {
        assert_eq!(surface_flag("aaaah"), Some(ScreenReason::RepeatedLetters));
        assert_eq!(surface_flag("zzzz"), Some(ScreenReason::RepeatedLetters));
        assert_eq!(surface_flag("aaah"), None);
        assert_eq!(surface_flag("baaaa"), None);
    }

    #[test]
    fn excluded_forms() {
        assert_eq!(
            form_flag(&record("wow", &["Interjection"])),
            Some(ScreenReason::ExcludedForm("interjection".to_string()))
        );
        assert_eq!(
            form_flag(&record("nasa", &["proper noun"])),
            Some(ScreenReason::ExcludedForm("proper noun".to_string()))
        );
        assert_eq!(form_flag(&record("owl", &["noun"])), None);
    }

    #[test]
    fn invalid_records_are_not_screened() {
        let mut r = record("wow", &["interjection"]);
        r.verdict = Verdict::Unavailable(crate::validation::UnavailableReason::Timeout);
        assert_eq!(form_flag(&r), None);
    }
}
