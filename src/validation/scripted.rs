//! In-process dictionary with canned answers
//!
//! Stands in for the HTTP source in tests and offline runs. Unknown words
//! answer "not found"; an outage can be switched on for every word.

use super::source::{DictionaryEntry, DictionarySource, SourceError};
use async_trait::async_trait;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

type Answer = Result<Option<DictionaryEntry>, SourceError>;

#[derive(Default)]
pub struct ScriptedSource {
    answers: Mutex<FxHashMap<String, Answer>>,
    outage: Mutex<Option<SourceError>>,
    delay: Mutex<Duration>,
    calls: AtomicUsize,
    calls_by_word: Mutex<FxHashMap<String, usize>>,
}

impl ScriptedSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Known word with the given definitions, tagged as a noun
    #[must_use]
    pub fn with_word(self, word: &str, definitions: &[&str]) -> Self {
        self.with_entry(
            word,
            DictionaryEntry {
                definitions: definitions.iter().map(|d| (*d).to_string()).collect(),
                word_forms: vec!["noun".to_string()],
                ..DictionaryEntry::default()
            },
        )
    }

    #[must_use]
    pub fn with_entry(self, word: &str, entry: DictionaryEntry) -> Self {
        self.set_answer(word, Ok(Some(entry)));
        self
    }

    #[must_use]
    pub fn with_error(self, word: &str, err: SourceError) -> Self {
        self.set_answer(word, Err(err));
        self
    }

    /// Simulated network latency for every lookup
    #[must_use]
    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.lock().unwrap_or_else(PoisonError::into_inner) = delay;
        self
    }

    pub fn set_answer(&self, word: &str, answer: Answer) {
        self.answers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(word.to_string(), answer);
    }

    /// While set, every lookup fails with `err`
    pub fn set_outage(&self, err: Option<SourceError>) {
        *self.outage.lock().unwrap_or_else(PoisonError::into_inner) = err;
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn calls_for(&self, word: &str) -> usize {
        self.calls_by_word
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(word)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl DictionarySource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn lookup(&self, word: &str) -> Result<Option<DictionaryEntry>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self
            .calls_by_word
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(word.to_string())
            .or_default() += 1;

        let delay = *self.delay.lock().unwrap_or_else(PoisonError::into_inner);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self
            .outage
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Err(err);
        }
        self.answers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(word)
            .cloned()
            .unwrap_or(Ok(None))
    }
}
