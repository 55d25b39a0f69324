//! External dictionary source
//!
//! The default implementation talks to a Free Dictionary API compatible
//! endpoint: `GET {base_url}{word}` returns a JSON array of entries, and
//! 404 means the word is unknown.

use super::record::Pronunciation;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// At most this many definitions are kept per word
pub const MAX_DEFINITIONS: usize = 5;
/// At most this many example sentences are kept per word
pub const MAX_EXAMPLES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("request timed out")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Dictionary payload for a word the source knows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DictionaryEntry {
    pub definitions: Vec<String>,
    pub word_forms: Vec<String>,
    pub pronunciations: Vec<Pronunciation>,
    pub examples: Vec<String>,
}

/// Lookup-by-word against an authoritative dictionary
///
/// `Ok(None)` means the source answered and does not know the word.
#[async_trait]
pub trait DictionarySource: Send + Sync {
    fn name(&self) -> &str;

    async fn lookup(&self, word: &str) -> Result<Option<DictionaryEntry>, SourceError>;
}

// Wire format

#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(default)]
    phonetic: Option<String>,
    #[serde(default)]
    phonetics: Vec<RawPhonetic>,
    #[serde(default)]
    meanings: Vec<RawMeaning>,
}

#[derive(Debug, Deserialize)]
struct RawPhonetic {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    audio: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMeaning {
    #[serde(default)]
    part_of_speech: Option<String>,
    #[serde(default)]
    definitions: Vec<RawDefinition>,
}

#[derive(Debug, Deserialize)]
struct RawDefinition {
    definition: String,
    #[serde(default)]
    example: Option<String>,
}

/// Region label from an audio URL such as `.../hello-uk.mp3`
fn audio_prefix(audio: &str) -> Option<String> {
    let file = audio.rsplit('/').next()?;
    let stem = file.split('.').next()?;
    let (_, region) = stem.rsplit_once('-')?;
    (region.len() == 2 && region.chars().all(|c| c.is_ascii_alphabetic()))
        .then(|| region.to_ascii_lowercase())
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn merge_entries(entries: Vec<RawEntry>) -> DictionaryEntry {
    let mut out = DictionaryEntry::default();
    for entry in entries {
        for p in entry.phonetics {
            let audio = non_empty(p.audio);
            let Some(phonetic) = non_empty(p.text) else {
                continue;
            };
            if out.pronunciations.iter().any(|x| x.phonetic == phonetic) {
                continue;
            }
            out.pronunciations.push(Pronunciation {
                prefix: audio.as_deref().and_then(audio_prefix),
                phonetic,
                audio,
            });
        }
        if out.pronunciations.is_empty()
            && let Some(phonetic) = non_empty(entry.phonetic)
        {
            out.pronunciations.push(Pronunciation {
                prefix: None,
                phonetic,
                audio: None,
            });
        }

        for meaning in entry.meanings {
            if let Some(pos) = non_empty(meaning.part_of_speech)
                && !out.word_forms.contains(&pos)
            {
                out.word_forms.push(pos);
            }
            for def in meaning.definitions {
                if out.definitions.len() < MAX_DEFINITIONS
                    && let Some(text) = non_empty(Some(def.definition))
                {
                    out.definitions.push(text);
                }
                if out.examples.len() < MAX_EXAMPLES
                    && let Some(example) = non_empty(def.example)
                {
                    out.examples.push(example);
                }
            }
        }
    }
    out
}

/// Parse a successful lookup body
///
/// # Errors
/// `SourceError::Malformed` if the body is not the expected JSON shape.
pub fn parse_entries(body: &str) -> Result<DictionaryEntry, SourceError> {
    let entries: Vec<RawEntry> =
        serde_json::from_str(body).map_err(|e| SourceError::Malformed(e.to_string()))?;
    Ok(merge_entries(entries))
}

pub struct HttpDictionarySource {
    client: Client,
    base_url: String,
}

impl HttpDictionarySource {
    /// # Errors
    /// `SourceError::Transport` if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| SourceError::Transport(e.to_string()))?;
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl DictionarySource for HttpDictionarySource {
    fn name(&self) -> &str {
        &self.base_url
    }

    async fn lookup(&self, word: &str) -> Result<Option<DictionaryEntry>, SourceError> {
        let url = format!("{}{}", self.base_url, word);
        let resp = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout
            } else {
                SourceError::Transport(e.to_string())
            }
        })?;

        match resp.status() {
            StatusCode::NOT_FOUND => Ok(None),
            s if s.is_success() => {
                let body = resp
                    .text()
                    .await
                    .map_err(|e| SourceError::Transport(e.to_string()))?;
                parse_entries(&body).map(Some)
            }
            s => Err(SourceError::Status(s.as_u16())),
        }
    }
}
