//! Runtime configuration
//!
//! Layered lowest to highest: built-in defaults, an optional TOML file,
//! environment variables, then CLI flags (applied by the binary).

use crate::maintenance::MaintenanceOptions;
use crate::service::WordService;
use crate::store::{
    FileBackend, MemoryBackend, ObjectStoreBackend, RetryPolicy, StorageBackend, StorageError,
    WordStore,
};
use crate::validation::{
    AcceptancePolicy, CacheOptions, DEFAULT_CACHE_CAPACITY, HttpDictionarySource, SourceError,
    ValidationCache,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "word-filter.toml";

pub const DEFAULT_DICTIONARY_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en/";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("storage setup failed: {0}")]
    Storage(#[from] StorageError),
    #[error("dictionary setup failed: {0}")]
    Source(#[from] SourceError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    #[default]
    File,
    ObjectStore,
    Memory,
}

/// Log line layout on stderr
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    /// One JSON object per event, for log shippers
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Invalid(format!(
                "log_format must be text or json, got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub kind: StorageKind,
    /// Local document path (`file`)
    pub path: PathBuf,
    pub endpoint: Option<String>,
    pub bucket: Option<String>,
    pub key: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
    pub retry_attempts: usize,
    pub retry_backoff_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            kind: StorageKind::File,
            path: PathBuf::from("words.txt"),
            endpoint: None,
            bucket: None,
            key: "words.txt".to_string(),
            token: None,
            timeout_secs: 30,
            retry_attempts: 3,
            retry_backoff_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Shortest word accepted by add; single letters are rejected by default
    pub min_word_length: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { min_word_length: 2 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub min_interval_ms: u64,
    pub user_agent: String,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_DICTIONARY_URL.to_string(),
            timeout_secs: 10,
            min_interval_ms: 1000,
            user_agent: concat!("word_filter/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub capacity: usize,
    pub ttl_secs: u64,
    pub unavailable_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_CAPACITY,
            ttl_secs: 7 * 24 * 60 * 60,
            unavailable_ttl_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceConfig {
    pub batch_size: usize,
    pub batch_pause_ms: u64,
    /// Shortest word the dictionary check will accept
    pub min_valid_length: usize,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            batch_size: 20,
            batch_pause_ms: 500,
            min_valid_length: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub store: StoreConfig,
    pub dictionary: DictionaryConfig,
    pub cache: CacheConfig,
    pub maintenance: MaintenanceConfig,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            store: StoreConfig::default(),
            dictionary: DictionaryConfig::default(),
            cache: CacheConfig::default(),
            maintenance: MaintenanceConfig::default(),
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

fn truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl Config {
    /// # Errors
    /// `Parse` if the text is not valid TOML for this schema.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load from `path`, or from [`DEFAULT_CONFIG_FILE`] if it exists
    ///
    /// # Errors
    /// `Io` if an explicit path cannot be read, `Parse` on bad TOML.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };
        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Apply the deployment's environment variables through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("WORDS_FILE_PATH") {
            self.storage.path = PathBuf::from(path);
        }
        if let Some(flag) = lookup("USE_OBJECT_STORAGE") {
            self.storage.kind = if truthy(&flag) {
                StorageKind::ObjectStore
            } else {
                StorageKind::File
            };
        }
        if let Some(endpoint) = lookup("S3_ENDPOINT") {
            self.storage.endpoint = Some(endpoint);
        }
        if let Some(bucket) = lookup("WORDS_S3_BUCKET") {
            self.storage.bucket = Some(bucket);
        }
        if let Some(key) = lookup("WORDS_S3_KEY") {
            self.storage.key = key;
        }
        if let Some(token) = lookup("S3_TOKEN") {
            self.storage.token = Some(token);
        }
        if let Some(url) = lookup("DICTIONARY_URL") {
            self.dictionary.base_url = url;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            match format.parse() {
                Ok(format) => self.log_format = format,
                Err(e) => tracing::warn!(error = %e, "ignoring LOG_FORMAT"),
            }
        }
    }

    /// [`Config::apply_env`] against the process environment
    pub fn apply_process_env(&mut self) {
        self.apply_env(|key| std::env::var(key).ok());
    }

    /// # Errors
    /// `Invalid` describing the first bad setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.maintenance.batch_size == 0 {
            return Err(ConfigError::Invalid(
                "maintenance.batch_size must be at least 1".into(),
            ));
        }
        if self.cache.capacity == 0 {
            return Err(ConfigError::Invalid("cache.capacity must be at least 1".into()));
        }
        if self.dictionary.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "dictionary.timeout_secs must be at least 1".into(),
            ));
        }
        if self.storage.kind == StorageKind::ObjectStore
            && (self.storage.endpoint.is_none() || self.storage.bucket.is_none())
        {
            return Err(ConfigError::Invalid(
                "object_store storage needs storage.endpoint and storage.bucket".into(),
            ));
        }
        Ok(())
    }

    /// # Errors
    /// `Invalid` for incomplete object store settings, `Storage` if the
    /// HTTP client cannot be built.
    pub fn build_backend(&self) -> Result<Arc<dyn StorageBackend>, ConfigError> {
        let s = &self.storage;
        let backend: Arc<dyn StorageBackend> = match s.kind {
            StorageKind::File => Arc::new(FileBackend::new(&s.path)),
            StorageKind::Memory => Arc::new(MemoryBackend::new()),
            StorageKind::ObjectStore => {
                let (Some(endpoint), Some(bucket)) = (&s.endpoint, &s.bucket) else {
                    return Err(ConfigError::Invalid(
                        "object_store storage needs storage.endpoint and storage.bucket".into(),
                    ));
                };
                Arc::new(ObjectStoreBackend::new(
                    endpoint.as_str(),
                    bucket.as_str(),
                    s.key.as_str(),
                    s.token.clone(),
                    Duration::from_secs(s.timeout_secs),
                )?)
            }
        };
        Ok(backend)
    }

    #[must_use]
    pub fn cache_options(&self) -> CacheOptions {
        CacheOptions {
            capacity: self.cache.capacity,
            ttl: Duration::from_secs(self.cache.ttl_secs),
            unavailable_ttl: Duration::from_secs(self.cache.unavailable_ttl_secs),
            timeout: Duration::from_secs(self.dictionary.timeout_secs),
            min_interval: Duration::from_millis(self.dictionary.min_interval_ms),
        }
    }

    #[must_use]
    pub fn maintenance_options(&self) -> MaintenanceOptions {
        MaintenanceOptions {
            batch_size: self.maintenance.batch_size,
            batch_pause: Duration::from_millis(self.maintenance.batch_pause_ms),
            policy: AcceptancePolicy {
                min_valid_length: self.maintenance.min_valid_length,
            },
        }
    }

    /// Wire a service from this configuration; the store starts empty
    ///
    /// # Errors
    /// Any validation or backend/source construction failure.
    pub fn build_service(&self) -> Result<WordService, ConfigError> {
        self.validate()?;
        let retry = RetryPolicy {
            max_attempts: self.storage.retry_attempts.max(1),
            base_backoff_ms: self.storage.retry_backoff_ms,
        };
        let store = Arc::new(
            WordStore::new(self.build_backend()?, self.store.min_word_length).with_retry(retry),
        );
        let source = HttpDictionarySource::new(
            self.dictionary.base_url.as_str(),
            Duration::from_secs(self.dictionary.timeout_secs),
            &self.dictionary.user_agent,
        )?;
        let cache = Arc::new(ValidationCache::new(
            Arc::new(source),
            self.cache_options(),
        ));
        Ok(WordService::new(store, cache, self.maintenance_options()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.storage.kind, StorageKind::File);
        assert_eq!(config.store.min_word_length, 2);
        assert_eq!(config.dictionary.timeout_secs, 10);
        assert_eq!(config.dictionary.min_interval_ms, 1000);
        assert_eq!(config.cache.capacity, 10_000);
        assert_eq!(config.maintenance.batch_size, 20);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Text);
        config.validate().unwrap();
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            log_level = "debug"
            log_format = "json"

            [storage]
            kind = "object_store"
            endpoint = "https://objects.example"
            bucket = "words"

            [maintenance]
            batch_size = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.storage.kind, StorageKind::ObjectStore);
        assert_eq!(config.storage.key, "words.txt");
        assert_eq!(config.maintenance.batch_size, 5);
        assert_eq!(config.maintenance.batch_pause_ms, 500);
        config.validate().unwrap();
    }

    #[test]
    fn unknown_kind_is_a_parse_error() {
        let err = Config::from_toml_str("[storage]\nkind = \"floppy\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn env_overrides() {
        let env: HashMap<&str, &str> = [
            ("USE_OBJECT_STORAGE", "true"),
            ("S3_ENDPOINT", "https://objects.example"),
            ("WORDS_S3_BUCKET", "wordfilter"),
            ("WORDS_S3_KEY", "prod/words.txt"),
            ("DICTIONARY_URL", "http://localhost:9000/en/"),
            ("LOG_FORMAT", "JSON"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|k| env.get(k).map(|v| (*v).to_string()));

        assert_eq!(config.storage.kind, StorageKind::ObjectStore);
        assert_eq!(config.storage.bucket.as_deref(), Some("wordfilter"));
        assert_eq!(config.storage.key, "prod/words.txt");
        assert_eq!(config.dictionary.base_url, "http://localhost:9000/en/");
        assert!(config.storage.token.is_none());
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn bad_log_format_is_ignored_from_env() {
        let mut config = Config::default();
        config.apply_env(|k| (k == "LOG_FORMAT").then(|| "xml".to_string()));
        assert_eq!(config.log_format, LogFormat::Text);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn falsy_flag_selects_file() {
        let mut config = Config::default();
        config.storage.kind = StorageKind::ObjectStore;
        config.apply_env(|k| (k == "USE_OBJECT_STORAGE").then(|| "false".to_string()));
        assert_eq!(config.storage.kind, StorageKind::File);
    }

    #[test]
    fn object_store_needs_endpoint() {
        let mut config = Config::default();
        config.storage.kind = StorageKind::ObjectStore;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        assert!(config.build_backend().is_err());
    }

    #[test]
    fn zero_batch_size_is_invalid() {
        let mut config = Config::default();
        config.maintenance.batch_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_missing_explicit_file_fails() {
        let err = Config::load(Some(Path::new("/nonexistent/word-filter.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("word-filter.toml");
        std::fs::write(&path, "[store]\nmin_word_length = 3\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.store.min_word_length, 3);
    }

    #[test]
    fn memory_service_builds() {
        let mut config = Config::default();
        config.storage.kind = StorageKind::Memory;
        let service = config.build_service().unwrap();
        assert_eq!(service.stats().total_words, 0);
    }
}
