//! Word Filter
//!
//! An authoritative word collection with fast filter and wildcard queries,
//! kept clean by validating entries against an external dictionary.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use word_filter::core::FilterCriteria;
//! use word_filter::maintenance::MaintenanceOptions;
//! use word_filter::service::WordService;
//! use word_filter::store::{MemoryBackend, WordStore};
//! use word_filter::validation::{CacheOptions, ScriptedSource, ValidationCache};
//!
//! # async fn demo() -> word_filter::error::Result<()> {
//! let store = Arc::new(WordStore::new(Arc::new(MemoryBackend::with_words(&["cat", "dog"])), 2));
//! store.load().await?;
//!
//! let source = Arc::new(ScriptedSource::new().with_word("owl", &["a night bird"]));
//! let cache = Arc::new(ValidationCache::new(source, CacheOptions::default()));
//! let service = WordService::new(store, cache, MaintenanceOptions::default());
//!
//! assert_eq!(service.filter(&FilterCriteria::new().contains("a")).words, vec!["cat"]);
//! assert_eq!(service.interactive(3, "?a?")?, vec!["cat"]);
//! assert!(service.add("owl", false).await?.was_new);
//! # Ok(())
//! # }
//! ```

// Core domain types
pub mod core;

// Error taxonomy
pub mod error;

// Word Store and durable backends
pub mod store;

// Filter and pattern queries
pub mod query;

// Dictionary validation
pub mod validation;

// Batch validation and cleanup
pub mod maintenance;

// Operation surface
pub mod service;

// Configuration
pub mod config;

// Command implementations
pub mod commands;

// Terminal output formatting
pub mod output;
