//! Validation against an external dictionary
//!
//! [`ValidationCache`] is the only entry point callers need: it owns the
//! source, the rate limiter and the memo table. [`AcceptancePolicy`] turns
//! a raw lookup into a keep/reject decision for the collection.

mod cache;
mod limiter;
mod policy;
mod record;
mod scripted;
mod source;

pub use cache::{CacheOptions, CacheStats, DEFAULT_CACHE_CAPACITY, DEFAULT_TTL, ValidationCache};
pub use limiter::RateLimiter;
pub use policy::{AcceptancePolicy, Decision};
pub use record::{InvalidReason, Pronunciation, UnavailableReason, ValidationRecord, Verdict};
pub use scripted::ScriptedSource;
pub use source::{
    DictionaryEntry, DictionarySource, HttpDictionarySource, MAX_DEFINITIONS, MAX_EXAMPLES,
    SourceError, parse_entries,
};
