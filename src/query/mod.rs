//! Read-side query engines over a store [`Snapshot`](crate::store::Snapshot)
//!
//! Both engines are pure functions of a snapshot, so they never block on
//! writers and can run fully concurrently.

mod filter;
mod matcher;

pub use filter::{FilterResult, PARALLEL_THRESHOLD, filter};
pub use matcher::{match_pattern, words_of_length};
