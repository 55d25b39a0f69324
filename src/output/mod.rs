//! Terminal output formatting
//!
//! Human-readable display for every command result, plus JSON output for
//! scripting.

pub mod display;
pub mod formatters;

pub use display::{
    print_add_outcome, print_backup, print_batch_add_report, print_cache_stats,
    print_cleanup_report, print_filter_result, print_health, print_match_result,
    print_remove_report, print_screen_findings, print_stats, print_validation_record,
    print_validation_summary, print_word_page,
};

use serde::Serialize;

/// Print any result as pretty JSON
///
/// # Errors
/// Returns the serialization error, which only happens for non-string map keys.
pub fn print_json<T: Serialize>(value: &T) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
