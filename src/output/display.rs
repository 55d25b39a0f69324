//! Display functions for command results

use super::formatters::{optional, percentage_bar, word_columns};
use crate::maintenance::{CleanupReport, ScreenFinding, ValidationSummary};
use crate::query::FilterResult;
use crate::service::{AddOutcome, HealthReport, RemoveReport, WordPage};
use crate::store::{BackupReport, BatchAddReport, CollectionStats, RemoveOutcome};
use crate::validation::{CacheStats, ValidationRecord};
use colored::Colorize;

const WORDS_PER_ROW: usize = 8;

fn header(title: &str) {
    println!("\n{}", "═".repeat(60).cyan());
    println!(" {} ", title.bright_cyan().bold());
    println!("{}", "═".repeat(60).cyan());
}

fn print_words(words: &[String]) {
    for row in word_columns(words, WORDS_PER_ROW) {
        println!("  {row}");
    }
}

pub fn print_filter_result(result: &FilterResult) {
    print_words(&result.words);
    if result.words.len() < result.total_matches {
        println!(
            "\n{} of {} matches shown",
            result.words.len().to_string().bright_yellow(),
            result.total_matches
        );
    } else {
        println!("\n{} matches", result.total_matches.to_string().bright_yellow());
    }
}

/// Interactive matches, `total` before the display cap
pub fn print_match_result(pattern: &str, words: &[String], total: usize) {
    if words.is_empty() {
        println!("No words match {}", pattern.bright_yellow());
        return;
    }
    print_words(words);
    if words.len() < total {
        println!("\n{} of {total} matches shown", words.len());
    } else {
        println!("\n{total} matches for {}", pattern.bright_yellow());
    }
}

pub fn print_word_page(page: &WordPage) {
    print_words(&page.words);
    println!("\n{} of {} words", page.words.len(), page.total);
}

pub fn print_stats(stats: &CollectionStats) {
    header("COLLECTION");
    println!("   Words:          {}", stats.total_words.to_string().bright_yellow().bold());
    println!("   Shortest:       {}", optional(stats.min_length));
    println!("   Longest:        {}", optional(stats.max_length));
    println!(
        "   Average length: {}",
        optional(stats.avg_length.map(|a| format!("{a:.2}")))
    );
}

pub fn print_validation_record(record: &ValidationRecord) {
    let status = if record.is_valid() {
        "✅ valid".green().bold()
    } else if record.is_unavailable() {
        "⚠️  unverified".yellow().bold()
    } else {
        "❌ invalid".red().bold()
    };
    println!("\n{} {}", record.word.bright_yellow().bold(), status);
    println!("   Reason: {}", record.reason());

    if !record.word_forms.is_empty() {
        println!("   Forms:  {}", record.word_forms.join(", "));
    }
    for p in &record.pronunciations {
        let label = p.prefix.as_deref().unwrap_or("").to_uppercase();
        println!("   {label:<3}     {}", p.phonetic.dimmed());
    }
    for (i, def) in record.definitions.iter().enumerate() {
        println!("   {}. {def}", i + 1);
    }
    for example in &record.examples {
        println!("      \"{}\"", example.italic());
    }
}

pub fn print_add_outcome(outcome: &AddOutcome) {
    if outcome.success && outcome.was_new {
        println!("{}", format!("✅ {}", outcome.message).green().bold());
    } else if outcome.success {
        println!("{}", outcome.message.yellow());
    } else {
        println!("{}", format!("❌ {}", outcome.message).red().bold());
    }
    if let Some(record) = &outcome.validation
        && !record.definitions.is_empty()
    {
        println!("   {}", record.definitions[0].dimmed());
    }
}

pub fn print_batch_add_report(report: &BatchAddReport) {
    println!(
        "Added {}, skipped {}, rejected {}",
        report.added.len().to_string().green().bold(),
        report.skipped.len().to_string().yellow(),
        report.rejected.len().to_string().red()
    );
    for (word, reason) in &report.rejected {
        println!("   {} {}", word.red(), reason.dimmed());
    }
}

pub fn print_remove_report(report: &RemoveReport) {
    for (word, outcome) in &report.outcomes {
        match outcome {
            RemoveOutcome::Removed => println!("   {} {}", "removed".green(), word),
            RemoveOutcome::NotFound => println!("   {} {}", "not found".yellow(), word),
        }
    }
    println!(
        "\nRemoved {} of {} submitted",
        report.removed_count.to_string().bright_yellow(),
        report.outcomes.len()
    );
}

pub fn print_validation_summary(summary: &ValidationSummary) {
    header("COLLECTION VALIDATION");
    if !summary.complete {
        println!(
            "{}",
            format!(
                "⚠️  Stopped early: {} of {} words checked",
                summary.processed, summary.total_words
            )
            .yellow()
        );
    }
    println!(
        "   Validity:    [{}] {}",
        percentage_bar(summary.validity_percentage, 30).green(),
        format!("{:.2}%", summary.validity_percentage).bright_yellow()
    );
    println!("   Valid:       {}", summary.valid_count.to_string().green());
    println!("   Invalid:     {}", summary.invalid_count.to_string().red());
    println!("   Unverified:  {}", summary.unavailable_count.to_string().yellow());

    if !summary.invalid_words.is_empty() {
        println!("\n{}", "Invalid words:".bright_cyan().bold());
        for flagged in &summary.invalid_words {
            println!("   {:<20} {}", flagged.word.red(), flagged.reason.dimmed());
        }
    }
    if !summary.unavailable_words.is_empty() {
        println!("\n{}", "Could not be checked:".bright_cyan().bold());
        for flagged in &summary.unavailable_words {
            println!("   {:<20} {}", flagged.word.yellow(), flagged.reason.dimmed());
        }
    }
}

pub fn print_cleanup_report(report: &CleanupReport) {
    print_validation_summary(&report.summary);
    println!();
    if report.auto_remove {
        println!(
            "{}",
            format!(
                "🧹 Removed {} of {} invalid words ({} → {})",
                report.removed_count, report.found_invalid, report.total_before, report.total_after
            )
            .green()
            .bold()
        );
    } else {
        println!(
            "{}",
            format!(
                "Dry run: {} invalid words found, nothing removed",
                report.found_invalid
            )
            .yellow()
        );
    }
    if report.skipped_unavailable > 0 {
        println!(
            "   {} words kept because the dictionary was unavailable",
            report.skipped_unavailable
        );
    }
}

pub fn print_screen_findings(findings: &[ScreenFinding]) {
    if findings.is_empty() {
        println!("{}", "✅ Nothing flagged".green().bold());
        return;
    }
    for finding in findings {
        println!("   {:<20} {}", finding.word.red(), finding.reason.to_string().dimmed());
    }
    println!("\n{} words flagged", findings.len().to_string().bright_yellow());
}

pub fn print_health(health: &HealthReport) {
    header("HEALTH");
    let status = if health.degraded {
        "degraded (serving stale data)".yellow().bold()
    } else {
        "ok".green().bold()
    };
    println!("   Status:      {status}");
    println!("   Words:       {}", health.total_words);
    println!("   Version:     {}", health.snapshot_version);
    println!(
        "   Storage:     {} ({}) {}",
        health.storage.provider, health.storage.kind, health.storage.location
    );
    match &health.storage_error {
        None => println!("   Reachable:   {}", "yes".green()),
        Some(e) => println!("   Reachable:   {} {}", "no".red(), e.dimmed()),
    }
    println!("   Dictionary:  {}", health.dictionary);
}

pub fn print_backup(report: &BackupReport) {
    println!(
        "{} {} words to {}",
        "💾 Backed up".green().bold(),
        report.word_count,
        report.location.bright_yellow()
    );
}

pub fn print_cache_stats(stats: &CacheStats) {
    header("VALIDATION CACHE");
    println!("   Entries:         {}/{}", stats.entries, stats.capacity);
    println!("   Hits:            {}", stats.hits);
    println!("   Misses:          {}", stats.misses);
    println!("   External calls:  {}", stats.external_calls);
    println!("   Coalesced:       {}", stats.coalesced);
}
