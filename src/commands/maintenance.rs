//! Long-running collection commands with terminal progress
//!
//! Both commands stop cleanly on Ctrl-C: the scan is cancelled at the next
//! batch boundary and nothing is removed.

use crate::error::Result;
use crate::maintenance::{CleanupReport, ScanProgress, ValidationSummary};
use crate::service::WordService;
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;

/// Token that fires on the first Ctrl-C
#[must_use]
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, stopping after current batch");
            trigger.cancel();
        }
    });
    token
}

fn scan_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) | {msg}")
    {
        pb.set_style(style.progress_chars("█▓▒░"));
    }
    pb
}

fn tick(pb: &ProgressBar, p: &ScanProgress) {
    pb.set_position(p.processed as u64);
    pb.set_message(format!(
        "batch {}/{} | {} invalid, {} unavailable",
        p.batch, p.total_batches, p.invalid, p.unavailable
    ));
}

/// Validate the whole collection with a progress bar
pub async fn validate_collection(
    service: &WordService,
    cancel: &CancellationToken,
) -> ValidationSummary {
    let pb = scan_bar(service.stats().total_words);
    let summary = service
        .validate_collection(cancel, |p| tick(&pb, p))
        .await;
    pb.finish_and_clear();
    summary
}

/// Run cleanup with a progress bar
///
/// # Errors
/// Propagates the maintainer's storage and cancellation errors.
pub async fn cleanup(
    service: &WordService,
    auto_remove: bool,
    cancel: &CancellationToken,
) -> Result<CleanupReport> {
    let pb = scan_bar(service.stats().total_words);
    let report = service
        .cleanup(auto_remove, cancel, |p| {
            pb.set_length(p.total as u64);
            tick(&pb, p);
        })
        .await;
    pb.finish_and_clear();
    report
}
