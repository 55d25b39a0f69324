//! End-to-end scenarios over the public service surface

use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use word_filter::core::FilterCriteria;
use word_filter::error::ServiceError;
use word_filter::maintenance::MaintenanceOptions;
use word_filter::service::WordService;
use word_filter::store::{FileBackend, MemoryBackend, RemoveOutcome, StorageBackend, WordStore};
use word_filter::validation::{CacheOptions, ScriptedSource, SourceError, ValidationCache};

fn fast_cache(source: Arc<ScriptedSource>) -> Arc<ValidationCache> {
    Arc::new(ValidationCache::new(
        source,
        CacheOptions {
            min_interval: Duration::ZERO,
            ..CacheOptions::default()
        },
    ))
}

async fn service_over(
    backend: Arc<dyn StorageBackend>,
    source: Arc<ScriptedSource>,
) -> WordService {
    let store = Arc::new(WordStore::new(backend, 2));
    store.load().await.unwrap();
    WordService::new(
        store,
        fast_cache(source),
        MaintenanceOptions {
            batch_pause: Duration::ZERO,
            ..MaintenanceOptions::default()
        },
    )
}

#[tokio::test]
async fn cat_and_dog_walkthrough() {
    let backend = Arc::new(MemoryBackend::with_words(&["cat", "dog"]));
    let source = Arc::new(ScriptedSource::new().with_word("owl", &["a nocturnal bird of prey"]));
    let svc = service_over(backend.clone(), source).await;

    assert_eq!(svc.filter(&FilterCriteria::new().contains("a")).words, vec!["cat"]);
    assert_eq!(svc.interactive(3, "?a?").unwrap(), vec!["cat"]);

    let again = svc.add("cat", false).await.unwrap();
    assert!(!again.was_new);
    assert_eq!(svc.stats().total_words, 2);

    let owl = svc.add("owl", false).await.unwrap();
    assert!(owl.was_new);
    assert_eq!(svc.stats().total_words, 3);

    assert_eq!(svc.remove("dog").await.unwrap(), RemoveOutcome::Removed);
    assert_eq!(svc.stats().total_words, 2);
    assert_eq!(svc.remove("dog").await.unwrap(), RemoveOutcome::NotFound);
    assert_eq!(svc.stats().total_words, 2);

    assert_eq!(backend.document().as_deref(), Some("cat\nowl\n"));
}

#[tokio::test]
async fn pattern_length_mismatch_is_rejected() {
    let backend = Arc::new(MemoryBackend::with_words(&["cat", "dog"]));
    let svc = service_over(backend, Arc::new(ScriptedSource::new())).await;

    assert!(matches!(
        svc.interactive(4, "?a?"),
        Err(ServiceError::InvalidPattern(_))
    ));
    assert!(svc.interactive(3, "zz?").unwrap().is_empty());
}

#[tokio::test]
async fn replicas_converge_on_reload() {
    let backend = Arc::new(MemoryBackend::with_words(&["cat", "dog"]));
    let a = service_over(backend.clone(), Arc::new(ScriptedSource::new())).await;
    let b = service_over(backend.clone(), Arc::new(ScriptedSource::new())).await;

    a.add("emu", true).await.unwrap();
    assert!(a.check("emu"));
    assert!(!b.check("emu"));

    b.reload().await.unwrap();
    assert!(b.check("emu"));
    assert!(!b.add("emu", true).await.unwrap().was_new);
}

#[tokio::test]
async fn interleaved_replica_writes_all_survive() {
    let backend = Arc::new(MemoryBackend::with_words(&["cat", "dog"]));
    let a = service_over(backend.clone(), Arc::new(ScriptedSource::new())).await;
    let b = service_over(backend.clone(), Arc::new(ScriptedSource::new())).await;

    assert!(a.add("owl", true).await.unwrap().was_new);
    assert!(b.add("emu", true).await.unwrap().was_new);
    assert_eq!(a.remove("cat").await.unwrap(), RemoveOutcome::Removed);

    a.reload().await.unwrap();
    b.reload().await.unwrap();
    for svc in [&a, &b] {
        assert!(svc.check("owl"));
        assert!(svc.check("emu"));
        assert!(!svc.check("cat"));
        assert_eq!(svc.stats().total_words, 3);
    }
}

#[tokio::test]
async fn cleanup_dry_run_then_auto_remove() {
    let backend = Arc::new(MemoryBackend::with_words(&["cat", "dog", "qzxv", "owl", "zzyzx"]));
    let source = Arc::new(
        ScriptedSource::new()
            .with_word("cat", &["a small feline"])
            .with_word("dog", &["a domesticated canine"])
            .with_error("owl", SourceError::Transport("connection reset".into())),
    );
    let svc = service_over(backend, source).await;

    let dry = svc
        .cleanup(false, &CancellationToken::new(), |_| {})
        .await
        .unwrap();
    assert_eq!(dry.found_invalid, 2);
    assert_eq!(dry.removed_count, 0);
    assert_eq!(svc.stats().total_words, 5);

    let real = svc
        .cleanup(true, &CancellationToken::new(), |_| {})
        .await
        .unwrap();
    let mut removed = real.removed.clone();
    removed.sort();
    assert_eq!(removed, vec!["qzxv", "zzyzx"]);
    assert_eq!(real.skipped_unavailable, 1);
    assert_eq!(svc.stats().total_words, 3);
    assert!(svc.check("owl"));
}

#[tokio::test]
async fn validate_collection_summary() {
    let backend = Arc::new(MemoryBackend::with_words(&["cat", "dog", "qzxv", "ox"]));
    let source = Arc::new(
        ScriptedSource::new()
            .with_word("cat", &["a small feline"])
            .with_word("dog", &["a domesticated canine"])
            .with_word("ox", &["a bovine"]),
    );
    let svc = service_over(backend, source.clone()).await;

    let summary = svc
        .validate_collection(&CancellationToken::new(), |_| {})
        .await;
    assert!(summary.complete);
    assert_eq!(summary.valid_count, 2);
    assert_eq!(summary.invalid_count, 2);
    assert!((summary.validity_percentage - 50.0).abs() < f64::EPSILON);

    // Second pass is served from the cache
    svc.validate_collection(&CancellationToken::new(), |_| {}).await;
    assert_eq!(source.call_count(), 4);
    assert_eq!(svc.cache_stats().await.hits, 4);
}

#[tokio::test]
async fn failed_write_keeps_mirror_consistent() {
    let backend = Arc::new(MemoryBackend::with_words(&["cat"]));
    let svc = service_over(backend.clone(), Arc::new(ScriptedSource::new())).await;
    backend.set_fail_writes(true);

    assert!(matches!(
        svc.add("emu", true).await,
        Err(ServiceError::PersistenceFailure(_))
    ));
    assert!(!svc.check("emu"));
    assert_eq!(backend.document().as_deref(), Some("cat"));
}

#[tokio::test]
async fn degraded_reads_serve_stale_data() {
    let backend = Arc::new(MemoryBackend::with_words(&["cat", "dog"]));
    let svc = service_over(backend.clone(), Arc::new(ScriptedSource::new())).await;
    backend.set_fail_reads(true);

    assert!(matches!(
        svc.reload().await,
        Err(ServiceError::StorageUnavailable(_))
    ));
    let health = svc.health().await;
    assert!(health.degraded);
    assert!(!health.storage_reachable);
    assert_eq!(svc.filter(&FilterCriteria::new()).words, vec!["cat", "dog"]);
}

#[tokio::test]
async fn file_backed_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("words.txt");
    let backend: Arc<dyn StorageBackend> = Arc::new(FileBackend::new(&path));
    let svc = service_over(backend.clone(), Arc::new(ScriptedSource::new())).await;

    svc.add_batch(&["dog", "cat", "Cat", "b4d"]).await.unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "cat\ndog\n");

    let backup = svc.backup().await.unwrap();
    assert!(backup.location.contains(".backup."));
    assert_eq!(std::fs::read_to_string(&backup.location).unwrap(), "cat\ndog\n");

    let reopened = service_over(backend, Arc::new(ScriptedSource::new())).await;
    assert_eq!(reopened.by_length(3).unwrap(), vec!["cat", "dog"]);
}
