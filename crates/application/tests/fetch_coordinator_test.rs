mod helpers;

use ferrous_watchlist_application::cache::ResponseCache;
use ferrous_watchlist_application::services::FetchCoordinator;
use ferrous_watchlist_domain::{CacheKey, DomainError};
use helpers::{wait_until, LONG_TTL};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

fn coordinator() -> Arc<FetchCoordinator<String>> {
    Arc::new(FetchCoordinator::new(Arc::new(ResponseCache::new(
        128,
        1 << 20,
    ))))
}

fn key(owner_id: i64) -> CacheKey {
    CacheKey::builder("lists_with_summary")
        .param("owner_id", owner_id)
        .build()
}

// ============================================================================
// Deduplication
// ============================================================================

#[tokio::test]
async fn test_concurrent_fetches_share_one_call() {
    let coordinator = coordinator();
    let calls = Arc::new(AtomicUsize::new(0));

    let load = |calls: Arc<AtomicUsize>| {
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                tokio::task::yield_now().await;
                Ok::<_, DomainError>("payload".to_string())
            }
        }
    };

    let (a, b) = tokio::join!(
        coordinator.fetch(key(1), LONG_TTL, load(Arc::clone(&calls))),
        coordinator.fetch(key(1), LONG_TTL, load(Arc::clone(&calls))),
    );

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(a.unwrap().as_str(), "payload");
    assert_eq!(b.unwrap().as_str(), "payload");
    assert_eq!(coordinator.in_flight_count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_tasks_one_backend_call() {
    let coordinator = coordinator();
    let calls = Arc::new(AtomicUsize::new(0));

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let coordinator = Arc::clone(&coordinator);
            let calls = Arc::clone(&calls);
            tokio::spawn(async move {
                coordinator
                    .fetch(key(7), LONG_TTL, move || {
                        calls.fetch_add(1, Ordering::SeqCst);
                        async move {
                            tokio::time::sleep(Duration::from_millis(50)).await;
                            Ok("shared".to_string())
                        }
                    })
                    .await
            })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap().unwrap().as_str(), "shared");
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_different_keys_fetch_independently() {
    let coordinator = coordinator();
    let calls = Arc::new(AtomicUsize::new(0));

    for owner in [1, 2, 1, 2] {
        let calls = Arc::clone(&calls);
        coordinator
            .fetch(key(owner), LONG_TTL, move || {
                calls.fetch_add(1, Ordering::SeqCst);
                async move { Ok(format!("owner {}", owner)) }
            })
            .await
            .unwrap();
    }

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

// ============================================================================
// Cache-then-network
// ============================================================================

#[tokio::test]
async fn test_fresh_entry_skips_loader() {
    let coordinator = coordinator();
    coordinator
        .cache()
        .put(key(1), "cached".to_string(), LONG_TTL);

    let calls = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&calls);

    let value = coordinator
        .fetch(key(1), LONG_TTL, move || {
            counted.fetch_add(1, Ordering::SeqCst);
            async { Ok("loaded".to_string()) }
        })
        .await
        .unwrap();

    assert_eq!(value.as_str(), "cached");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_errors_are_not_cached() {
    let coordinator = coordinator();
    let calls = Arc::new(AtomicUsize::new(0));

    let failing = {
        let calls = Arc::clone(&calls);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<String, _>(DomainError::BackendUnavailable("down".to_string())) }
        }
    };
    let err = coordinator
        .fetch(key(1), LONG_TTL, failing)
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::BackendUnavailable("down".to_string()));
    assert!(coordinator.cache().is_empty());
    assert_eq!(coordinator.in_flight_count(), 0);

    let recovering = {
        let calls = Arc::clone(&calls);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok("back".to_string()) }
        }
    };
    let value = coordinator
        .fetch(key(1), LONG_TTL, recovering)
        .await
        .unwrap();

    assert_eq!(value.as_str(), "back");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_expired_entry_triggers_new_call() {
    let coordinator = coordinator();
    let calls = Arc::new(AtomicUsize::new(0));
    let ttl = Duration::from_secs(120);

    for _ in 0..2 {
        let calls = Arc::clone(&calls);
        coordinator
            .fetch(key(1), ttl, move || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok("v".to_string()) }
            })
            .await
            .unwrap();
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    tokio::time::advance(Duration::from_secs(121)).await;

    let again = Arc::clone(&calls);
    coordinator
        .fetch(key(1), ttl, move || {
            again.fetch_add(1, Ordering::SeqCst);
            async { Ok("v".to_string()) }
        })
        .await
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

// ============================================================================
// Invalidation
// ============================================================================

#[tokio::test]
async fn test_invalidate_forces_fresh_call() {
    let coordinator = coordinator();
    let calls = Arc::new(AtomicUsize::new(0));

    let fetch = |coordinator: Arc<FetchCoordinator<String>>, calls: Arc<AtomicUsize>| async move {
        coordinator
            .fetch(key(1), LONG_TTL, move || {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move { Ok(format!("v{}", n)) }
            })
            .await
            .unwrap()
    };

    assert_eq!(fetch(Arc::clone(&coordinator), Arc::clone(&calls)).await.as_str(), "v1");
    assert_eq!(coordinator.invalidate_keys(&[key(1)]), 1);
    assert_eq!(fetch(Arc::clone(&coordinator), Arc::clone(&calls)).await.as_str(), "v2");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_invalidate_prefix_only_touches_operation() {
    let coordinator = coordinator();
    let other = CacheKey::builder("reverse_mapping")
        .param("owner_id", 1i64)
        .build();

    coordinator.cache().put(key(1), "a".to_string(), LONG_TTL);
    coordinator.cache().put(key(2), "b".to_string(), LONG_TTL);
    coordinator.cache().put(other.clone(), "c".to_string(), LONG_TTL);

    assert_eq!(coordinator.invalidate_prefix("lists_with_summary"), 2);
    assert!(coordinator.cache().get(&other).is_some());
    assert_eq!(coordinator.clear(), 1);
}

#[tokio::test]
async fn test_invalidation_during_fetch_blocks_populate() {
    let coordinator = coordinator();
    let (release, gate) = oneshot::channel::<()>();

    let waiter = {
        let coordinator = Arc::clone(&coordinator);
        tokio::spawn(async move {
            coordinator
                .fetch(key(1), LONG_TTL, move || async move {
                    let _ = gate.await;
                    Ok("stale".to_string())
                })
                .await
        })
    };

    wait_until(|| coordinator.is_in_flight(&key(1))).await;
    coordinator.invalidate_keys(&[key(1)]);
    assert!(!coordinator.is_in_flight(&key(1)));

    release.send(()).unwrap();
    assert_eq!(waiter.await.unwrap().unwrap().as_str(), "stale");

    assert!(coordinator.cache().get(&key(1)).is_none());

    let calls = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&calls);
    let fresh = coordinator
        .fetch(key(1), LONG_TTL, move || {
            counted.fetch_add(1, Ordering::SeqCst);
            async { Ok("fresh".to_string()) }
        })
        .await
        .unwrap();
    assert_eq!(fresh.as_str(), "fresh");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unrelated_invalidation_keeps_populate() {
    let coordinator = coordinator();
    let (release, gate) = oneshot::channel::<()>();
    let other = CacheKey::builder("list_items_with_status")
        .param("list_id", 9)
        .build();

    let waiter = {
        let coordinator = Arc::clone(&coordinator);
        tokio::spawn(async move {
            coordinator
                .fetch(key(1), LONG_TTL, move || async move {
                    let _ = gate.await;
                    Ok("kept".to_string())
                })
                .await
        })
    };

    wait_until(|| coordinator.is_in_flight(&key(1))).await;
    coordinator.invalidate_keys(&[other]);
    coordinator.invalidate_prefix("reverse_mapping");
    assert!(coordinator.is_in_flight(&key(1)));

    release.send(()).unwrap();
    assert_eq!(waiter.await.unwrap().unwrap().as_str(), "kept");

    let calls = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&calls);
    let again = coordinator
        .fetch(key(1), LONG_TTL, move || {
            counted.fetch_add(1, Ordering::SeqCst);
            async { Ok("reloaded".to_string()) }
        })
        .await
        .unwrap();

    assert_eq!(again.as_str(), "kept");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_refetch_after_invalidation_is_not_overwritten_by_stale_load() {
    let coordinator = coordinator();
    let (release, gate) = oneshot::channel::<()>();

    let stale = {
        let coordinator = Arc::clone(&coordinator);
        tokio::spawn(async move {
            coordinator
                .fetch(key(2), LONG_TTL, move || async move {
                    let _ = gate.await;
                    Ok("stale".to_string())
                })
                .await
        })
    };

    wait_until(|| coordinator.is_in_flight(&key(2))).await;
    coordinator.invalidate_keys(&[key(2)]);

    let fresh = coordinator
        .fetch(key(2), LONG_TTL, || async { Ok("fresh".to_string()) })
        .await
        .unwrap();
    assert_eq!(fresh.as_str(), "fresh");

    release.send(()).unwrap();
    assert_eq!(stale.await.unwrap().unwrap().as_str(), "stale");

    assert_eq!(
        coordinator.cache().get(&key(2)).as_deref().map(String::as_str),
        Some("fresh")
    );
}

// ============================================================================
// Cooperative cancellation
// ============================================================================

#[tokio::test]
async fn test_abandoned_waiter_does_not_abort_fetch() {
    let coordinator = coordinator();
    let (release, gate) = oneshot::channel::<()>();

    let waiter = {
        let coordinator = Arc::clone(&coordinator);
        tokio::spawn(async move {
            coordinator
                .fetch(key(3), LONG_TTL, move || async move {
                    let _ = gate.await;
                    Ok("finished".to_string())
                })
                .await
        })
    };

    wait_until(|| coordinator.is_in_flight(&key(3))).await;
    waiter.abort();
    let _ = waiter.await;

    release.send(()).unwrap();
    wait_until(|| !coordinator.is_in_flight(&key(3))).await;

    assert_eq!(
        coordinator.cache().get(&key(3)).as_deref().map(String::as_str),
        Some("finished")
    );
}

#[tokio::test]
async fn test_panicking_loader_is_reported_as_rejected() {
    let coordinator = coordinator();

    let err = coordinator
        .fetch(key(4), LONG_TTL, || async {
            if true {
                panic!("loader blew up");
            }
            Ok("unreachable".to_string())
        })
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::BackendRejected(_)));
    assert!(!coordinator.is_in_flight(&key(4)));
    assert!(coordinator.cache().is_empty());
}
