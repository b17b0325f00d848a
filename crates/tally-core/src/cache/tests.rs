//! Tests for the query cache

use super::*;
use crate::models::DashboardSummary;
use futures::future::BoxFuture;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

type Fetcher = Box<dyn Fn() -> BoxFuture<'static, TallyResult<Value>> + Send + Sync>;

/// Fetcher that counts calls and answers `value` after `delay`
fn counting(calls: &Arc<AtomicUsize>, value: Value, delay: Duration) -> Fetcher {
    let calls = Arc::clone(calls);
    Box::new(move || {
        let calls = Arc::clone(&calls);
        let value = value.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(delay).await;
            Ok(value)
        }
        .boxed()
    })
}

/// Fetcher that replays `responses` in order, failing once they run out
fn scripted(calls: &Arc<AtomicUsize>, responses: Vec<TallyResult<Value>>) -> Fetcher {
    let calls = Arc::clone(calls);
    let responses = Arc::new(Mutex::new(VecDeque::from(responses)));
    Box::new(move || {
        let calls = Arc::clone(&calls);
        let next = responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TallyError::network("no scripted response")));
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            next
        }
        .boxed()
    })
}

fn dashboard(month: &str) -> CacheKey {
    CacheKey::new(Namespace::Dashboard).with_param("month", month)
}

fn recent() -> CacheKey {
    CacheKey::new(Namespace::Recent).with_param("limit", 8)
}

#[tokio::test(start_paused = true)]
async fn test_fresh_entry_served_without_fetch() {
    let cache = CacheManager::default();
    let calls = Arc::new(AtomicUsize::new(0));

    let first: Query<Value> = cache
        .read(recent(), counting(&calls, json!([]), Duration::ZERO))
        .await;
    assert!(first.is_success());
    assert!(!first.from_cache);

    tokio::time::advance(Duration::from_secs(10)).await;
    let second: Query<Value> = cache
        .read(recent(), counting(&calls, json!([]), Duration::ZERO))
        .await;
    assert!(second.from_cache);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(cache.statistics().hits, 1);
}

#[tokio::test(start_paused = true)]
async fn test_entry_goes_stale_after_window() {
    let cache = CacheManager::default();
    let calls = Arc::new(AtomicUsize::new(0));

    let _: Query<Value> = cache
        .read(recent(), counting(&calls, json!([]), Duration::ZERO))
        .await;
    assert!(!cache.is_stale(&recent()));

    tokio::time::advance(Duration::from_secs(16)).await;
    assert!(cache.is_stale(&recent()));

    let again: Query<Value> = cache
        .read(recent(), counting(&calls, json!([]), Duration::ZERO))
        .await;
    assert!(!again.from_cache);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_reads_share_one_fetch() {
    let cache = CacheManager::default();
    let calls = Arc::new(AtomicUsize::new(0));
    let key = dashboard("2026-01");

    let (a, b) = tokio::join!(
        cache.read::<Value, _, _>(
            key.clone(),
            counting(&calls, json!({"total_spend": 10.0}), Duration::from_millis(100))
        ),
        cache.read::<Value, _, _>(
            key.clone(),
            counting(&calls, json!({"total_spend": 10.0}), Duration::from_millis(100))
        ),
    );

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(a.data, b.data);
    let stats = cache.statistics();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.coalesced, 1);
    assert!(!cache.is_fetching(&key));
}

#[tokio::test(start_paused = true)]
async fn test_refetch_bypasses_freshness_but_coalesces() {
    let cache = CacheManager::default();
    let calls = Arc::new(AtomicUsize::new(0));
    let key = CacheKey::new(Namespace::Insights).with_param("month", "2026-01");

    let _: Query<Value> = cache
        .read(key.clone(), counting(&calls, json!(1), Duration::ZERO))
        .await;
    let (a, b) = tokio::join!(
        cache.refetch::<Value, _, _>(key.clone(), counting(&calls, json!(2), Duration::from_millis(50))),
        cache.refetch::<Value, _, _>(key.clone(), counting(&calls, json!(2), Duration::from_millis(50))),
    );

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(a.data, Some(json!(2)));
    assert_eq!(b.data, Some(json!(2)));
}

#[tokio::test(start_paused = true)]
async fn test_insights_never_go_stale_on_their_own() {
    let cache = CacheManager::default();
    let calls = Arc::new(AtomicUsize::new(0));
    let key = CacheKey::new(Namespace::Insights).with_param("month", "2026-01");

    let _: Query<Value> = cache
        .read(key.clone(), counting(&calls, json!({}), Duration::ZERO))
        .await;
    tokio::time::advance(Duration::from_secs(86_400)).await;
    let later: Query<Value> = cache
        .read(key.clone(), counting(&calls, json!({}), Duration::ZERO))
        .await;

    assert!(later.from_cache);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_failed_fetch_retried_once() {
    let cache = CacheManager::default();
    let calls = Arc::new(AtomicUsize::new(0));
    let key = CacheKey::new(Namespace::Trend);

    let query: Query<Value> = cache
        .read(
            key,
            scripted(
                &calls,
                vec![Err(TallyError::network("connection reset")), Ok(json!([]))],
            ),
        )
        .await;

    assert!(query.is_success());
    assert_eq!(query.retry_count, 1);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_retry_exhausted_surfaces_error() {
    let cache = CacheManager::default();
    let calls = Arc::new(AtomicUsize::new(0));

    let query: Query<Value> = cache
        .read(
            CacheKey::new(Namespace::Trend),
            scripted(
                &calls,
                vec![
                    Err(TallyError::server(500, Some("boom".into()))),
                    Err(TallyError::server(502, None)),
                ],
            ),
        )
        .await;

    assert_eq!(query.status, EntryStatus::Error);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    let err = query.into_result().unwrap_err();
    assert_eq!(err.status_code(), Some(502));
}

#[tokio::test(start_paused = true)]
async fn test_client_errors_not_retried() {
    let cache = CacheManager::default();
    let calls = Arc::new(AtomicUsize::new(0));

    let query: Query<Value> = cache
        .read(
            CacheKey::new(Namespace::Profile),
            scripted(
                &calls,
                vec![Err(TallyError::server(404, Some("Not found".into())))],
            ),
        )
        .await;

    assert_eq!(query.status, EntryStatus::Error);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_dashboard_failure_substitutes_zero_record() {
    let cache = CacheManager::default();
    let calls = Arc::new(AtomicUsize::new(0));

    let query: Query<Value> = cache
        .read(
            dashboard("2026-01"),
            scripted(
                &calls,
                vec![
                    Err(TallyError::network("down")),
                    Err(TallyError::network("still down")),
                ],
            ),
        )
        .await;

    assert!(query.is_success());
    assert!(query.degraded);
    assert!(query.error.is_none());
    let summary: DashboardSummary = serde_json::from_value(query.data.unwrap()).unwrap();
    assert_eq!(summary.month, "2026-01");
    assert_eq!(summary.total_spend, 0.0);
    assert!(summary.top_category.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_surfaced_error_keeps_previous_data() {
    let cache = CacheManager::default();
    let calls = Arc::new(AtomicUsize::new(0));
    let key = CacheKey::new(Namespace::Trend);

    let _: Query<Value> = cache
        .read(key.clone(), counting(&calls, json!([1, 2]), Duration::ZERO))
        .await;
    cache.invalidate(Namespace::Trend);

    let query: Query<Value> = cache
        .read(
            key.clone(),
            scripted(&calls, vec![Err(TallyError::server(400, None))]),
        )
        .await;

    assert_eq!(query.status, EntryStatus::Error);
    assert_eq!(query.data, Some(json!([1, 2])));
}

#[tokio::test(start_paused = true)]
async fn test_invalidate_marks_only_its_namespace() {
    let cache = CacheManager::default();
    let calls = Arc::new(AtomicUsize::new(0));

    let _: Query<Value> = cache
        .read(dashboard("2026-01"), counting(&calls, json!({}), Duration::ZERO))
        .await;
    let _: Query<Value> = cache
        .read(recent(), counting(&calls, json!([]), Duration::ZERO))
        .await;
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    assert_eq!(cache.invalidate(Namespace::Dashboard), 1);
    // Invalidation alone does not fetch
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(cache.is_stale(&dashboard("2026-01")));
    assert!(!cache.is_stale(&recent()));

    let r: Query<Value> = cache
        .read(recent(), counting(&calls, json!([]), Duration::ZERO))
        .await;
    assert!(r.from_cache);

    let d: Query<Value> = cache
        .read(dashboard("2026-01"), counting(&calls, json!({}), Duration::ZERO))
        .await;
    assert!(!d.from_cache);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn test_response_after_invalidation_is_not_stored() {
    let cache = CacheManager::default();
    let calls = Arc::new(AtomicUsize::new(0));
    let key = dashboard("2026-02");

    let reader = {
        let cache = cache.clone();
        let key = key.clone();
        let fetcher = counting(&calls, json!({"total_spend": 1.0}), Duration::from_millis(100));
        tokio::spawn(async move { cache.read::<Value, _, _>(key, fetcher).await })
    };

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(cache.is_fetching(&key));
    cache.invalidate(Namespace::Dashboard);
    assert!(!cache.is_fetching(&key));

    let stale = reader.await.unwrap();
    assert!(stale.discarded);
    assert_eq!(stale.data, Some(json!({"total_spend": 1.0})));
    assert!(cache.is_stale(&key));
    assert_eq!(cache.statistics().discarded, 1);

    let fresh: Query<Value> = cache
        .read(key.clone(), counting(&calls, json!({"total_spend": 2.0}), Duration::ZERO))
        .await;
    assert!(!fresh.discarded);
    assert_eq!(fresh.data, Some(json!({"total_spend": 2.0})));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_invalidate_all_covers_every_namespace() {
    let cache = CacheManager::default();
    let calls = Arc::new(AtomicUsize::new(0));

    for key in [
        dashboard("2026-01"),
        recent(),
        CacheKey::new(Namespace::Profile),
    ] {
        let _: Query<Value> = cache
            .read(key, counting(&calls, json!({}), Duration::ZERO))
            .await;
    }

    assert_eq!(cache.invalidate_all(), 3);
    assert!(cache.is_stale(&CacheKey::new(Namespace::Profile)));
    assert!(cache.is_stale(&recent()));
}

#[tokio::test]
async fn test_peek_decodes_entry() {
    let cache = CacheManager::default();
    let calls = Arc::new(AtomicUsize::new(0));
    let key = CacheKey::new(Namespace::Trend);

    assert!(cache.peek::<Value>(&key).is_none());
    let _: Query<Value> = cache
        .read(key.clone(), counting(&calls, json!([{"month": "2026-01", "total_spend": 5.0}]), Duration::ZERO))
        .await;

    let peeked = cache.peek::<Vec<crate::models::TrendPoint>>(&key).unwrap();
    assert_eq!(peeked.data.unwrap()[0].total_spend, 5.0);
    assert_eq!(cache.keys(Namespace::Trend), vec![key]);
}
