//! Store contract tests
//!
//! Run against `StoreFactory` output so the trait object is what gets exercised.

use std::sync::Arc;

use chrono::Utc;
use tinylink::config::StoreConfig;
use tinylink::errors::TinylinkError;
use tinylink::storage::{StoreFactory, UrlRecord, UrlStore};

fn memory_store() -> Arc<dyn UrlStore> {
    StoreFactory::create(&StoreConfig::default()).unwrap()
}

/// 创建测试用的 UrlRecord
fn record(code: &str, days: i64) -> UrlRecord {
    UrlRecord::new(
        code.to_string(),
        format!("https://{}.example.com", code),
        days,
        Utc::now(),
    )
}

#[tokio::test]
async fn test_create_then_get() {
    let store = memory_store();
    let created = record("abcde", 7);
    store.create(&created).await.unwrap();

    let fetched = store.get("abcde").await.unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.click_count, 0);
}

#[tokio::test]
async fn test_create_is_conditional() {
    let store = memory_store();
    store.create(&record("abcde", 0)).await.unwrap();

    let err = store.create(&record("abcde", 1)).await.unwrap_err();
    assert!(matches!(err, TinylinkError::CodeConflict(_)));
    assert_eq!(store.get("abcde").await.unwrap().expiration, 0);
}

#[tokio::test]
async fn test_missing_code() {
    let store = memory_store();
    assert!(matches!(
        store.get("zzzzz").await.unwrap_err(),
        TinylinkError::NotFound(_)
    ));
    assert!(matches!(
        store.increment_clicks("zzzzz").await.unwrap_err(),
        TinylinkError::NotFound(_)
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_increment_is_atomic_across_threads() {
    let store = memory_store();
    store.create(&record("hot01", 0)).await.unwrap();

    let handles: Vec<_> = (0..500)
        .map(|_| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.increment_clicks("hot01").await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(store.get("hot01").await.unwrap().click_count, 500);
}

#[tokio::test]
async fn test_increment_leaves_other_fields_alone() {
    let store = memory_store();
    let created = record("abcde", 3);
    store.create(&created).await.unwrap();
    store.increment_clicks("abcde").await.unwrap();

    let fetched = store.get("abcde").await.unwrap();
    assert_eq!(fetched.click_count, 1);
    assert_eq!(fetched.original_url, created.original_url);
    assert_eq!(fetched.created_at, created.created_at);
    assert_eq!(fetched.expiration, created.expiration);
}

/// 需要本地 Redis：`cargo test -- --ignored`，地址可用 TINYLINK_TEST_REDIS_URL 覆盖
#[tokio::test]
#[ignore]
async fn test_redis_store_contract() {
    use tinylink::storage::RedisStore;

    let url = std::env::var("TINYLINK_TEST_REDIS_URL")
        .unwrap_or_else(|_| "redis://127.0.0.1:6379/".to_string());
    let prefix = format!("tinylink:test:{}:", Utc::now().timestamp_micros());
    let store = RedisStore::new(&url, &prefix).unwrap();

    let created = record("rds01", 1);
    store.create(&created).await.unwrap();
    assert!(matches!(
        store.create(&record("rds01", 0)).await.unwrap_err(),
        TinylinkError::CodeConflict(_)
    ));
    assert_eq!(store.get("rds01").await.unwrap(), created);

    store.increment_clicks("rds01").await.unwrap();
    store.increment_clicks("rds01").await.unwrap();
    assert_eq!(store.get("rds01").await.unwrap().click_count, 2);
    assert!(matches!(
        store.increment_clicks("rds02").await.unwrap_err(),
        TinylinkError::NotFound(_)
    ));

    // EXPIREAT 拒绝的时间戳不能留下没有 TTL 的记录
    let mut unbounded = record("rds03", 0);
    unbounded.expiration = i64::MAX;
    assert!(matches!(
        store.create(&unbounded).await.unwrap_err(),
        TinylinkError::StoreWrite(_)
    ));
    assert!(matches!(
        store.get("rds03").await.unwrap_err(),
        TinylinkError::NotFound(_)
    ));
}
