//! Shared fixtures for the HTTP integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use tinylink::config::ShortenerConfig;
use tinylink::errors::{Result, TinylinkError};
use tinylink::metrics_core::MetricsRecorder;
use tinylink::services::{ClickTracker, ShortenerService};
use tinylink::storage::{MemoryStore, UrlRecord, UrlStore};

/// Memory store with switchable failures
#[derive(Default)]
pub struct FailingStore {
    inner: MemoryStore,
    pub fail_create: AtomicBool,
    pub fail_get: AtomicBool,
    pub fail_increment: AtomicBool,
    /// Number of upcoming `create` calls answered with `CodeConflict`
    pub conflicts: AtomicU32,
    pub create_calls: AtomicU32,
}

impl FailingStore {
    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }
}

#[async_trait]
impl UrlStore for FailingStore {
    async fn create(&self, record: &UrlRecord) -> Result<()> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(TinylinkError::store_write("injected create failure"));
        }
        let pending = self.conflicts.load(Ordering::SeqCst);
        if pending > 0 {
            self.conflicts.store(pending - 1, Ordering::SeqCst);
            return Err(TinylinkError::code_conflict("injected conflict"));
        }
        self.inner.create(record).await
    }

    async fn get(&self, code: &str) -> Result<UrlRecord> {
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(TinylinkError::store_read("injected get failure"));
        }
        self.inner.get(code).await
    }

    async fn increment_clicks(&self, code: &str) -> Result<()> {
        if self.fail_increment.load(Ordering::SeqCst) {
            return Err(TinylinkError::store_write("injected increment failure"));
        }
        self.inner.increment_clicks(code).await
    }

    fn backend_name(&self) -> &'static str {
        "failing"
    }
}

/// Metrics recorder that remembers what it was told
#[derive(Default)]
pub struct RecordingMetrics {
    pub created: AtomicU32,
    pub redirects: Mutex<Vec<String>>,
    pub store_errors: Mutex<Vec<String>>,
}

impl MetricsRecorder for RecordingMetrics {
    fn inc_url_created(&self) {
        self.created.fetch_add(1, Ordering::SeqCst);
    }

    fn inc_redirect(&self, status: &str) {
        self.redirects.lock().unwrap().push(status.to_string());
    }

    fn inc_store_error(&self, operation: &str) {
        self.store_errors.lock().unwrap().push(operation.to_string());
    }
}

pub struct TestContext {
    pub store: Arc<FailingStore>,
    pub metrics: Arc<RecordingMetrics>,
    pub shortener: Arc<ShortenerService>,
    pub tracker: Arc<ClickTracker>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(ShortenerConfig::default())
    }

    pub fn with_config(config: ShortenerConfig) -> Self {
        let store = Arc::new(FailingStore::default());
        let metrics = Arc::new(RecordingMetrics::default());
        let shortener = Arc::new(ShortenerService::new(
            store.clone(),
            metrics.clone(),
            config,
        ));
        let tracker = Arc::new(ClickTracker::new(store.clone(), metrics.clone()));
        Self {
            store,
            metrics,
            shortener,
            tracker,
        }
    }

    pub fn recorder(&self) -> Arc<dyn MetricsRecorder> {
        self.metrics.clone()
    }

    /// Insert a record directly, bypassing injected failures.
    pub async fn seed(&self, code: &str, url: &str) -> UrlRecord {
        let record = UrlRecord::new(code.to_string(), url.to_string(), 0, Utc::now());
        self.store.inner().create(&record).await.unwrap();
        record
    }

    pub async fn click_count(&self, code: &str) -> u64 {
        self.store.inner().get(code).await.unwrap().click_count
    }

    /// Wait for detached click increments to land.
    pub async fn wait_for_clicks(&self, code: &str, expected: u64) -> u64 {
        for _ in 0..200 {
            let clicks = self.click_count(code).await;
            if clicks >= expected {
                return clicks;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        self.click_count(code).await
    }

    /// Wait until `operation` shows up in the store error metric.
    pub async fn wait_for_store_error(&self, operation: &str) -> bool {
        for _ in 0..200 {
            if self
                .metrics
                .store_errors
                .lock()
                .unwrap()
                .iter()
                .any(|op| op == operation)
            {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        false
    }
}

/// Create a test app with every route and the request id middleware
macro_rules! tinylink_app {
    ($ctx:expr) => {{
        let ctx = &$ctx;
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(tinylink::api::middleware::RequestIdMiddleware)
                .app_data(actix_web::web::Data::from(ctx.shortener.clone()))
                .app_data(actix_web::web::Data::from(ctx.tracker.clone()))
                .app_data(actix_web::web::Data::new(ctx.recorder()))
                .configure(tinylink::api::app_routes),
        )
        .await
    }};
}
