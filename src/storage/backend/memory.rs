use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::errors::{Result, TinylinkError};
use crate::storage::{UrlRecord, UrlStore};

/// In-process URL table.
///
/// Expired records are invisible to `get`/`increment_clicks` immediately and are
/// physically removed by [`MemoryStore::sweep_expired`].
#[derive(Default, Clone)]
pub struct MemoryStore {
    inner: Arc<DashMap<String, UrlRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
        }
    }

    /// Remove every record whose expiration is at or before `now` (Unix seconds).
    /// Returns how many records were removed.
    pub fn sweep_expired(&self, now: i64) -> usize {
        let before = self.inner.len();
        self.inner.retain(|_, record| !record.is_expired_at(now));
        before.saturating_sub(self.inner.len())
    }

    /// Number of stored records, expired ones included until swept.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[async_trait]
impl UrlStore for MemoryStore {
    async fn create(&self, record: &UrlRecord) -> Result<()> {
        let now = Utc::now().timestamp();
        match self.inner.entry(record.short_code.clone()) {
            Entry::Occupied(mut slot) => {
                // 已过期但尚未清扫的记录视同不存在
                if slot.get().is_expired_at(now) {
                    slot.insert(record.clone());
                    trace!("MemoryStore: replaced expired record {}", record.short_code);
                    Ok(())
                } else {
                    Err(TinylinkError::code_conflict(format!(
                        "Short code '{}' already exists",
                        record.short_code
                    )))
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                trace!("MemoryStore: created {}", record.short_code);
                Ok(())
            }
        }
    }

    async fn get(&self, code: &str) -> Result<UrlRecord> {
        let now = Utc::now().timestamp();
        match self.inner.get(code) {
            Some(record) if !record.is_expired_at(now) => Ok(record.value().clone()),
            _ => Err(TinylinkError::not_found("URL not found")),
        }
    }

    async fn increment_clicks(&self, code: &str) -> Result<()> {
        let now = Utc::now().timestamp();
        // get_mut 持有分片写锁，自增不会丢失更新
        match self.inner.get_mut(code) {
            Some(mut record) if !record.is_expired_at(now) => {
                record.click_count = record.click_count.saturating_add(1);
                Ok(())
            }
            _ => Err(TinylinkError::not_found("URL not found")),
        }
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

/// Periodically remove expired records from a [`MemoryStore`].
pub fn spawn_sweeper(store: MemoryStore, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // 第一次 tick 立即返回，跳过
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = store.sweep_expired(Utc::now().timestamp());
            if removed > 0 {
                debug!("MemoryStore sweeper removed {} expired records", removed);
            }
        }
    })
}
