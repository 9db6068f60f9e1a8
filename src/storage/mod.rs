use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::StoreConfig;
use crate::errors::{Result, TinylinkError};

pub mod backend;
pub mod models;

pub use backend::{MemoryStore, RedisStore};
pub use models::UrlRecord;

/// Key-value table of URL records, keyed by short code.
///
/// Implementations must make `increment_clicks` atomic: concurrent calls on the
/// same code each add exactly one, with no read-modify-write window.
#[async_trait]
pub trait UrlStore: Send + Sync {
    /// Insert a new record. Fails with `CodeConflict` if the code is taken and
    /// `StoreWrite` on backend failure.
    async fn create(&self, record: &UrlRecord) -> Result<()>;

    /// Point lookup. Expired or missing records are `NotFound`; other backend
    /// failures are `StoreRead`.
    async fn get(&self, code: &str) -> Result<UrlRecord>;

    /// Add one to `clickCount`. Missing records are `NotFound`; other backend
    /// failures are `StoreWrite`.
    async fn increment_clicks(&self, code: &str) -> Result<()>;

    fn backend_name(&self) -> &'static str;
}

pub struct StoreFactory;

impl StoreFactory {
    pub fn create(config: &StoreConfig) -> Result<Arc<dyn UrlStore>> {
        let store: Arc<dyn UrlStore> = match config.backend.as_str() {
            "memory" => Arc::new(MemoryStore::new()),
            "redis" => Arc::new(RedisStore::new(&config.redis.url, &config.redis.key_prefix)?),
            other => {
                return Err(TinylinkError::config(format!(
                    "Unknown store backend '{}'. Supported backends: memory, redis",
                    other
                )));
            }
        };

        info!("Using store backend: {}", store.backend_name());
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;

    #[test]
    fn test_factory_memory_backend() {
        let config = StoreConfig::default();
        let store = StoreFactory::create(&config).unwrap();
        assert_eq!(store.backend_name(), "memory");
    }

    #[test]
    fn test_factory_rejects_unknown_backend() {
        let config = StoreConfig {
            backend: "dynamo".to_string(),
            ..StoreConfig::default()
        };
        let err = StoreFactory::create(&config).err().unwrap();
        assert!(matches!(err, TinylinkError::Config(_)));
    }

    #[test]
    fn test_factory_redis_backend_is_lazy() {
        // 仅解析 URL，不会连接服务器
        let mut config = StoreConfig {
            backend: "redis".to_string(),
            ..StoreConfig::default()
        };
        config.redis.url = "redis://127.0.0.1:1/".to_string();
        let store = StoreFactory::create(&config).unwrap();
        assert_eq!(store.backend_name(), "redis");
    }
}
