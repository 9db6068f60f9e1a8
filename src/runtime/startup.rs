use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::StaticConfig;
use crate::metrics_core::MetricsRecorder;
use crate::services::{ClickTracker, ShortenerService};
use crate::storage::backend::spawn_sweeper;
use crate::storage::{MemoryStore, StoreFactory, UrlStore};

/// Everything the HTTP server shares across workers
pub struct StartupContext {
    pub store: Arc<dyn UrlStore>,
    pub metrics: Arc<dyn MetricsRecorder>,
    pub shortener: Arc<ShortenerService>,
    pub click_tracker: Arc<ClickTracker>,
    /// 仅内存后端有过期清扫任务
    pub sweeper: Option<JoinHandle<()>>,
}

fn build_metrics() -> Arc<dyn MetricsRecorder> {
    #[cfg(feature = "metrics")]
    {
        crate::metrics::PrometheusMetricsWrapper::arc()
    }
    #[cfg(not(feature = "metrics"))]
    {
        crate::metrics_core::NoopMetrics::arc()
    }
}

/// 准备服务器启动的上下文：存储、指标、业务服务
///
/// Must run inside a tokio runtime; the memory backend spawns its sweeper here.
pub fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let metrics = build_metrics();

    let mut sweeper = None;
    let store: Arc<dyn UrlStore> = if config.store.backend == "memory" {
        let memory = MemoryStore::new();
        let interval = Duration::from_secs(config.store.sweep_interval_secs.max(1));
        sweeper = Some(spawn_sweeper(memory.clone(), interval));
        info!(
            "Using store backend: memory (sweep every {}s)",
            interval.as_secs()
        );
        Arc::new(memory)
    } else {
        StoreFactory::create(&config.store).context("Failed to create store backend")?
    };

    let shortener = Arc::new(ShortenerService::new(
        Arc::clone(&store),
        Arc::clone(&metrics),
        config.shortener.clone(),
    ));
    let click_tracker = Arc::new(ClickTracker::new(Arc::clone(&store), Arc::clone(&metrics)));

    match &config.shortener.base_url {
        Some(base) => info!("Short URLs use base: {}", base),
        None => info!("Short URLs use the request host as base"),
    }

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext {
        store,
        metrics,
        shortener,
        click_tracker,
        sweeper,
    })
}
