use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, trace};

use crate::metrics_core::MetricsRecorder;
use crate::storage::UrlStore;

/// Records clicks without making the redirect wait for the store.
pub struct ClickTracker {
    store: Arc<dyn UrlStore>,
    metrics: Arc<dyn MetricsRecorder>,
}

impl ClickTracker {
    pub fn new(store: Arc<dyn UrlStore>, metrics: Arc<dyn MetricsRecorder>) -> Self {
        Self { store, metrics }
    }

    /// Spawn a detached increment for `code`.
    ///
    /// Failures are logged and counted inside the task; the handle only lets
    /// callers wait for completion.
    pub fn track(&self, code: &str) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        let metrics = Arc::clone(&self.metrics);
        let code = code.to_string();

        tokio::spawn(async move {
            match store.increment_clicks(&code).await {
                Ok(()) => trace!("Click recorded for {}", code),
                Err(e) => {
                    error!("IncrementClickCount failed for {}: {}", code, e);
                    metrics.inc_store_error("IncrementClickCount");
                }
            }
        })
    }
}
