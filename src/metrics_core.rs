//! Core metrics traits (always compiled, no feature gate).
//!
//! Every service takes an `Arc<dyn MetricsRecorder>`. Without the `metrics`
//! feature `NoopMetrics` is injected and each call compiles to nothing.

use std::sync::Arc;

/// Trait for recording application metrics.
///
/// All methods are no-op by default, allowing partial implementation.
/// Implementations must be thread-safe (Send + Sync).
#[allow(unused_variables)]
pub trait MetricsRecorder: Send + Sync {
    // ===== Shorten =====

    /// Record a newly stored short URL
    fn inc_url_created(&self) {}

    // ===== Redirect / Stats =====

    /// Record redirect response by HTTP status
    fn inc_redirect(&self, status: &str) {}

    /// Record a lookup for a code that does not exist
    fn inc_url_not_found(&self) {}

    /// Record a successful stats lookup
    fn inc_stats_retrieved(&self) {}

    // ===== Store =====

    /// Record a failed store call, labelled by operation name
    fn inc_store_error(&self, operation: &str) {}

    // ===== HTTP (timing middleware) =====

    /// Observe handler latency in milliseconds
    fn observe_api_latency(&self, endpoint: &str, millis: f64) {}
}

/// Noop metrics implementation for testing and non-metrics builds.
pub struct NoopMetrics;

impl MetricsRecorder for NoopMetrics {}

impl NoopMetrics {
    pub fn new() -> Self {
        Self
    }

    pub fn arc() -> Arc<dyn MetricsRecorder> {
        Arc::new(Self::new())
    }
}

impl Default for NoopMetrics {
    fn default() -> Self {
        Self::new()
    }
}
