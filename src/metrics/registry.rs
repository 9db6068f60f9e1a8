//! Global metrics registry
//!
//! Defines all Prometheus metrics used in the application.

use once_cell::sync::Lazy;
use prometheus::{
    CounterVec, Encoder, HistogramOpts, HistogramVec, IntCounter, Opts, Registry, TextEncoder,
};

use crate::metrics_core::MetricsRecorder;

/// Global metrics instance
pub static METRICS: Lazy<Metrics> = Lazy::new(Metrics::new);

/// Application metrics container
pub struct Metrics {
    registry: Registry,

    /// Short URLs stored
    pub urls_created_total: IntCounter,
    /// Redirect responses by status code
    pub redirects_total: CounterVec,
    /// Lookups for unknown or expired codes
    pub not_found_total: IntCounter,
    /// Successful stats lookups
    pub stats_retrieved_total: IntCounter,
    /// Store failures by operation
    pub store_errors_total: CounterVec,
    /// Handler latency by endpoint, in milliseconds
    pub api_latency_ms: HistogramVec,
}

impl Metrics {
    fn new() -> Self {
        let registry = Registry::new();

        let urls_created_total =
            IntCounter::new("tinylink_urls_created_total", "Total short URLs created")
                .expect("Failed to create urls_created_total metric");

        let redirects_total = CounterVec::new(
            Opts::new(
                "tinylink_redirects_total",
                "Total number of redirects by status",
            ),
            &["status"],
        )
        .expect("Failed to create redirects_total metric");

        let not_found_total = IntCounter::new(
            "tinylink_url_not_found_total",
            "Total lookups for codes that do not exist",
        )
        .expect("Failed to create not_found_total metric");

        let stats_retrieved_total = IntCounter::new(
            "tinylink_stats_retrieved_total",
            "Total successful stats lookups",
        )
        .expect("Failed to create stats_retrieved_total metric");

        let store_errors_total = CounterVec::new(
            Opts::new(
                "tinylink_store_errors_total",
                "Total store failures by operation",
            ),
            &["operation"],
        )
        .expect("Failed to create store_errors_total metric");

        let api_latency_ms = HistogramVec::new(
            HistogramOpts::new("tinylink_api_latency_ms", "Handler latency in milliseconds")
                .buckets(vec![1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0]),
            &["endpoint"],
        )
        .expect("Failed to create api_latency_ms metric");

        registry
            .register(Box::new(urls_created_total.clone()))
            .expect("Failed to register urls_created_total");
        registry
            .register(Box::new(redirects_total.clone()))
            .expect("Failed to register redirects_total");
        registry
            .register(Box::new(not_found_total.clone()))
            .expect("Failed to register not_found_total");
        registry
            .register(Box::new(stats_retrieved_total.clone()))
            .expect("Failed to register stats_retrieved_total");
        registry
            .register(Box::new(store_errors_total.clone()))
            .expect("Failed to register store_errors_total");
        registry
            .register(Box::new(api_latency_ms.clone()))
            .expect("Failed to register api_latency_ms");

        Self {
            registry,
            urls_created_total,
            redirects_total,
            not_found_total,
            stats_retrieved_total,
            store_errors_total,
            api_latency_ms,
        }
    }

    /// Export metrics in Prometheus text format
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl MetricsRecorder for Metrics {
    fn inc_url_created(&self) {
        self.urls_created_total.inc();
    }

    fn inc_redirect(&self, status: &str) {
        self.redirects_total.with_label_values(&[status]).inc();
    }

    fn inc_url_not_found(&self) {
        self.not_found_total.inc();
    }

    fn inc_stats_retrieved(&self) {
        self.stats_retrieved_total.inc();
    }

    fn inc_store_error(&self, operation: &str) {
        self.store_errors_total.with_label_values(&[operation]).inc();
    }

    fn observe_api_latency(&self, endpoint: &str, millis: f64) {
        self.api_latency_ms
            .with_label_values(&[endpoint])
            .observe(millis);
    }
}

/// Wrapper that delegates to the global METRICS singleton.
///
/// `Lazy<T>` doesn't implement `Clone`, so this stands in for it behind
/// `Arc<dyn MetricsRecorder>`.
pub struct PrometheusMetricsWrapper;

impl PrometheusMetricsWrapper {
    pub fn arc() -> std::sync::Arc<dyn MetricsRecorder> {
        std::sync::Arc::new(Self)
    }
}

impl MetricsRecorder for PrometheusMetricsWrapper {
    fn inc_url_created(&self) {
        METRICS.inc_url_created();
    }

    fn inc_redirect(&self, status: &str) {
        METRICS.inc_redirect(status);
    }

    fn inc_url_not_found(&self) {
        METRICS.inc_url_not_found();
    }

    fn inc_stats_retrieved(&self) {
        METRICS.inc_stats_retrieved();
    }

    fn inc_store_error(&self, operation: &str) {
        METRICS.inc_store_error(operation);
    }

    fn observe_api_latency(&self, endpoint: &str, millis: f64) {
        METRICS.observe_api_latency(endpoint, millis);
    }
}
