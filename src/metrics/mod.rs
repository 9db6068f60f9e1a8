//! Prometheus metrics module
//!
//! # Feature
//! This module requires the `metrics` feature to be enabled.

mod registry;

pub use registry::{METRICS, Metrics, PrometheusMetricsWrapper};
