//! tinylink - a minimal URL shortener service
//!
//! Accepts a long URL, hands back a short code, redirects the code to the
//! original URL and keeps a per-code click count.
//!
//! # Features
//! - **metrics**: Prometheus metrics export at `/_metrics`
//!
//! # Architecture
//! - `utils`: short code generator and expiry arithmetic
//! - `storage`: the `UrlStore` trait with memory and Redis backends
//! - `services`: shorten / lookup orchestration and click tracking
//! - `api`: HTTP handlers, routing and middleware
//! - `config`: TOML + environment configuration
//! - `runtime`: startup wiring and the HTTP server
//! - `system`: logging

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod metrics_core;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
