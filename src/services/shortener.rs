//! Short URL orchestration
//!
//! Ties the code generator, the expiry calculator and the store together.
//! HTTP handlers only translate requests and responses around this type.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::config::ShortenerConfig;
use crate::errors::{Result, TinylinkError};
use crate::metrics_core::MetricsRecorder;
use crate::storage::{UrlRecord, UrlStore};
use crate::utils::{MAX_EXPIRE_IN_DAYS, generate_random_code, is_valid_short_code};

/// Result of a successful shorten call
#[derive(Debug, Clone)]
pub struct ShortenResult {
    pub record: UrlRecord,
    pub short_url: String,
}

pub struct ShortenerService {
    store: Arc<dyn UrlStore>,
    metrics: Arc<dyn MetricsRecorder>,
    config: ShortenerConfig,
}

impl ShortenerService {
    pub fn new(
        store: Arc<dyn UrlStore>,
        metrics: Arc<dyn MetricsRecorder>,
        config: ShortenerConfig,
    ) -> Self {
        Self {
            store,
            metrics,
            config,
        }
    }

    /// Prefix for short URLs: configured base wins over the request's own origin.
    pub fn base_url<'a>(&'a self, request_base: &'a str) -> &'a str {
        self.config
            .base_url
            .as_deref()
            .unwrap_or(request_base)
            .trim_end_matches('/')
    }

    /// Store `url` under a fresh code.
    ///
    /// A generated code that is already taken is replaced by a new one, up to
    /// `max_create_attempts` attempts in total.
    pub async fn shorten(
        &self,
        url: &str,
        expire_in_days: i64,
        request_base: &str,
    ) -> Result<ShortenResult> {
        // 原样保存，不做 trim
        if url.is_empty() {
            warn!("Shorten rejected: empty url");
            return Err(TinylinkError::validation("URL is required"));
        }
        if expire_in_days > MAX_EXPIRE_IN_DAYS {
            warn!("Shorten rejected: expire_in_days {} out of range", expire_in_days);
            return Err(TinylinkError::validation(format!(
                "expire_in_days must not exceed {}",
                MAX_EXPIRE_IN_DAYS
            )));
        }
        if self.config.code_length == 0 {
            return Err(TinylinkError::config("shortener.code_length must be at least 1"));
        }

        let attempts = self.config.max_create_attempts.max(1);
        for attempt in 1..=attempts {
            let code = generate_random_code(self.config.code_length).inspect_err(|e| {
                error!("Failed to generate short code: {}", e);
            })?;
            let record = UrlRecord::new(code, url.to_string(), expire_in_days, Utc::now());

            match self.store.create(&record).await {
                Ok(()) => {
                    let short_url =
                        format!("{}/{}", self.base_url(request_base), record.short_code);
                    info!(
                        "Short URL created: {} -> {} (expiration: {})",
                        record.short_code, record.original_url, record.expiration
                    );
                    self.metrics.inc_url_created();
                    return Ok(ShortenResult { record, short_url });
                }
                Err(TinylinkError::CodeConflict(_)) => {
                    warn!(
                        "Short code collision on attempt {}/{}: {}",
                        attempt, attempts, record.short_code
                    );
                }
                Err(e) => {
                    error!("CreateShortURL failed for {}: {}", record.short_code, e);
                    self.metrics.inc_store_error("CreateShortURL");
                    return Err(e);
                }
            }
        }

        error!("Gave up allocating a short code after {} attempts", attempts);
        self.metrics.inc_store_error("CreateShortURL");
        Err(TinylinkError::code_conflict(format!(
            "Could not allocate a unique short code after {} attempts",
            attempts
        )))
    }

    /// Look up the record a redirect should follow.
    pub async fn resolve(&self, code: &str) -> Result<UrlRecord> {
        self.lookup(code).await
    }

    /// Look up a record for the stats endpoint. Never mutates it.
    pub async fn stats(&self, code: &str) -> Result<UrlRecord> {
        let record = self.lookup(code).await?;
        self.metrics.inc_stats_retrieved();
        Ok(record)
    }

    async fn lookup(&self, code: &str) -> Result<UrlRecord> {
        if code.is_empty() {
            warn!("Lookup rejected: empty short code");
            return Err(TinylinkError::validation("Short code is required"));
        }

        // 不可能由生成器产生的短码，不查存储
        if !is_valid_short_code(code) {
            debug!("Invalid short code rejected: {}", code);
            self.metrics.inc_url_not_found();
            return Err(TinylinkError::not_found("URL not found"));
        }

        match self.store.get(code).await {
            Ok(record) => Ok(record),
            Err(e @ TinylinkError::NotFound(_)) => {
                warn!("Short code not found: {}", code);
                self.metrics.inc_url_not_found();
                Err(e)
            }
            Err(e) => {
                error!("GetURL failed for {}: {}", code, e);
                self.metrics.inc_store_error("GetURL");
                Err(e)
            }
        }
    }
}
