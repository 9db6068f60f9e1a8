use chrono::{DateTime, SecondsFormat, Utc};

use crate::utils::{expiry_from, is_expired};

/// Persisted attribute names
pub mod fields {
    pub const SHORT_CODE: &str = "shortCode";
    pub const ORIGINAL_URL: &str = "originalURL";
    pub const CREATED_AT: &str = "createdAt";
    pub const EXPIRATION: &str = "expiration";
    pub const CLICK_COUNT: &str = "clickCount";
}

/// A short code and the URL it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRecord {
    pub short_code: String,
    pub original_url: String,
    /// RFC 3339, UTC
    pub created_at: String,
    /// Unix seconds, 0 = never expires
    pub expiration: i64,
    pub click_count: u64,
}

impl UrlRecord {
    /// Build a fresh record created at `now`, expiring `expire_in_days` days later.
    ///
    /// `created_at` and `expiration` come from the same clock reading, so a
    /// non-zero expiration is always exactly `created_at + days * 86400`.
    pub fn new(
        short_code: String,
        original_url: String,
        expire_in_days: i64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            short_code,
            original_url,
            created_at: now.to_rfc3339_opts(SecondsFormat::Secs, true),
            expiration: expiry_from(now, expire_in_days),
            click_count: 0,
        }
    }

    pub fn is_expired_at(&self, now: i64) -> bool {
        is_expired(self.expiration, now)
    }
}
