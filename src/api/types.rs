//! Request and response bodies

use serde::{Deserialize, Serialize};

use crate::storage::UrlRecord;

/// `POST /shorten` body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShortenRequest {
    #[serde(default)]
    pub url: String,
    /// Days until the link expires; zero or negative means never
    #[serde(default)]
    pub expire_in_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortenResponse {
    pub short_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub original_url: String,
    pub created_at: String,
    pub expiration: i64,
    pub click_count: u64,
}

impl From<UrlRecord> for StatsResponse {
    fn from(record: UrlRecord) -> Self {
        Self {
            original_url: record.original_url,
            created_at: record.created_at,
            expiration: record.expiration,
            click_count: record.click_count,
        }
    }
}
