//! Expiration timestamps
//!
//! An expiration of `0` means the record never expires. Any other value is an
//! absolute Unix timestamp in seconds, which the store uses for TTL deletion.

use chrono::{DateTime, Utc};

pub const SECONDS_PER_DAY: i64 = 86_400;

/// Largest accepted `expire_in_days` (about 10,000 years).
///
/// Keeps expirations well inside what Redis accepts for `EXPIREAT` and what a
/// Lua number represents exactly (2^53).
pub const MAX_EXPIRE_IN_DAYS: i64 = 3_650_000;

/// Expiration for a record created now and kept for `days` days.
pub fn expiry_for(days: i64) -> i64 {
    expiry_from(Utc::now(), days)
}

/// Expiration for a record created at `now` and kept for `days` days.
///
/// `days <= 0` yields `0` (no expiration).
pub fn expiry_from(now: DateTime<Utc>, days: i64) -> i64 {
    if days <= 0 {
        return 0;
    }
    now.timestamp()
        .saturating_add(days.saturating_mul(SECONDS_PER_DAY))
}

/// Whether an expiration timestamp has passed at `now` (Unix seconds).
#[inline]
pub fn is_expired(expiration: i64, now: i64) -> bool {
    expiration != 0 && expiration <= now
}
