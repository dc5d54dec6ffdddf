//! On-disk cache entry format

use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// One cached response. Immutable once written; refresh replaces the whole
/// entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Decoded JSON payload
    pub value: serde_json::Value,
    /// Seconds since the unix epoch at creation
    pub created_at: u64,
    /// TTL in seconds
    pub ttl_secs: u64,
}

impl CacheEntry {
    #[must_use]
    pub fn new(value: serde_json::Value, ttl: Duration) -> Self {
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            value,
            created_at,
            ttl_secs: ttl.as_secs(),
        }
    }

    /// An entry is expired once its TTL has elapsed. A clock that moved
    /// backwards past the creation time counts as expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        let now = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_secs(),
            Err(_) => return true,
        };
        if now < self.created_at {
            return true;
        }
        now - self.created_at > self.ttl_secs
    }
}
