//! Disk-backed cache store.
//!
//! One JSON file per key under the cache directory. Store unavailability
//! must never fail an entity read: a disabled cache is always-miss, read
//! errors degrade to a miss and write errors to a no-op, both logged.

use crate::entry::CacheEntry;
use crate::keys::CacheKey;
use kata_utils::write_atomic_string;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Handle to the response cache
#[derive(Debug, Clone)]
pub struct Cache {
    dir: Option<PathBuf>,
}

impl Cache {
    /// Cache backed by `dir`. The directory is created lazily on first
    /// write.
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self { dir: Some(dir) }
    }

    /// Cache with no backing store: every get misses, every set is a no-op
    #[must_use]
    pub fn disabled() -> Self {
        Self { dir: None }
    }

    /// Build from an optional directory, matching `Context::cache_dir`
    #[must_use]
    pub fn from_dir(dir: Option<PathBuf>) -> Self {
        match dir {
            Some(dir) => Self::new(dir),
            None => Self::disabled(),
        }
    }

    fn entry_path(&self, key: &CacheKey) -> Option<PathBuf> {
        self.dir.as_ref().map(|d| d.join(key.file_name()))
    }

    /// Fresh hit or `None`. Expired entries count as a miss.
    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<serde_json::Value> {
        let path = self.entry_path(key)?;
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cache read failed, treating as miss");
                return None;
            }
        };
        let entry: CacheEntry = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "corrupt cache entry, treating as miss");
                return None;
            }
        };
        if entry.is_expired() {
            tracing::debug!(path = %path.display(), "cache entry expired");
            return None;
        }
        Some(entry.value)
    }

    /// Write an entry, replacing any previous one. Failures are logged and
    /// swallowed; the cache is never load-bearing.
    pub fn set(&self, key: &CacheKey, value: serde_json::Value, ttl: Duration) {
        let Some(path) = self.entry_path(key) else {
            return;
        };
        let entry = CacheEntry::new(value, ttl);
        let content = match serde_json::to_string_pretty(&entry) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize cache entry");
                return;
            }
        };
        if let Err(e) = write_atomic_string(&path, &content) {
            tracing::warn!(path = %path.display(), error = %e, "cache write failed");
        }
    }

    /// Remove an entry; missing entries are fine
    pub fn delete(&self, key: &CacheKey) {
        let Some(path) = self.entry_path(key) else {
            return;
        };
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cache delete failed");
            }
        }
    }
}
