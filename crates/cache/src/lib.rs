//! TTL response cache.
//!
//! Keys are (namespace, HTTP method, path-with-query); values are opaque
//! decoded JSON payloads. Entries are immutable once written and replaced
//! wholesale on refresh. A cache without a backing directory degrades to
//! always-miss and never fails a read.

pub mod entry;
pub mod keys;
pub mod store;

pub use entry::CacheEntry;
pub use keys::CacheKey;
pub use store::Cache;

/// How a cached fetch consults the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheMode {
    /// Fresh hit wins; miss or expiry fetches remote and writes through
    Normal,
    /// Always fetch remote and overwrite the cache (used by sync())
    SkipCache,
    /// Fresh hit or "unavailable"; never touches the network
    CacheOnly,
}
