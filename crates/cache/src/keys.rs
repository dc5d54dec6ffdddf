//! Stable rendering of cache keys to filesystem paths

use sha2::{Digest, Sha256};

/// Cache key: namespace + HTTP method + path-with-query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub namespace: String,
    pub method: String,
    pub path: String,
}

impl CacheKey {
    #[must_use]
    pub fn new(
        namespace: impl Into<String>,
        method: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            method: method.into(),
            path: path.into(),
        }
    }

    /// Relative file path for this key. The path component is sanitized
    /// and truncated, with a content hash suffix so long query strings
    /// cannot collide or exceed filename limits.
    #[must_use]
    pub fn file_name(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.method.as_bytes());
        hasher.update(b"\0");
        hasher.update(self.path.as_bytes());
        let digest = hasher.finalize();
        let short_hash: String = digest[..8].iter().map(|b| format!("{b:02x}")).collect();

        let sanitized: String = self
            .path
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect();
        let stem: String = sanitized.trim_matches('-').chars().take(80).collect();

        format!(
            "{}/{}-{}-{}.json",
            self.namespace,
            self.method.to_lowercase(),
            stem,
            short_hash
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_key_renders_same_file() {
        let a = CacheKey::new("api", "GET", "/api/v2/tracks");
        let b = CacheKey::new("api", "GET", "/api/v2/tracks");
        assert_eq!(a.file_name(), b.file_name());
    }

    #[test]
    fn different_paths_render_different_files() {
        let a = CacheKey::new("api", "GET", "/api/v2/tracks");
        let b = CacheKey::new("api", "GET", "/api/v2/tracks/rust/exercises");
        assert_ne!(a.file_name(), b.file_name());
    }

    #[test]
    fn method_is_part_of_the_key() {
        let get = CacheKey::new("api", "GET", "/api/v2/solutions/abc");
        let patch = CacheKey::new("api", "PATCH", "/api/v2/solutions/abc");
        assert_ne!(get.file_name(), patch.file_name());
    }

    #[test]
    fn long_query_strings_stay_bounded() {
        let key = CacheKey::new("api", "GET", format!("/api?x={}", "y".repeat(500)));
        let name = key.file_name();
        let file = name.rsplit('/').next().unwrap();
        assert!(file.len() < 120);
    }
}
