//! Typed endpoint methods, with the response cache composed in front of
//! catalog GETs. Mutating calls never touch the cache.

use crate::transport::{HttpTransport, Method, Transport};
use kata_cache::{Cache, CacheKey, CacheMode};
use kata_core::{Context, Result};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

/// One file in a submission upload
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionFile {
    pub filename: String,
    pub content: String,
}

/// Remote API client
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    cache: Cache,
    cache_ttl: Duration,
}

impl Client {
    /// Production client: HTTP transport and disk cache from the context
    #[must_use]
    pub fn new(ctx: &Context) -> Self {
        Self {
            transport: Arc::new(HttpTransport::new(ctx)),
            cache: Cache::from_dir(ctx.cache_dir.clone()),
            cache_ttl: ctx.cache_ttl,
        }
    }

    /// Client over an arbitrary transport; tests script this
    #[must_use]
    pub fn with_transport(transport: Arc<dyn Transport>, cache: Cache, cache_ttl: Duration) -> Self {
        Self {
            transport,
            cache,
            cache_ttl,
        }
    }

    /// Drop the cached entry for a GET path
    pub fn evict(&self, path: &str) {
        self.cache.delete(&CacheKey::new("api", "GET", path));
    }

    /// Cache-composed GET. `Ok(None)` only in [`CacheMode::CacheOnly`] on
    /// a miss ("unavailable"); the other modes always produce a value or
    /// an error.
    pub async fn get_cached(&self, path: &str, mode: CacheMode) -> Result<Option<Value>> {
        let key = CacheKey::new("api", "GET", path);
        match mode {
            CacheMode::CacheOnly => Ok(self.cache.get(&key)),
            CacheMode::Normal => {
                if let Some(hit) = self.cache.get(&key) {
                    tracing::debug!(path, "cache hit");
                    return Ok(Some(hit));
                }
                let value = self.transport.call(Method::Get, path, None, &[]).await?;
                self.cache.set(&key, value.clone(), self.cache_ttl);
                Ok(Some(value))
            }
            CacheMode::SkipCache => {
                let value = self.transport.call(Method::Get, path, None, &[]).await?;
                self.cache.set(&key, value.clone(), self.cache_ttl);
                Ok(Some(value))
            }
        }
    }

    // --- catalog (cached GETs) ---

    pub async fn validate_token(&self) -> Result<Value> {
        self.transport
            .call(Method::Get, "/api/v2/validate_token", None, &[])
            .await
    }

    pub async fn user(&self, mode: CacheMode) -> Result<Option<Value>> {
        self.get_cached("/api/user", mode).await
    }

    pub async fn reputation(&self, mode: CacheMode) -> Result<Option<Value>> {
        self.get_cached("/api/v2/reputation", mode).await
    }

    pub async fn tracks(&self, mode: CacheMode) -> Result<Option<Value>> {
        self.get_cached("/api/v2/tracks", mode).await
    }

    pub async fn exercises(&self, track: &str, mode: CacheMode) -> Result<Option<Value>> {
        let path = format!("/api/v2/tracks/{track}/exercises?sideload[]=solutions");
        self.get_cached(&path, mode).await
    }

    pub async fn solution(&self, uuid: &str, mode: CacheMode) -> Result<Option<Value>> {
        let path = format!("/api/v2/solutions/{uuid}");
        self.get_cached(&path, mode).await
    }

    // --- lifecycle mutations (never cached) ---

    pub async fn start_exercise(&self, track: &str, exercise: &str) -> Result<Value> {
        let path = format!("/api/v2/tracks/{track}/exercises/{exercise}/start");
        self.transport.call(Method::Patch, &path, None, &[]).await
    }

    /// Upload files as a new submission. `allow_duplicate` tolerates the
    /// server's stuck duplicate-submission state (used by the force-clear
    /// step).
    pub async fn submit_files(
        &self,
        uuid: &str,
        files: &[SubmissionFile],
        allow_duplicate: bool,
    ) -> Result<Value> {
        let path = format!("/api/v2/solutions/{uuid}/submissions");
        let allow: &[&str] = if allow_duplicate {
            &["duplicate_submission"]
        } else {
            &[]
        };
        let body = json!({ "files": files });
        self.transport
            .call(Method::Post, &path, Some(body), allow)
            .await
    }

    pub async fn test_run(&self, uuid: &str, submission: &str) -> Result<Value> {
        let path = format!("/api/v2/solutions/{uuid}/submissions/{submission}/test_run");
        self.transport.call(Method::Get, &path, None, &[]).await
    }

    pub async fn create_iteration(&self, uuid: &str) -> Result<Value> {
        let path = format!("/api/v2/solutions/{uuid}/iterations");
        self.transport.call(Method::Post, &path, None, &[]).await
    }

    pub async fn latest_iteration(&self, uuid: &str) -> Result<Value> {
        let path = format!("/api/v2/solutions/{uuid}/iterations/latest");
        self.transport.call(Method::Get, &path, None, &[]).await
    }

    pub async fn publish_iteration(&self, uuid: &str) -> Result<Value> {
        let path = format!("/api/v2/solutions/{uuid}/published_iteration");
        self.transport.call(Method::Patch, &path, None, &[]).await
    }

    pub async fn complete_solution(&self, uuid: &str) -> Result<Value> {
        let path = format!("/api/v2/solutions/{uuid}/complete");
        self.transport.call(Method::Patch, &path, None, &[]).await
    }

    pub async fn publish_solution(&self, uuid: &str) -> Result<Value> {
        let path = format!("/api/v2/solutions/{uuid}/publish");
        self.transport.call(Method::Patch, &path, None, &[]).await
    }

    pub async fn sync_solution(&self, uuid: &str) -> Result<Value> {
        let path = format!("/api/v2/solutions/{uuid}/sync");
        self.transport.call(Method::Patch, &path, None, &[]).await
    }

    // --- files ---

    /// Per-solution file manifest (the v1 config blob)
    pub async fn file_config(&self, uuid: &str) -> Result<Value> {
        let path = format!("/api/v1/solutions/{uuid}/files/.exercism/config.json");
        self.transport.call(Method::Get, &path, None, &[]).await
    }

    /// Raw content of one file
    pub async fn file(&self, uuid: &str, filename: &str) -> Result<String> {
        let path = format!("/api/v1/solutions/{uuid}/files/{filename}");
        self.transport.call_raw(&path).await
    }

    /// One-call bundle of the latest iteration's files
    pub async fn last_iteration_files(&self, uuid: &str) -> Result<Value> {
        let path = format!("/api/v2/solutions/{uuid}/last_iteration_files");
        self.transport.call(Method::Get, &path, None, &[]).await
    }
}
