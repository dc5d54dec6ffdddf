//! The explicitly constructed context threaded through every constructor.
//!
//! There is no global configuration singleton; whoever builds a client or a
//! pipeline builds a [`Context`] first and passes it down.

use crate::constants::{DEFAULT_CACHE_TTL, DEFAULT_ENDPOINT};
use crate::errors::{Error, Result};
use crate::retry::RetryConfig;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Everything the engine needs to talk to the remote and the local disk
#[derive(Debug, Clone)]
pub struct Context {
    /// Local workspace root; files land under `{track}/{exercise}/{name}`
    pub workspace: PathBuf,
    /// Remote endpoint base, e.g. `https://exercism.org`
    pub endpoint: Url,
    /// Bearer token for the remote API
    pub token: String,
    /// Retry policy for rate-limit retries and test-run polling
    pub retry: RetryConfig,
    /// Backing directory for the response cache; `None` disables caching
    pub cache_dir: Option<PathBuf>,
    /// TTL applied to cached catalog responses
    pub cache_ttl: Duration,
}

impl Context {
    /// Build a context with the default endpoint, retry policy and cache
    /// location. `token` must be non-empty.
    pub fn new(workspace: impl Into<PathBuf>, token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(Error::configuration("API token must not be empty"));
        }
        let endpoint = Url::parse(DEFAULT_ENDPOINT)
            .map_err(|e| Error::configuration(format!("invalid default endpoint: {e}")))?;
        Ok(Self {
            workspace: workspace.into(),
            endpoint,
            token,
            retry: RetryConfig::default(),
            cache_dir: dirs::cache_dir().map(|d| d.join("kata")),
            cache_ttl: DEFAULT_CACHE_TTL,
        })
    }

    /// Replace the remote endpoint
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self> {
        self.endpoint = Url::parse(endpoint)
            .map_err(|e| Error::configuration(format!("invalid endpoint '{endpoint}': {e}")))?;
        Ok(self)
    }

    /// Replace the retry policy
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Replace or disable the cache directory
    #[must_use]
    pub fn with_cache_dir(mut self, cache_dir: Option<PathBuf>) -> Self {
        self.cache_dir = cache_dir;
        self
    }

    /// Resolve a v2 API path against the endpoint
    pub fn api_url(&self, path: &str) -> Result<Url> {
        self.endpoint
            .join(path)
            .map_err(|e| Error::configuration(format!("invalid API path '{path}': {e}")))
    }

    /// Local directory for one exercise
    #[must_use]
    pub fn exercise_dir(&self, track: &str, exercise: &str) -> PathBuf {
        self.workspace.join(track).join(exercise)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_token_is_rejected() {
        let result = Context::new("/tmp/workspace", "");
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }

    #[test]
    fn exercise_dir_nests_track_then_exercise() {
        let ctx = Context::new("/tmp/workspace", "tok").unwrap();
        assert_eq!(
            ctx.exercise_dir("rust", "gigasecond"),
            PathBuf::from("/tmp/workspace/rust/gigasecond")
        );
    }

    #[test]
    fn bad_endpoint_is_a_configuration_error() {
        let ctx = Context::new("/tmp/workspace", "tok").unwrap();
        assert!(ctx.with_endpoint("not a url").is_err());
    }
}
