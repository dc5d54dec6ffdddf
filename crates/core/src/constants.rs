//! Workspace-wide constants

use std::time::Duration;

/// Default remote endpoint
pub const DEFAULT_ENDPOINT: &str = "https://exercism.org";

/// Default TTL for cached catalog responses. The catalog changes rarely;
/// explicit sync() is the freshness mechanism, not expiry.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Concurrency ceiling for batched remote calls. The remote API allows
/// roughly 60 requests/minute; raising this risks 429 storms.
pub const MAX_REMOTE_CONCURRENCY: usize = 4;

/// Concurrency used when fetching pre-submission files one by one
pub const FILE_FETCH_CONCURRENCY: usize = 2;

/// Environment variable carrying the bearer token
pub const TOKEN_ENV: &str = "KATA_TOKEN";

/// Environment variable overriding the workspace directory
pub const WORKSPACE_ENV: &str = "KATA_WORKSPACE";

/// Environment variable overriding the remote endpoint
pub const ENDPOINT_ENV: &str = "KATA_ENDPOINT";
