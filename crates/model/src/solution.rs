//! The user's submitted work for one exercise.

use crate::iteration::Iteration;
use crate::required;
use kata_api::Client;
use kata_cache::CacheMode;
use kata_core::{Error, Result};
use serde::Deserialize;

/// Lifecycle status. Monotonic non-decreasing under normal API operation;
/// `out_of_date` is orthogonal and can flip true at any status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolutionStatus {
    Started,
    Iterated,
    Completed,
    Published,
}

impl std::fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SolutionStatus::Started => "started",
            SolutionStatus::Iterated => "iterated",
            SolutionStatus::Completed => "completed",
            SolutionStatus::Published => "published",
        };
        f.write_str(s)
    }
}

/// Per-solution categorized filename lists, from the remote file manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SolutionFiles {
    #[serde(default)]
    pub solution: Vec<String>,
    #[serde(default)]
    pub test: Vec<String>,
    #[serde(default)]
    pub editor: Vec<String>,
    #[serde(default)]
    pub example: Vec<String>,
}

/// Value-snapshot of one solution; rebuilt wholesale by [`Solution::sync`]
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Solution {
    pub uuid: String,
    pub status: SolutionStatus,
    #[serde(default)]
    pub num_iterations: u32,
    #[serde(rename = "is_out_of_date", default)]
    pub out_of_date: bool,
    #[serde(rename = "num_stars", default)]
    pub stars: u32,
    #[serde(rename = "num_comments", default)]
    pub comments: u32,
    #[serde(rename = "track_slug")]
    pub track: String,
    #[serde(rename = "exercise_slug")]
    pub exercise: String,
    #[serde(rename = "latest_iteration", default)]
    pub iteration: Option<Iteration>,
    /// File manifest, fetched lazily via [`Solution::files`]
    #[serde(skip)]
    pub files: Option<SolutionFiles>,
}

impl Solution {
    /// Parse the inner solution object of a remote payload
    pub fn from_payload(payload: &serde_json::Value) -> Result<Self> {
        let inner = payload.get("solution").cloned().ok_or_else(|| {
            let uuid = payload
                .get("uuid")
                .and_then(|u| u.as_str())
                .unwrap_or("<missing solution object>");
            Error::not_found("solution", uuid)
        })?;
        Ok(serde_json::from_value(inner)?)
    }

    /// At least one iteration exists
    #[must_use]
    pub fn iterated(&self) -> bool {
        self.status != SolutionStatus::Started
    }

    /// Completed or published
    #[must_use]
    pub fn completed(&self) -> bool {
        matches!(
            self.status,
            SolutionStatus::Completed | SolutionStatus::Published
        )
    }

    /// Fully published: the solution and its latest iteration both are
    #[must_use]
    pub fn published(&self) -> bool {
        self.status == SolutionStatus::Published
            && self.iteration.as_ref().is_some_and(|it| it.is_published)
    }

    /// Re-fetch by uuid (skip-cache) and replace every field in place,
    /// rebuilding the owned iteration.
    pub async fn sync(&mut self, client: &Client) -> Result<()> {
        let payload = required(client.solution(&self.uuid, CacheMode::SkipCache).await?)?;
        let mut fresh = Self::from_payload(&payload)?;
        if fresh.iteration.is_none() && fresh.iterated() {
            fresh.refresh_iteration(client).await?;
        }
        // The manifest is track/exercise-level data and survives a sync
        fresh.files = self.files.take();
        *self = fresh;
        Ok(())
    }

    /// Fetch the latest iteration and replace the owned one
    pub async fn refresh_iteration(&mut self, client: &Client) -> Result<()> {
        if !self.iterated() {
            self.iteration = None;
            return Ok(());
        }
        let payload = client.latest_iteration(&self.uuid).await?;
        let inner = payload
            .get("iteration")
            .cloned()
            .ok_or_else(|| Error::not_found("iteration", &self.uuid))?;
        self.iteration = Some(serde_json::from_value(inner)?);
        Ok(())
    }

    /// File manifest, fetched once and memoized
    pub async fn files(&mut self, client: &Client) -> Result<&SolutionFiles> {
        if self.files.is_none() {
            let config = client.file_config(&self.uuid).await?;
            let lists = config
                .get("files")
                .cloned()
                .unwrap_or(serde_json::Value::Null);
            let files: SolutionFiles = if lists.is_null() {
                SolutionFiles::default()
            } else {
                serde_json::from_value(lists)?
            };
            self.files = Some(files);
        }
        self.files
            .as_ref()
            .ok_or_else(|| Error::configuration("file manifest unavailable"))
    }
}
