//! Remote learning tracks.

use crate::filter::TrackFilter;
use kata_api::Client;
use kata_cache::CacheMode;
use kata_core::{Error, Result};
use serde::Deserialize;

/// One course/curriculum on the remote. Exercises are fetched separately.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Track {
    pub slug: String,
    pub title: String,
    #[serde(rename = "is_joined", default)]
    pub joined: bool,
    #[serde(default)]
    pub num_exercises: u32,
    #[serde(rename = "num_completed_exercises", default)]
    pub num_completed: u32,
    #[serde(default)]
    pub has_notifications: bool,
}

impl Track {
    /// Joined and every exercise completed
    #[must_use]
    pub fn completed(&self) -> bool {
        self.joined && self.num_exercises == self.num_completed
    }

    /// Re-list all tracks (skip-cache), find this slug and replace fields.
    /// A vanished slug is a [`Error::NotFound`], distinct from "filtered
    /// out", so callers can prune local state.
    pub async fn sync(&mut self, client: &Client) -> Result<()> {
        let fresh = list_tracks(client, CacheMode::SkipCache, &TrackFilter::default())
            .await?
            .unwrap_or_default()
            .into_iter()
            .find(|t| t.slug == self.slug)
            .ok_or_else(|| Error::not_found("track", &self.slug))?;
        *self = fresh;
        Ok(())
    }
}

/// List tracks through the cache in the given mode. `Ok(None)` only in
/// cache-only mode on a miss.
pub async fn list_tracks(
    client: &Client,
    mode: CacheMode,
    filter: &TrackFilter,
) -> Result<Option<Vec<Track>>> {
    let Some(payload) = client.tracks(mode).await? else {
        return Ok(None);
    };
    let raw = payload
        .get("tracks")
        .and_then(|t| t.as_array())
        .cloned()
        .unwrap_or_default();
    let mut out = Vec::with_capacity(raw.len());
    for value in raw {
        let track: Track = serde_json::from_value(value)?;
        if filter.matches(&track)? {
            out.push(track);
        }
    }
    Ok(Some(out))
}

/// List tracks with normal cache semantics
pub async fn tracks(client: &Client, filter: &TrackFilter) -> Result<Vec<Track>> {
    list_tracks(client, CacheMode::Normal, filter)
        .await?
        .ok_or_else(|| Error::configuration("track listing unexpectedly unavailable"))
}
