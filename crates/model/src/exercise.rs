//! Exercises within a track, joined with their sideloaded solutions.

use crate::filter::ExerciseFilter;
use crate::solution::Solution;
use kata_api::Client;
use kata_cache::CacheMode;
use kata_core::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(Error::configuration(format!(
                "unknown difficulty '{other}' (expected easy, medium or hard)"
            ))),
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        f.write_str(s)
    }
}

/// One unit of work within a track. A missing solution means "not
/// started"; once a solution exists it is never removed.
#[derive(Debug, Clone, PartialEq)]
pub struct Exercise {
    pub track: String,
    pub slug: String,
    pub difficulty: Difficulty,
    pub unlocked: bool,
    pub solution: Option<Solution>,
}

#[derive(Debug, Deserialize)]
struct ExercisePayload {
    slug: String,
    difficulty: Difficulty,
    #[serde(rename = "is_unlocked", default)]
    unlocked: bool,
}

impl Exercise {
    /// A solution exists for this exercise
    #[must_use]
    pub fn started(&self) -> bool {
        self.solution.is_some()
    }

    /// Re-list this track's exercises (skip-cache, solutions sideloaded)
    /// and replace fields. The incoming solution wins when present; an
    /// already-known solution is kept otherwise.
    pub async fn sync(&mut self, client: &Client) -> Result<()> {
        let mut fresh =
            list_exercises(client, &self.track, CacheMode::SkipCache, &ExerciseFilter::default())
                .await?
                .unwrap_or_default()
                .into_iter()
                .find(|e| e.slug == self.slug)
                .ok_or_else(|| Error::not_found("exercise", &self.slug))?;
        if fresh.solution.is_none() {
            fresh.solution = self.solution.take();
        }
        *self = fresh;
        Ok(())
    }
}

/// List a track's exercises through the cache in the given mode.
/// `Ok(None)` only in cache-only mode on a miss.
pub async fn list_exercises(
    client: &Client,
    track: &str,
    mode: CacheMode,
    filter: &ExerciseFilter,
) -> Result<Option<Vec<Exercise>>> {
    let Some(payload) = client.exercises(track, mode).await? else {
        return Ok(None);
    };

    // Sideloaded solutions, keyed by their exercise slug
    let mut solutions: HashMap<String, Solution> = HashMap::new();
    if let Some(raw) = payload.get("solutions").and_then(|s| s.as_array()) {
        for value in raw {
            let solution: Solution = serde_json::from_value(value.clone())?;
            solutions.insert(solution.exercise.clone(), solution);
        }
    }

    let raw = payload
        .get("exercises")
        .and_then(|e| e.as_array())
        .cloned()
        .unwrap_or_default();
    let mut out = Vec::with_capacity(raw.len());
    for value in raw {
        let parsed: ExercisePayload = serde_json::from_value(value)?;
        let exercise = Exercise {
            solution: solutions.remove(&parsed.slug),
            track: track.to_string(),
            slug: parsed.slug,
            difficulty: parsed.difficulty,
            unlocked: parsed.unlocked,
        };
        if filter.matches(&exercise)? {
            out.push(exercise);
        }
    }
    Ok(Some(out))
}

/// List exercises with normal cache semantics
pub async fn exercises(
    client: &Client,
    track: &str,
    filter: &ExerciseFilter,
) -> Result<Vec<Exercise>> {
    list_exercises(client, track, CacheMode::Normal, filter)
        .await?
        .ok_or_else(|| Error::configuration("exercise listing unexpectedly unavailable"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kata_api::testing::ScriptedTransport;
    use kata_api::Method;
    use serde_json::json;

    const EXERCISES_PATH: &str = "/api/v2/tracks/rust/exercises?sideload[]=solutions";

    fn exercises_payload() -> serde_json::Value {
        json!({
            "exercises": [
                { "slug": "gigasecond", "difficulty": "easy", "is_unlocked": true },
                { "slug": "forth", "difficulty": "hard", "is_unlocked": false },
                { "slug": "clock", "difficulty": "medium", "is_unlocked": true },
            ],
            "solutions": [
                {
                    "uuid": "sol-giga",
                    "status": "completed",
                    "num_iterations": 2,
                    "track_slug": "rust",
                    "exercise_slug": "gigasecond",
                    "latest_iteration": { "tests_status": "passed" },
                },
            ]
        })
    }

    #[tokio::test]
    async fn joins_sideloaded_solutions_by_slug() {
        let transport = ScriptedTransport::new();
        transport.route(Method::Get, EXERCISES_PATH, exercises_payload());
        let client = transport.client();

        let all = exercises(&client, "rust", &ExerciseFilter::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 3);

        let giga = all.iter().find(|e| e.slug == "gigasecond").unwrap();
        assert_eq!(giga.solution.as_ref().unwrap().uuid, "sol-giga");
        let forth = all.iter().find(|e| e.slug == "forth").unwrap();
        assert!(forth.solution.is_none());
    }

    #[tokio::test]
    async fn closed_world_filters() {
        let transport = ScriptedTransport::new();
        transport.route(Method::Get, EXERCISES_PATH, exercises_payload());
        let client = transport.client();

        // passing=true requires a known passing iteration
        let passing = exercises(
            &client,
            "rust",
            &ExerciseFilter {
                passing: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(passing.len(), 1);
        assert_eq!(passing[0].slug, "gigasecond");

        // passing=false never fails on exercises with no iteration at all
        let not_passing = exercises(
            &client,
            "rust",
            &ExerciseFilter {
                passing: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(not_passing.len(), 2);

        let started = exercises(
            &client,
            "rust",
            &ExerciseFilter {
                started: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(started.len(), 2);
    }

    #[tokio::test]
    async fn difficulty_and_unlocked_filters() {
        let transport = ScriptedTransport::new();
        transport.route(Method::Get, EXERCISES_PATH, exercises_payload());
        let client = transport.client();

        let hard = exercises(
            &client,
            "rust",
            &ExerciseFilter {
                difficulty: Some(Difficulty::Hard),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(hard.len(), 1);
        assert_eq!(hard[0].slug, "forth");

        let unlocked = exercises(
            &client,
            "rust",
            &ExerciseFilter {
                unlocked: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(unlocked.len(), 2);
    }

    #[tokio::test]
    async fn sync_keeps_a_known_solution_when_the_listing_drops_it() {
        let transport = ScriptedTransport::new();
        // First listing carries the solution, the second does not
        transport
            .route(Method::Get, EXERCISES_PATH, exercises_payload())
            .route(
                Method::Get,
                EXERCISES_PATH,
                json!({
                    "exercises": [
                        { "slug": "gigasecond", "difficulty": "easy", "is_unlocked": true },
                    ],
                    "solutions": []
                }),
            );
        let client = transport.client();

        let all = exercises(&client, "rust", &ExerciseFilter::default())
            .await
            .unwrap();
        let mut giga = all.into_iter().find(|e| e.slug == "gigasecond").unwrap();
        assert!(giga.solution.is_some());

        giga.sync(&client).await.unwrap();
        assert!(giga.solution.is_some(), "a solution is never removed");
    }
}
