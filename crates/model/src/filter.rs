//! Pure predicate composition over fetched entities.
//!
//! Every option is `None` (no constraint) or a value to match. Filters are
//! closed-world over currently fetched data: an absent underlying value
//! never satisfies a `true` filter and never fails a `false` one.

use crate::exercise::{Difficulty, Exercise};
use crate::track::Track;
use globset::Glob;
use kata_core::{Error, Result};

/// Match a boolean filter against a possibly-unknown value
pub(crate) fn check(filter: Option<bool>, value: Option<bool>) -> bool {
    match (filter, value) {
        (None, _) => true,
        (Some(wanted), Some(actual)) => wanted == actual,
        (Some(true), None) => false,
        (Some(false), None) => true,
    }
}

/// Glob-style slug match (`*` matches any run of characters)
pub(crate) fn glob_match(pattern: &str, text: &str) -> Result<bool> {
    let matcher = Glob::new(pattern)
        .map_err(|e| Error::configuration(format!("invalid slug pattern '{pattern}': {e}")))?
        .compile_matcher();
    Ok(matcher.is_match(text))
}

/// Filter options for track listings
#[derive(Debug, Clone, Default)]
pub struct TrackFilter {
    /// Glob pattern over the track slug
    pub slug: Option<String>,
    pub joined: Option<bool>,
    pub completed: Option<bool>,
}

impl TrackFilter {
    pub fn matches(&self, track: &Track) -> Result<bool> {
        if let Some(pattern) = &self.slug {
            if !glob_match(pattern, &track.slug)? {
                return Ok(false);
            }
        }
        Ok(check(self.joined, Some(track.joined))
            && check(self.completed, Some(track.completed())))
    }
}

/// Filter options for exercise listings
#[derive(Debug, Clone, Default)]
pub struct ExerciseFilter {
    /// Glob pattern over the exercise slug
    pub slug: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub unlocked: Option<bool>,
    pub started: Option<bool>,
    pub passing: Option<bool>,
    pub completed: Option<bool>,
}

impl ExerciseFilter {
    pub fn matches(&self, exercise: &Exercise) -> Result<bool> {
        if let Some(pattern) = &self.slug {
            if !glob_match(pattern, &exercise.slug)? {
                return Ok(false);
            }
        }
        if let Some(difficulty) = self.difficulty {
            if difficulty != exercise.difficulty {
                return Ok(false);
            }
        }
        let solution = exercise.solution.as_ref();
        let passing = solution
            .and_then(|s| s.iteration.as_ref())
            .map(|it| it.passing());
        let completed = solution.map(|s| s.completed());
        Ok(check(self.unlocked, Some(exercise.unlocked))
            && check(self.started, Some(exercise.started()))
            && check(self.passing, passing)
            && check(self.completed, completed))
    }
}
