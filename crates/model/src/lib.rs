//! Entity model: Track, Exercise, Solution, Iteration.
//!
//! Entities are value-struct snapshots projected from cached remote JSON.
//! `sync()` replaces an entity's fields in place from a skip-cache fetch;
//! there is no shared mutable object graph.

pub mod exercise;
pub mod filter;
pub mod iteration;
pub mod solution;
pub mod track;

pub use exercise::{exercises, list_exercises, Difficulty, Exercise};
pub use filter::{ExerciseFilter, TrackFilter};
pub use iteration::{Iteration, TestsStatus};
pub use solution::{Solution, SolutionFiles, SolutionStatus};
pub use track::{list_tracks, tracks, Track};

use kata_core::{Error, Result};
use serde_json::Value;

/// Unwrap a cached fetch that cannot legitimately be "unavailable"
/// (Normal and SkipCache modes always produce a value).
pub(crate) fn required(value: Option<Value>) -> Result<Value> {
    value.ok_or_else(|| Error::configuration("fetch unexpectedly returned no value"))
}

