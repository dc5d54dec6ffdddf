//! Explicit cache refresh: re-fetch catalog listings or one solution.

use kata_api::Client;
use kata_cache::CacheMode;
use kata_core::constants::MAX_REMOTE_CONCURRENCY;
use kata_core::Context;
use kata_model::{list_exercises, list_tracks, ExerciseFilter, Solution, TrackFilter};
use kata_utils::run_limited;

pub async fn sync(ctx: &Context, track: &str, exercise: Option<&str>) -> eyre::Result<()> {
    let client = Client::new(ctx);

    if let Some(slug) = exercise {
        let mut ex = list_exercises(&client, track, CacheMode::SkipCache, &ExerciseFilter::default())
            .await?
            .unwrap_or_default()
            .into_iter()
            .find(|e| e.slug == slug)
            .ok_or_else(|| eyre::eyre!("no exercise '{slug}' in track '{track}'"))?;
        if let Some(solution) = ex.solution.as_mut() {
            solution.sync(&client).await?;
            println!("synced {track}/{slug} ({})", solution.status);
        } else {
            println!("synced {track}/{slug} (not started)");
        }
        return Ok(());
    }

    list_tracks(&client, CacheMode::SkipCache, &TrackFilter::default()).await?;
    let exercises =
        list_exercises(&client, track, CacheMode::SkipCache, &ExerciseFilter::default())
            .await?
            .unwrap_or_default();

    // Refresh every started solution, bounded by the remote rate limit
    let solutions: Vec<Solution> = exercises
        .iter()
        .filter_map(|e| e.solution.clone())
        .collect();
    let total = solutions.len();
    let client_ref = &client;
    let tasks = solutions.into_iter().map(|mut solution| async move {
        let outcome = solution.sync(client_ref).await;
        (solution.uuid, outcome)
    });
    for (uuid, outcome) in run_limited(MAX_REMOTE_CONCURRENCY, tasks).await {
        if let Err(error) = outcome {
            tracing::warn!(%uuid, %error, "solution refresh failed");
        }
    }

    println!(
        "synced {track} ({} exercises, {total} solutions)",
        exercises.len()
    );
    Ok(())
}
