//! Read-only catalog commands: tracks, exercises, whoami.

use kata_api::Client;
use kata_cache::CacheMode;
use kata_core::Context;
use kata_model::{list_exercises, list_tracks, ExerciseFilter, TrackFilter};

pub async fn tracks(
    ctx: &Context,
    slug: Option<String>,
    joined: Option<bool>,
    completed: Option<bool>,
    offline: bool,
) -> eyre::Result<()> {
    let client = Client::new(ctx);
    let filter = TrackFilter {
        slug,
        joined,
        completed,
    };
    let mode = if offline {
        CacheMode::CacheOnly
    } else {
        CacheMode::Normal
    };
    let Some(tracks) = list_tracks(&client, mode, &filter).await? else {
        eyre::bail!("track listing is not cached; run without --offline first");
    };
    for track in tracks {
        let membership = if track.joined { "joined" } else { "      " };
        println!(
            "{:<24} {membership} {:>3}/{:<3} {}",
            track.slug, track.num_completed, track.num_exercises, track.title
        );
    }
    Ok(())
}

pub async fn exercises(
    ctx: &Context,
    track: &str,
    filter: ExerciseFilter,
    offline: bool,
) -> eyre::Result<()> {
    let client = Client::new(ctx);
    let mode = if offline {
        CacheMode::CacheOnly
    } else {
        CacheMode::Normal
    };
    let Some(exercises) = list_exercises(&client, track, mode, &filter).await? else {
        eyre::bail!("exercise listing for '{track}' is not cached; run without --offline first");
    };
    for exercise in exercises {
        let lock = if exercise.unlocked { " " } else { "*" };
        let state = match &exercise.solution {
            None => "",
            Some(s) if s.published() => "published",
            Some(s) if s.completed() => "completed",
            Some(s) if s.iterated() => "iterated",
            Some(_) => "started",
        };
        let difficulty = exercise.difficulty.to_string();
        println!("{lock}{:<24} {difficulty:<6} {state}", exercise.slug);
    }
    Ok(())
}

pub async fn whoami(ctx: &Context) -> eyre::Result<()> {
    let client = Client::new(ctx);
    client.validate_token().await?;
    let user = client.user(CacheMode::SkipCache).await?;
    let handle = user
        .as_ref()
        .and_then(|u| u.get("user"))
        .and_then(|u| u.get("handle"))
        .and_then(|h| h.as_str());
    match handle {
        Some(handle) => println!("{handle} @ {}", ctx.endpoint),
        None => println!("token valid @ {}", ctx.endpoint),
    }
    let reputation = client
        .reputation(CacheMode::SkipCache)
        .await?
        .as_ref()
        .and_then(|r| r.get("meta"))
        .and_then(|m| m.get("total_reputation"))
        .and_then(|t| t.as_u64());
    if let Some(points) = reputation {
        println!("reputation: {points}");
    }
    Ok(())
}
