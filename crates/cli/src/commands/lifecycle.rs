//! Per-exercise lifecycle commands, thin wrappers over the pipeline.

use crate::terminal::TerminalConfirm;
use kata_api::Client;
use kata_core::Context;
use kata_files as files;
use kata_model::{exercises, Exercise, ExerciseFilter, Solution};
use kata_pipeline::{Pipeline, SubmitOptions, ToolchainRegistry};

async fn find_exercise(client: &Client, track: &str, slug: &str) -> eyre::Result<Exercise> {
    exercises(client, track, &ExerciseFilter::default())
        .await?
        .into_iter()
        .find(|e| e.slug == slug)
        .ok_or_else(|| eyre::eyre!("no exercise '{slug}' in track '{track}'"))
}

async fn find_solution(client: &Client, track: &str, slug: &str) -> eyre::Result<Solution> {
    find_exercise(client, track, slug)
        .await?
        .solution
        .ok_or_else(|| eyre::eyre!("'{track}/{slug}' has not been started yet; run `kata start`"))
}

pub async fn start(ctx: &Context, track: &str, exercise: &str) -> eyre::Result<()> {
    let client = Client::new(ctx);
    let toolchains = ToolchainRegistry::with_defaults();
    let pipeline = Pipeline::new(&client, ctx, &toolchains, &TerminalConfirm);
    let solution = pipeline.start(track, exercise).await?;
    println!(
        "started {track}/{exercise} in {}",
        ctx.exercise_dir(track, exercise).display()
    );
    tracing::debug!(uuid = %solution.uuid, "exercise started");
    Ok(())
}

pub async fn download(ctx: &Context, track: &str, exercise: &str, force: bool) -> eyre::Result<()> {
    let client = Client::new(ctx);
    let mut solution = find_solution(&client, track, exercise).await?;
    let report = files::download(&client, ctx, &mut solution, &TerminalConfirm, force).await?;
    println!(
        "{} written, {} unchanged, {} kept local",
        report.written.len(),
        report.skipped.len(),
        report.declined.len()
    );
    Ok(())
}

pub async fn submit(ctx: &Context, track: &str, exercise: &str, force: bool) -> eyre::Result<()> {
    let client = Client::new(ctx);
    let toolchains = ToolchainRegistry::with_defaults();
    let pipeline = Pipeline::new(&client, ctx, &toolchains, &TerminalConfirm);
    let mut solution = find_solution(&client, track, exercise).await?;
    if pipeline.submit(&mut solution, &SubmitOptions { force }).await? {
        println!("submitted {track}/{exercise}");
    } else {
        println!("not submitted");
    }
    Ok(())
}

pub async fn complete(ctx: &Context, track: &str, exercise: &str) -> eyre::Result<()> {
    let client = Client::new(ctx);
    let toolchains = ToolchainRegistry::with_defaults();
    let pipeline = Pipeline::new(&client, ctx, &toolchains, &TerminalConfirm);
    let mut ex = find_exercise(&client, track, exercise).await?;
    if pipeline.complete(&mut ex).await? {
        println!("completed {track}/{exercise}");
    } else {
        println!("not completed");
    }
    Ok(())
}

pub async fn publish(ctx: &Context, track: &str, exercise: &str) -> eyre::Result<()> {
    let client = Client::new(ctx);
    let toolchains = ToolchainRegistry::with_defaults();
    let pipeline = Pipeline::new(&client, ctx, &toolchains, &TerminalConfirm);
    let mut solution = find_solution(&client, track, exercise).await?;
    if pipeline.publish(&mut solution).await? {
        println!("published {track}/{exercise}");
    } else {
        println!("not published");
    }
    Ok(())
}

pub async fn update(ctx: &Context, track: &str, exercise: &str) -> eyre::Result<()> {
    let client = Client::new(ctx);
    let toolchains = ToolchainRegistry::with_defaults();
    let pipeline = Pipeline::new(&client, ctx, &toolchains, &TerminalConfirm);
    let mut solution = find_solution(&client, track, exercise).await?;
    pipeline.update(&mut solution).await?;
    println!("updated {track}/{exercise}");
    Ok(())
}

pub async fn diff(
    ctx: &Context,
    track: &str,
    exercise: &str,
    tool: Option<&str>,
) -> eyre::Result<()> {
    let client = Client::new(ctx);
    let mut solution = find_solution(&client, track, exercise).await?;
    let diffs = files::diff(&client, ctx, &mut solution, tool).await?;
    for entry in diffs {
        let marker = if entry.changed { "M" } else { " " };
        println!("{marker} {}", entry.filename);
    }
    Ok(())
}
