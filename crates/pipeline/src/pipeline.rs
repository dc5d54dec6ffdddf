//! The per-solution lifecycle state machine.

use crate::toolchain::ToolchainRegistry;
use kata_api::{Client, SubmissionFile};
use kata_cache::CacheMode;
use kata_core::{Context, Error, Result};
use kata_files::{diff, download, downloaded, Confirm, SolutionDir};
use kata_model::{list_exercises, Exercise, ExerciseFilter, Solution};
use kata_utils::{retry, Attempt};
use std::collections::HashSet;

/// Options for [`Pipeline::submit`]
#[derive(Debug, Clone, Default)]
pub struct SubmitOptions {
    /// Skip pre-submit checks and clear any stuck server-side submission
    pub force: bool,
}

/// Drives solutions through submit → test run → iteration → complete →
/// publish. Strict step ordering is enforced by sequential awaits;
/// batched sub-operations go through the bounded worker pool inside the
/// file sync engine.
pub struct Pipeline<'a> {
    client: &'a Client,
    ctx: &'a Context,
    toolchains: &'a ToolchainRegistry,
    confirm: &'a dyn Confirm,
}

impl<'a> Pipeline<'a> {
    #[must_use]
    pub fn new(
        client: &'a Client,
        ctx: &'a Context,
        toolchains: &'a ToolchainRegistry,
        confirm: &'a dyn Confirm,
    ) -> Self {
        Self {
            client,
            ctx,
            toolchains,
            confirm,
        }
    }

    /// Start an exercise: server-side start, then download the files
    pub async fn start(&self, track: &str, exercise: &str) -> Result<Solution> {
        let payload = self.client.start_exercise(track, exercise).await?;
        let mut solution = Solution::from_payload(&payload)?;
        download(self.client, self.ctx, &mut solution, self.confirm, false).await?;
        Ok(solution)
    }

    /// Submit the local files as a new iteration. `Ok(false)` covers every
    /// normal negative outcome: failed checks, no submission accepted,
    /// failing or timed-out tests.
    pub async fn submit(&self, solution: &mut Solution, opts: &SubmitOptions) -> Result<bool> {
        // Setup: make sure the files exist locally at all
        if !downloaded(self.client, self.ctx, solution).await? {
            download(self.client, self.ctx, solution, self.confirm, opts.force).await?;
        }

        if !opts.force && !self.run_checks(solution).await? {
            return Ok(false);
        }

        // Short-circuit: nothing changed since the last iteration
        if solution.iterated() {
            let diffs = diff(self.client, self.ctx, solution, None).await?;
            if diffs.iter().all(|d| !d.changed) {
                tracing::info!(
                    uuid = %solution.uuid,
                    "local files match the last iteration, nothing to submit"
                );
                return Ok(true);
            }
        }

        if opts.force {
            self.clear_placeholder(solution).await?;
        }

        let Some(submission) = self.upload(solution).await? else {
            tracing::warn!(uuid = %solution.uuid, "remote accepted no submission");
            return Ok(false);
        };

        let Some(status) = self.poll_test_run(solution, &submission).await? else {
            tracing::warn!(
                uuid = %solution.uuid,
                %submission,
                "test run still queued after the retry budget"
            );
            return Ok(false);
        };
        if status != "pass" {
            tracing::info!(uuid = %solution.uuid, %status, "test run did not pass");
            return Ok(false);
        }

        // Convert the submission into a durable iteration
        let payload = self.client.create_iteration(&solution.uuid).await?;
        if payload.get("iteration").is_none() {
            return Err(Error::not_found("iteration", &solution.uuid));
        }
        solution.sync(self.client).await?;
        Ok(true)
    }

    /// Run setup, format, lint and test for the solution's track. Tracks
    /// with no registered toolchain pass trivially.
    async fn run_checks(&self, solution: &Solution) -> Result<bool> {
        let Some(toolchain) = self.toolchains.get(&solution.track) else {
            return Ok(true);
        };
        let dir = SolutionDir::new(self.ctx, solution);
        if !toolchain.setup(dir.root()).await? {
            tracing::info!(uuid = %solution.uuid, "toolchain setup failed");
            return Ok(false);
        }
        if !toolchain.format(dir.root()).await? {
            tracing::info!(uuid = %solution.uuid, "formatting check failed");
            return Ok(false);
        }
        if !toolchain.lint(dir.root()).await? {
            tracing::info!(uuid = %solution.uuid, "lint check failed");
            return Ok(false);
        }
        if !toolchain.test(dir.root()).await? {
            tracing::info!(uuid = %solution.uuid, "local tests failed");
            return Ok(false);
        }
        Ok(true)
    }

    /// Empty submission to clear a stuck duplicate-submission state on the
    /// server. Remote rejections are tolerated here.
    async fn clear_placeholder(&self, solution: &Solution) -> Result<()> {
        match self.client.submit_files(&solution.uuid, &[], true).await {
            Ok(_) => Ok(()),
            Err(Error::Api {
                error_type,
                message,
            }) => {
                tracing::debug!(%error_type, %message, "placeholder clear rejected, continuing");
                Ok(())
            }
            Err(other) => Err(other),
        }
    }

    /// Upload the local solution files; `Ok(None)` when the remote did not
    /// hand back a submission uuid.
    async fn upload(&self, solution: &mut Solution) -> Result<Option<String>> {
        let dir = SolutionDir::new(self.ctx, solution);
        let manifest = solution.files(self.client).await?.clone();
        let mut files = Vec::with_capacity(manifest.solution.len());
        for name in &manifest.solution {
            let Some(content) = dir.read(name)? else {
                continue;
            };
            files.push(SubmissionFile {
                filename: name.clone(),
                content,
            });
        }
        let payload = self
            .client
            .submit_files(&solution.uuid, &files, false)
            .await?;
        Ok(payload
            .get("submission")
            .and_then(|s| s.get("uuid"))
            .and_then(|u| u.as_str())
            .map(ToString::to_string))
    }

    /// Poll the test run until it leaves the queue or the budget runs out.
    /// `Ok(None)` means the retry budget was exhausted.
    async fn poll_test_run(
        &self,
        solution: &Solution,
        submission: &str,
    ) -> Result<Option<String>> {
        let client = self.client;
        let uuid = solution.uuid.as_str();
        retry(&self.ctx.retry, || async move {
            let payload = client.test_run(uuid, submission).await?;
            let status = payload
                .get("test_run")
                .and_then(|t| t.get("status"))
                .and_then(|s| s.as_str());
            match status {
                None | Some("queued") => Ok(Attempt::Pending),
                Some(terminal) => Ok(Attempt::Ready(terminal.to_string())),
            }
        })
        .await
    }

    /// Mark the exercise's solution complete. Idempotent: an already
    /// completed solution performs no network mutation. On success the
    /// track's exercise list is re-synced to pick up newly unlocked
    /// exercises.
    pub async fn complete(&self, exercise: &mut Exercise) -> Result<bool> {
        let Some(solution) = exercise.solution.as_mut() else {
            tracing::warn!(exercise = %exercise.slug, "nothing to complete, no solution");
            return Ok(false);
        };
        if solution.completed() {
            return Ok(true);
        }
        if !solution.iterated() {
            tracing::warn!(
                uuid = %solution.uuid,
                "solution has no iteration yet, submit before completing"
            );
            return Ok(false);
        }

        let track = solution.track.clone();
        let before = list_exercises(
            self.client,
            &track,
            CacheMode::Normal,
            &ExerciseFilter::default(),
        )
        .await?
        .unwrap_or_default();
        let before_unlocked: HashSet<String> = before
            .iter()
            .filter(|e| e.unlocked)
            .map(|e| e.slug.clone())
            .collect();

        self.client.complete_solution(&solution.uuid).await?;
        solution.sync(self.client).await?;

        let after = list_exercises(
            self.client,
            &track,
            CacheMode::SkipCache,
            &ExerciseFilter::default(),
        )
        .await?
        .unwrap_or_default();
        for fresh in &after {
            if fresh.unlocked && !before_unlocked.contains(&fresh.slug) {
                tracing::info!(%track, exercise = %fresh.slug, "exercise unlocked");
            }
        }
        if let Some(fresh) = after.into_iter().find(|e| e.slug == exercise.slug) {
            exercise.unlocked = fresh.unlocked;
            exercise.difficulty = fresh.difficulty;
        }
        Ok(true)
    }

    /// Publish the solution and its latest iteration. Idempotent: a fully
    /// published solution performs no network mutation. Requires the
    /// solution to be completed first.
    pub async fn publish(&self, solution: &mut Solution) -> Result<bool> {
        if solution.published() {
            return Ok(true);
        }
        if !solution.completed() {
            tracing::warn!(uuid = %solution.uuid, "complete the solution before publishing");
            return Ok(false);
        }
        self.client.publish_solution(&solution.uuid).await?;
        self.client.publish_iteration(&solution.uuid).await?;
        solution.sync(self.client).await?;
        Ok(true)
    }

    /// Bring an out-of-date solution up to the latest exercise version.
    /// Reports success even when the refreshed tests are failing; that
    /// outcome is logged as a degraded success, not returned as failure.
    pub async fn update(&self, solution: &mut Solution) -> Result<bool> {
        if !solution.out_of_date {
            tracing::warn!(uuid = %solution.uuid, "solution is not out of date, nothing to update");
            return Ok(true);
        }
        self.client.sync_solution(&solution.uuid).await?;
        solution.sync(self.client).await?;
        if solution.iteration.as_ref().is_some_and(|it| it.failing()) {
            tracing::warn!(
                uuid = %solution.uuid,
                "solution updated but its tests are failing"
            );
        }
        Ok(true)
    }
}
