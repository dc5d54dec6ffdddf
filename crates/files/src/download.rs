//! Downloading remote solution files into the workspace.

use crate::confirm::Confirm;
use crate::paths::SolutionDir;
use kata_api::Client;
use kata_core::constants::FILE_FETCH_CONCURRENCY;
use kata_core::{Context, Result};
use kata_model::Solution;
use kata_utils::run_limited;
use std::collections::HashSet;

/// What a download did, per filename
#[derive(Debug, Default)]
pub struct DownloadReport {
    /// Files written (new or confirmed overwrites)
    pub written: Vec<String>,
    /// Files already byte-identical locally
    pub skipped: Vec<String>,
    /// Overwrites the user declined; partial success, not failure
    pub declined: Vec<String>,
}

impl DownloadReport {
    /// At least one overwrite was declined
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.declined.is_empty()
    }
}

/// True when at least one solution-category file exists locally
pub async fn downloaded(
    client: &Client,
    ctx: &Context,
    solution: &mut Solution,
) -> Result<bool> {
    let dir = SolutionDir::new(ctx, solution);
    let files = solution.files(client).await?;
    Ok(files.solution.iter().any(|name| dir.exists(name)))
}

/// Fetch the remote view of every file for this solution.
///
/// An iterated solution has a one-call bundle endpoint; before the first
/// submission files must be fetched one by one (bounded concurrency, to
/// respect the remote rate limit).
async fn remote_files(client: &Client, solution: &mut Solution) -> Result<Vec<(String, String)>> {
    if solution.iterated() {
        let payload = client.last_iteration_files(&solution.uuid).await?;
        let mut out = Vec::new();
        if let Some(files) = payload.get("files").and_then(|f| f.as_array()) {
            for file in files {
                let filename = file
                    .get("filename")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string();
                let content = file
                    .get("content")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string();
                if !filename.is_empty() {
                    out.push((filename, content));
                }
            }
        }
        return Ok(out);
    }

    let manifest = solution.files(client).await?;
    let mut names: Vec<String> = Vec::new();
    names.extend(manifest.solution.iter().cloned());
    names.extend(manifest.editor.iter().cloned());
    names.extend(manifest.test.iter().cloned());
    // A file may be listed under more than one manifest category; fetch
    // each name once, in dispatch order.
    let mut seen = HashSet::new();
    names.retain(|name| seen.insert(name.clone()));

    let uuid = solution.uuid.clone();
    let tasks = names.into_iter().map(|name| {
        let uuid = uuid.clone();
        async move {
            let content = client.file(&uuid, &name).await?;
            Ok::<(String, String), kata_core::Error>((name, content))
        }
    });
    let fetched = run_limited(FILE_FETCH_CONCURRENCY, tasks).await;
    fetched.into_iter().collect()
}

/// Download every remote file, asking [`Confirm`] before overwriting a
/// differing local file unless `force`. A byte-identical local file is
/// never rewritten.
pub async fn download(
    client: &Client,
    ctx: &Context,
    solution: &mut Solution,
    confirm: &dyn Confirm,
    force: bool,
) -> Result<DownloadReport> {
    solution.sync(client).await?;
    let dir = SolutionDir::new(ctx, solution);
    let files = remote_files(client, solution).await?;

    let mut report = DownloadReport::default();
    for (filename, content) in files {
        match dir.read(&filename)? {
            Some(local) if local == content => {
                report.skipped.push(filename);
            }
            Some(_) => {
                let message = format!(
                    "overwrite {} with the remote version?",
                    dir.path(&filename).display()
                );
                if force || confirm.confirm(&message) {
                    dir.write(&filename, &content)?;
                    report.written.push(filename);
                } else {
                    tracing::info!(%filename, "overwrite declined, keeping local file");
                    report.declined.push(filename);
                }
            }
            None => {
                dir.write(&filename, &content)?;
                report.written.push(filename);
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::{AlwaysConfirm, NeverConfirm};
    use kata_api::testing::ScriptedTransport;
    use kata_api::Method;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn context(dir: &TempDir) -> Context {
        Context::new(dir.path(), "token")
            .unwrap()
            .with_cache_dir(None)
    }

    fn started_solution() -> Solution {
        Solution::from_payload(&json!({
            "solution": {
                "uuid": "sol-1",
                "status": "started",
                "track_slug": "rust",
                "exercise_slug": "gigasecond",
            }
        }))
        .unwrap()
    }

    fn script_started() -> std::sync::Arc<ScriptedTransport> {
        let transport = ScriptedTransport::new();
        transport
            .route(
                Method::Get,
                "/api/v2/solutions/sol-1",
                json!({ "solution": {
                    "uuid": "sol-1",
                    "status": "started",
                    "track_slug": "rust",
                    "exercise_slug": "gigasecond",
                }}),
            )
            .route(
                Method::Get,
                "/api/v1/solutions/sol-1/files/.exercism/config.json",
                json!({ "files": {
                    "solution": ["src/lib.rs"],
                    "test": ["tests/gigasecond.rs"],
                    "editor": [],
                }}),
            )
            .route(
                Method::Get,
                "/api/v1/solutions/sol-1/files/src/lib.rs",
                json!("pub fn after() {}"),
            )
            .route(
                Method::Get,
                "/api/v1/solutions/sol-1/files/tests/gigasecond.rs",
                json!("#[test] fn t() {}"),
            );
        transport
    }

    #[tokio::test]
    async fn pre_submission_download_fetches_files_individually() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let transport = script_started();
        let client = transport.client();
        let mut solution = started_solution();

        let report = download(&client, &ctx, &mut solution, &AlwaysConfirm, false)
            .await
            .unwrap();

        assert_eq!(report.written.len(), 2);
        assert!(!report.is_partial());
        let content =
            fs::read_to_string(dir.path().join("rust/gigasecond/src/lib.rs")).unwrap();
        assert_eq!(content, "pub fn after() {}");
    }

    #[tokio::test]
    async fn identical_local_content_is_never_rewritten() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let transport = script_started();
        let client = transport.client();
        let mut solution = started_solution();

        download(&client, &ctx, &mut solution, &AlwaysConfirm, false)
            .await
            .unwrap();
        let report = download(&client, &ctx, &mut solution, &NeverConfirm, false)
            .await
            .unwrap();

        assert!(report.written.is_empty());
        assert_eq!(report.skipped.len(), 2);
        assert!(!report.is_partial());
    }

    #[tokio::test]
    async fn declined_overwrite_keeps_the_local_file() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let transport = script_started();
        let client = transport.client();
        let mut solution = started_solution();

        let local = dir.path().join("rust/gigasecond/src/lib.rs");
        fs::create_dir_all(local.parent().unwrap()).unwrap();
        fs::write(&local, "my edits").unwrap();

        let report = download(&client, &ctx, &mut solution, &NeverConfirm, false)
            .await
            .unwrap();

        assert!(report.is_partial());
        assert_eq!(report.declined, vec!["src/lib.rs"]);
        assert_eq!(fs::read_to_string(&local).unwrap(), "my edits");
    }

    #[tokio::test]
    async fn force_overwrites_without_asking() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let transport = script_started();
        let client = transport.client();
        let mut solution = started_solution();

        let local = dir.path().join("rust/gigasecond/src/lib.rs");
        fs::create_dir_all(local.parent().unwrap()).unwrap();
        fs::write(&local, "my edits").unwrap();

        let report = download(&client, &ctx, &mut solution, &NeverConfirm, true)
            .await
            .unwrap();

        assert!(report.written.contains(&"src/lib.rs".to_string()));
        assert_eq!(fs::read_to_string(&local).unwrap(), "pub fn after() {}");
    }

    #[tokio::test]
    async fn iterated_solution_uses_the_bundle_endpoint() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let transport = ScriptedTransport::new();
        transport
            .route(
                Method::Get,
                "/api/v2/solutions/sol-1",
                json!({ "solution": {
                    "uuid": "sol-1",
                    "status": "iterated",
                    "num_iterations": 1,
                    "track_slug": "rust",
                    "exercise_slug": "gigasecond",
                    "latest_iteration": { "tests_status": "passed" },
                }}),
            )
            .route(
                Method::Get,
                "/api/v2/solutions/sol-1/last_iteration_files",
                json!({ "files": [
                    { "filename": "src/lib.rs", "content": "iterated body" },
                ]}),
            );
        let client = transport.client();
        let mut solution = started_solution();

        let report = download(&client, &ctx, &mut solution, &AlwaysConfirm, false)
            .await
            .unwrap();

        assert_eq!(report.written, vec!["src/lib.rs"]);
        // sync + bundle, no per-file fetches
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn file_in_two_manifest_categories_is_fetched_once() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let transport = ScriptedTransport::new();
        transport
            .route(
                Method::Get,
                "/api/v2/solutions/sol-1",
                json!({ "solution": {
                    "uuid": "sol-1",
                    "status": "started",
                    "track_slug": "rust",
                    "exercise_slug": "gigasecond",
                }}),
            )
            .route(
                Method::Get,
                "/api/v1/solutions/sol-1/files/.exercism/config.json",
                json!({ "files": {
                    "solution": ["src/lib.rs"],
                    "test": [],
                    "editor": ["src/lib.rs"],
                }}),
            )
            .route(
                Method::Get,
                "/api/v1/solutions/sol-1/files/src/lib.rs",
                json!("pub fn after() {}"),
            );
        let client = transport.client();
        let mut solution = started_solution();

        let report = download(&client, &ctx, &mut solution, &AlwaysConfirm, false)
            .await
            .unwrap();

        assert_eq!(report.written, vec!["src/lib.rs"]);
        assert!(report.skipped.is_empty());
        // sync + manifest + a single file fetch
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test]
    async fn downloaded_probes_solution_files() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let transport = script_started();
        let client = transport.client();
        let mut solution = started_solution();

        assert!(!downloaded(&client, &ctx, &mut solution).await.unwrap());
        download(&client, &ctx, &mut solution, &AlwaysConfirm, false)
            .await
            .unwrap();
        assert!(downloaded(&client, &ctx, &mut solution).await.unwrap());
    }
}
