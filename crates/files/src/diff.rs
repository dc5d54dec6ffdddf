//! Comparing the remote view of a solution against the workspace.

use crate::paths::SolutionDir;
use kata_api::Client;
use kata_core::{Context, Error, Result};
use kata_model::Solution;
use std::collections::BTreeMap;
use std::io::Write;
use tempfile::NamedTempFile;
use tokio::process::Command;

/// Comparison result for one filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub filename: String,
    pub changed: bool,
}

/// Remote contents by filename: the latest iteration's files, or nothing
/// if the solution was never iterated.
async fn remote_view(client: &Client, solution: &Solution) -> Result<BTreeMap<String, String>> {
    let mut view = BTreeMap::new();
    if !solution.iterated() {
        return Ok(view);
    }
    let payload = client.last_iteration_files(&solution.uuid).await?;
    if let Some(files) = payload.get("files").and_then(|f| f.as_array()) {
        for file in files {
            let (Some(filename), Some(content)) = (
                file.get("filename").and_then(|v| v.as_str()),
                file.get("content").and_then(|v| v.as_str()),
            ) else {
                continue;
            };
            view.insert(filename.to_string(), content.to_string());
        }
    }
    Ok(view)
}

/// Compare remote vs local for every filename present on either side.
/// With `tool`, launch it per differing file; the remote side is
/// materialized to a temporary file that is removed on every exit path,
/// including tool-launch failure.
pub async fn diff(
    client: &Client,
    ctx: &Context,
    solution: &mut Solution,
    tool: Option<&str>,
) -> Result<Vec<FileDiff>> {
    let dir = SolutionDir::new(ctx, solution);
    let remote = remote_view(client, solution).await?;

    // Union of remote filenames and the local solution-file list
    let mut names: Vec<String> = remote.keys().cloned().collect();
    for name in &solution.files(client).await?.solution {
        if !names.contains(name) {
            names.push(name.clone());
        }
    }

    let mut diffs = Vec::with_capacity(names.len());
    for filename in names {
        let remote_content = remote.get(&filename).map(String::as_str).unwrap_or("");
        let local_content = dir.read(&filename)?.unwrap_or_default();
        let changed = remote_content != local_content;
        if changed {
            if let Some(tool) = tool {
                launch_diff_tool(tool, remote_content, &dir, &filename).await?;
            }
        }
        diffs.push(FileDiff { filename, changed });
    }
    Ok(diffs)
}

/// The temp file guard drops (and deletes) whether the tool launches,
/// fails to launch, or exits nonzero.
async fn launch_diff_tool(
    tool: &str,
    remote_content: &str,
    dir: &SolutionDir,
    filename: &str,
) -> Result<()> {
    let mut remote_file = NamedTempFile::new()
        .map_err(|e| Error::file_system(std::env::temp_dir(), "create temporary file", e))?;
    remote_file
        .write_all(remote_content.as_bytes())
        .map_err(|e| Error::file_system(remote_file.path().to_path_buf(), "write", e))?;

    let local = dir.path(filename);
    let status = Command::new(tool)
        .arg(remote_file.path())
        .arg(&local)
        .status()
        .await
        .map_err(|e| {
            Error::command_execution(tool, vec![filename.to_string()], e.to_string(), None)
        })?;

    // Diff tools conventionally exit 1 when files differ; only log
    tracing::debug!(tool, filename, status = ?status.code(), "diff tool finished");
    Ok(())
}
