//! Per-language toolchain capability.
//!
//! A toolchain runs external format/lint/test processes for one track.
//! A step returning `Ok(false)` means the step ran and failed (normal
//! negative outcome); `Err` means the process could not run at all.

use async_trait::async_trait;
use kata_core::{Error, Result};
use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;

#[async_trait]
pub trait Toolchain: Send + Sync {
    async fn setup(&self, dir: &Path) -> Result<bool>;
    async fn format(&self, dir: &Path) -> Result<bool>;
    async fn lint(&self, dir: &Path) -> Result<bool>;
    async fn test(&self, dir: &Path) -> Result<bool>;
}

/// Toolchain built from external commands; a step with no command is a
/// no-op success.
#[derive(Debug, Clone, Default)]
pub struct CommandToolchain {
    setup: Option<Vec<String>>,
    format: Option<Vec<String>>,
    lint: Option<Vec<String>>,
    test: Option<Vec<String>>,
}

impl CommandToolchain {
    #[must_use]
    pub fn new(
        setup: Option<Vec<String>>,
        format: Option<Vec<String>>,
        lint: Option<Vec<String>>,
        test: Option<Vec<String>>,
    ) -> Self {
        Self {
            setup,
            format,
            lint,
            test,
        }
    }

    /// The cargo toolchain for the rust track
    #[must_use]
    pub fn rust() -> Self {
        let argv = |parts: &[&str]| Some(parts.iter().map(ToString::to_string).collect());
        Self {
            setup: None,
            format: argv(&["cargo", "fmt"]),
            lint: argv(&["cargo", "clippy", "--", "-D", "warnings"]),
            test: argv(&["cargo", "test"]),
        }
    }

    async fn run(&self, dir: &Path, argv: &Option<Vec<String>>) -> Result<bool> {
        let Some(argv) = argv else {
            return Ok(true);
        };
        let Some((program, args)) = argv.split_first() else {
            return Ok(true);
        };
        let status = Command::new(program)
            .args(args)
            .current_dir(dir)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| {
                Error::command_execution(program.clone(), args.to_vec(), e.to_string(), None)
            })?;
        if !status.success() {
            tracing::info!(
                command = %argv.join(" "),
                exit_code = ?status.code(),
                "toolchain step failed"
            );
        }
        Ok(status.success())
    }
}

#[async_trait]
impl Toolchain for CommandToolchain {
    async fn setup(&self, dir: &Path) -> Result<bool> {
        self.run(dir, &self.setup).await
    }

    async fn format(&self, dir: &Path) -> Result<bool> {
        self.run(dir, &self.format).await
    }

    async fn lint(&self, dir: &Path) -> Result<bool> {
        self.run(dir, &self.lint).await
    }

    async fn test(&self, dir: &Path) -> Result<bool> {
        self.run(dir, &self.test).await
    }
}

/// Toolchains keyed by track slug. A track with no registered toolchain
/// skips pre-submit checks.
#[derive(Default)]
pub struct ToolchainRegistry {
    map: HashMap<String, Arc<dyn Toolchain>>,
}

impl ToolchainRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in toolchains
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("rust", Arc::new(CommandToolchain::rust()));
        registry
    }

    pub fn register(&mut self, track: impl Into<String>, toolchain: Arc<dyn Toolchain>) {
        self.map.insert(track.into(), toolchain);
    }

    #[must_use]
    pub fn get(&self, track: &str) -> Option<&Arc<dyn Toolchain>> {
        self.map.get(track)
    }
}
