//! Local directory for one solution's files.

use kata_core::{Context, Error, Result};
use kata_model::Solution;
use kata_utils::write_atomic_string;
use std::fs;
use std::path::{Path, PathBuf};

/// `workspace/{track-slug}/{exercise-slug}/`
#[derive(Debug, Clone)]
pub struct SolutionDir {
    dir: PathBuf,
}

impl SolutionDir {
    #[must_use]
    pub fn new(ctx: &Context, solution: &Solution) -> Self {
        Self {
            dir: ctx.exercise_dir(&solution.track, &solution.exercise),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.dir
    }

    /// Absolute path for a (possibly nested) filename
    #[must_use]
    pub fn path(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    #[must_use]
    pub fn exists(&self, filename: &str) -> bool {
        self.path(filename).is_file()
    }

    /// Read a local file; `Ok(None)` when it does not exist
    pub fn read(&self, filename: &str) -> Result<Option<String>> {
        let path = self.path(filename);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::file_system(path, "read", e)),
        }
    }

    /// Atomically write a local file, creating parent directories
    pub fn write(&self, filename: &str, content: &str) -> Result<()> {
        write_atomic_string(&self.path(filename), content)
    }
}
