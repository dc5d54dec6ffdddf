//! File sync engine: local workspace mapping, download and diff.
//!
//! The local filesystem is mutated only here, and only under the
//! confirmation policy (force flag or the [`Confirm`] capability).

pub mod confirm;
pub mod diff;
pub mod download;
pub mod paths;

pub use confirm::{AlwaysConfirm, Confirm, NeverConfirm};
pub use diff::{diff, FileDiff};
pub use download::{download, downloaded, DownloadReport};
pub use paths::SolutionDir;
