//! Shared utilities for the kata workspace.

pub mod atomic_file;
pub mod pool;
pub mod retry;

pub use atomic_file::{write_atomic, write_atomic_string};
pub use pool::{run_limited, run_limited_unordered};
pub use retry::{retry, Attempt};
