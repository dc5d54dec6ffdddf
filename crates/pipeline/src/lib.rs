//! Solution lifecycle pipeline: submit, complete, publish, update.
//!
//! Outcome protocol: `Ok(false)` is a normal negative outcome (failing
//! tests, aborted checks, declined overwrites); `Err` is reserved for
//! network, auth, protocol and programmer errors. Callers branch on the
//! boolean.

pub mod pipeline;
pub mod toolchain;

pub use pipeline::{Pipeline, SubmitOptions};
pub use toolchain::{CommandToolchain, Toolchain, ToolchainRegistry};
