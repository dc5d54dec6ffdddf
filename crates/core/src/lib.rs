//! Core types shared by every kata crate.
//!
//! This crate carries the error taxonomy, the `Result` alias and the
//! [`Context`] object that is threaded through every constructor in the
//! workspace. Nothing here performs I/O.

pub mod constants;
pub mod context;
pub mod errors;
pub mod retry;

pub use context::Context;
pub use errors::{Error, Result};
pub use retry::RetryConfig;
