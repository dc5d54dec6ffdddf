//! Overwrite-confirmation capability.
//!
//! The core calls this synchronously before touching an existing local
//! file; the CLI supplies a terminal prompt, tests supply a scripted one.

pub trait Confirm: Send + Sync {
    /// Ask whether the described overwrite may proceed
    fn confirm(&self, message: &str) -> bool;
}

/// Accepts every overwrite
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _message: &str) -> bool {
        true
    }
}

/// Declines every overwrite
pub struct NeverConfirm;

impl Confirm for NeverConfirm {
    fn confirm(&self, _message: &str) -> bool {
        false
    }
}
