//! Typed client for the remote API.
//!
//! The wire seam is the [`Transport`] trait; production code uses
//! [`HttpTransport`] (reqwest, bearer auth, transparent 429 retry), tests
//! script their own. [`Client`] layers the response cache and the typed
//! endpoint methods on top.

pub mod client;
pub mod testing;
pub mod transport;

pub use client::{Client, SubmissionFile};
pub use transport::{HttpTransport, Method, Transport};
