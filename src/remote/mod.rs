//! Remote source-control access.
//!
//! This module wraps everything that talks to a GitLab instance:
//!
//! - [`http`] - a thin [`reqwest`] wrapper with bounded retry/backoff and
//!   typed HTTP errors carrying the status code
//! - [`gitlab`] - the typed REST surface the core consumes ([`GitlabApi`])
//!   and its production implementation ([`GitlabClient`])
//! - [`batch`] - bounded-concurrency batch processing that preserves result
//!   order and isolates per-item failures
//!
//! The rest of the crate depends only on the [`GitlabApi`] trait, so tests
//! substitute a scripted stub without touching the network.

pub mod batch;
pub mod gitlab;
pub mod http;

pub use batch::process_batch;
pub use gitlab::{GitlabApi, GitlabClient, GroupProject, ProjectInfo, TreeEntry};
pub use http::HttpClient;
