//! cicat - CI Component Catalog Cache
//!
//! A caching catalog for reusable CI/CD pipeline components hosted in remote
//! GitLab projects and groups. cicat discovers component templates, parses
//! their spec blocks into typed parameter lists, ranks their versions, and
//! keeps everything in a persisted, freshness-gated cache that editor
//! integrations and the bundled CLI read without ever blocking on the
//! network.
//!
//! # Architecture Overview
//!
//! Data flows one direction on refresh:
//!
//! ```text
//! configured sources -> catalog fetcher (per source, concurrent)
//!                    -> raw component candidates
//!                    -> cache manager merge (last-write-wins by identity)
//!                    -> persisted snapshot
//! ```
//!
//! On read, the cache manager returns the current in-memory snapshot
//! immediately; staleness only triggers background refreshes.
//!
//! # Core Modules
//!
//! - [`cache`] - the [`cache::ComponentCacheManager`] orchestrator and the
//!   persisted snapshot format
//! - [`catalog`] - per-project and per-group component discovery
//! - [`template`] - the spec-block parser (tolerant line-level state machine)
//! - [`version`] - version priority ranking and the per-project version cache
//! - [`remote`] - HTTP transport, the typed GitLab API surface, and batch
//!   processing
//!
//! # Supporting Modules
//!
//! - [`cli`] - command-line interface (`list`, `refresh`, `versions`,
//!   `show`, `info`)
//! - [`config`] - TOML settings: sources, freshness windows, tokens
//! - [`core`] - error types and user-facing error contexts
//! - [`models`] - Component, Parameter, and source descriptors
//! - [`utils`] - progress indication
//!
//! # Configuration (config.toml)
//!
//! ```toml
//! [[sources]]
//! name = "deploy components"
//! path = "components/deploy"
//!
//! [[sources]]
//! name = "Platform Team"
//! path = "platform"
//! type = "group"
//! gitlab_instance = "gitlab.example.com"
//! ```
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use cicat_cli::cache::ComponentCacheManager;
//! use cicat_cli::config::Settings;
//! use cicat_cli::remote::GitlabClient;
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let settings = Settings::load().await?;
//! let api = Arc::new(GitlabClient::new(settings.tokens.clone()));
//! let manager = Arc::new(ComponentCacheManager::new(
//!     api,
//!     settings,
//!     Some(Settings::snapshot_path()?),
//! ));
//!
//! // Non-blocking read; refreshes happen in the background when stale.
//! for component in manager.components() {
//!     println!("{} @ {}", component.name, component.version);
//! }
//! # Ok(())
//! # }
//! ```

// Core functionality modules
pub mod cache;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod core;

// Remote access
pub mod remote;

// Parsing and version handling
pub mod template;
pub mod version;

// Supporting modules
pub mod constants;
pub mod models;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
