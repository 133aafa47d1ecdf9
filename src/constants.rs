//! Global constants used throughout the cicat codebase.
//!
//! This module contains cache freshness windows, retry parameters, and other
//! numeric constants that are used across multiple modules. Defining them
//! centrally improves maintainability and makes magic numbers more
//! discoverable.

use std::time::Duration;

/// Default freshness window for the component catalog (1 hour).
///
/// A `components()` read older than this triggers a background full
/// refresh. Overridable via `cache_time` in the config file.
pub const DEFAULT_CACHE_TIME: Duration = Duration::from_secs(3600);

/// Multiplier applied to `cache_time` to derive the version freshness
/// window when `version_cache_time` is not configured explicitly.
///
/// Version lists change far less often than catalog content, so they are
/// refreshed on a longer cadence.
pub const VERSION_CACHE_TIME_FACTOR: u64 = 4;

/// Number of member projects fetched concurrently during a group scan.
///
/// Batches are processed strictly one after another; this bounds peak
/// concurrency against the remote API.
pub const GROUP_PROJECT_BATCH_SIZE: usize = 5;

/// Number of template files fetched concurrently within one project.
pub const TEMPLATE_FILE_BATCH_SIZE: usize = 8;

/// Page size for the paged group member-project listing.
pub const GROUP_PROJECTS_PAGE_SIZE: usize = 100;

/// Starting delay for exponential backoff on HTTP retries (100ms).
///
/// This is the initial delay used in exponential backoff calculations,
/// which doubles on each retry attempt.
pub const STARTING_BACKOFF_DELAY_MS: u64 = 100;

/// Maximum backoff delay for HTTP retries (2 seconds).
///
/// Exponential backoff delays are capped at this value to prevent
/// excessive wait times during retry operations.
pub const MAX_BACKOFF_DELAY_MS: u64 = 2_000;

/// Number of attempts for a single HTTP request before the failure is
/// surfaced to the caller.
pub const HTTP_RETRY_ATTEMPTS: usize = 3;

/// Timeout applied to every HTTP request (30 seconds).
pub const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default GitLab host used when a source does not name one.
pub const DEFAULT_GITLAB_INSTANCE: &str = "gitlab.com";

/// Branch names injected into every fetched tag list.
///
/// Components are frequently referenced by branch rather than tag, so the
/// two conventional default-branch names always rank above any tag.
pub const INJECTED_BRANCHES: [&str; 2] = ["main", "master"];

/// Directory inside a project repository that holds component templates.
pub const TEMPLATES_DIR: &str = "templates";

/// Schema version tag written into the persisted snapshot.
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;
