//! Version ranking and per-project version caching.
//!
//! This module provides the total order used everywhere a component's version
//! list is shown or resolved, plus the [`cache::VersionCache`] that insulates
//! the catalog fetcher from repeated tag-list fetches.
//!
//! # Ranking rules
//!
//! [`rank_versions`] produces a stable descending sort:
//!
//! 1. `"main"` ranks above everything
//! 2. `"master"` ranks next
//! 3. Semantic-version tags, compared by their `(major, minor, patch)` triple
//!    in descending order. A tag matches via `^v?(\d+)\.(\d+)\.(\d+)` - the
//!    leading `v` is optional and anything after the patch number (`-rc1`,
//!    `+build`) is ignored for ranking purposes.
//! 4. Everything else keeps its original relative order at the bottom.
//!
//! The triple is compared component-wise (via [`semver::Version`]), never
//! collapsed into a single magnitude - `v10.0.0` must outrank `v2.10.0`.
//!
//! # Examples
//!
//! ```rust
//! use cicat_cli::version::rank_versions;
//!
//! let ranked = rank_versions(&[
//!     "latest".to_string(),
//!     "v1.2.3".to_string(),
//!     "v2.0.0".to_string(),
//!     "main".to_string(),
//! ]);
//! assert_eq!(ranked, vec!["main", "v2.0.0", "v1.2.3", "latest"]);
//! ```

pub mod cache;

pub use cache::VersionCache;

use regex::Regex;
use semver::Version;
use std::sync::OnceLock;

/// Relative weight of a version string in the ranked order.
///
/// Ordered so that `Ord` on the enum gives the ranking directly: branches
/// first, then semver triples, then unrecognized strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum VersionRank {
    /// Neither a known branch nor a semantic version.
    Unrecognized,
    /// Matched `^v?(\d+)\.(\d+)\.(\d+)`; suffix already discarded.
    Semantic(Version),
    /// `"master"`.
    Master,
    /// `"main"`.
    Main,
}

fn semver_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^v?(\d+)\.(\d+)\.(\d+)").unwrap())
}

/// Classifies one version string for ranking.
fn rank_of(version: &str) -> VersionRank {
    match version {
        "main" => VersionRank::Main,
        "master" => VersionRank::Master,
        _ => semver_pattern().captures(version).map_or(VersionRank::Unrecognized, |caps| {
            // The three components stay distinct in the comparison; a single
            // collapsed magnitude would break for values >= 1000 in a lower
            // field.
            let major = caps[1].parse::<u64>().unwrap_or(0);
            let minor = caps[2].parse::<u64>().unwrap_or(0);
            let patch = caps[3].parse::<u64>().unwrap_or(0);
            VersionRank::Semantic(Version::new(major, minor, patch))
        }),
    }
}

/// Ranks version strings into a stable descending total order.
///
/// Branch names `main`/`master` come first, then semantic tags newest-first,
/// then everything else in its original relative order. Equal-priority
/// entries always retain input order (the sort is stable).
#[must_use]
pub fn rank_versions(versions: &[String]) -> Vec<String> {
    let mut ranked: Vec<(VersionRank, &String)> =
        versions.iter().map(|v| (rank_of(v), v)).collect();
    // Stable descending by rank; ties keep input order.
    ranked.sort_by(|a, b| b.0.cmp(&a.0));
    ranked.into_iter().map(|(_, v)| v.clone()).collect()
}

/// Whether a version string looks like a semantic-version tag.
#[must_use]
pub fn is_semantic_tag(version: &str) -> bool {
    semver_pattern().is_match(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn total_order_branches_semver_then_rest() {
        let ranked = rank_versions(&strings(&["latest", "v1.2.3", "v2.0.0", "main"]));
        assert_eq!(ranked, strings(&["main", "v2.0.0", "v1.2.3", "latest"]));
    }

    #[test]
    fn main_outranks_master() {
        let ranked = rank_versions(&strings(&["master", "main"]));
        assert_eq!(ranked, strings(&["main", "master"]));
    }

    #[test]
    fn semantic_magnitude_compares_component_wise() {
        // A naive collapse like major*10000 + minor*100 + patch would rank
        // v2.10.0 (21000) above v10.0.0 (100000 only if the multiplier is
        // large enough) - and breaks outright once any field reaches the
        // multiplier. The triple comparison must hold regardless.
        let ranked = rank_versions(&strings(&["v2.10.0", "v10.0.0", "v2.1.0"]));
        assert_eq!(ranked, strings(&["v10.0.0", "v2.10.0", "v2.1.0"]));
    }

    #[test]
    fn large_lower_fields_stay_monotonic() {
        let ranked = rank_versions(&strings(&["v1.1000.0", "v2.0.0"]));
        assert_eq!(ranked, strings(&["v2.0.0", "v1.1000.0"]));
    }

    #[test]
    fn suffixes_ignored_for_ranking() {
        let ranked = rank_versions(&strings(&["1.2.3-rc1", "v1.2.4"]));
        assert_eq!(ranked, strings(&["v1.2.4", "1.2.3-rc1"]));
    }

    #[test]
    fn unrecognized_keep_relative_order() {
        let ranked = rank_versions(&strings(&["beta", "nightly", "old-tag"]));
        assert_eq!(ranked, strings(&["beta", "nightly", "old-tag"]));
    }

    #[test]
    fn optional_v_prefix() {
        assert!(is_semantic_tag("1.0.0"));
        assert!(is_semantic_tag("v1.0.0"));
        assert!(!is_semantic_tag("latest"));
        assert!(!is_semantic_tag("v1.0"));
    }

    #[test]
    fn empty_input() {
        assert!(rank_versions(&[]).is_empty());
    }
}
