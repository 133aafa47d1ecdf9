//! Per-project version-list cache.
//!
//! Projects commonly expose many components sharing one repository; without
//! this table every component would trigger its own tag-list fetch during a
//! refresh. Entries are keyed by `"{instance}|{path}"` and hold the ranked
//! version list verbatim.
//!
//! The cache has no TTL of its own - freshness is governed entirely by the
//! owning cache manager's refresh cadence, which clears this table at the
//! start of every full refresh.

use dashmap::DashMap;

use crate::models::version_cache_key;

/// Lock-free lookup table of ranked version lists, keyed by instance + path.
#[derive(Debug, Default)]
pub struct VersionCache {
    entries: DashMap<String, Vec<String>>,
}

impl VersionCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached ranked versions for a project, if present.
    #[must_use]
    pub fn get(&self, instance: &str, path: &str) -> Option<Vec<String>> {
        self.entries.get(&version_cache_key(instance, path)).map(|entry| entry.value().clone())
    }

    /// Stores the ranked versions for a project, replacing any prior entry.
    pub fn set(&self, instance: &str, path: &str, versions: Vec<String>) {
        self.entries.insert(version_cache_key(instance, path), versions);
    }

    /// Drops every entry. Called at the start of a full refresh.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of cached projects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exports all entries as ordered key/value pairs for the snapshot.
    ///
    /// Sorted by key so snapshot output is deterministic.
    #[must_use]
    pub fn entries(&self) -> Vec<(String, Vec<String>)> {
        let mut pairs: Vec<(String, Vec<String>)> =
            self.entries.iter().map(|e| (e.key().clone(), e.value().clone())).collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        pairs
    }

    /// Restores entries from a persisted snapshot.
    pub fn restore(&self, pairs: Vec<(String, Vec<String>)>) {
        for (key, versions) in pairs {
            self.entries.insert(key, versions);
        }
    }
}
