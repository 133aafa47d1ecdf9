//! Persisted cache snapshot.
//!
//! The snapshot is the only state the catalog owns on disk: the component
//! list, the last refresh timestamp, and the per-project version cache
//! (serialized as ordered key/value pairs, not a native map, so the file
//! stays diffable and stable). A `version` tag guards future migrations.
//!
//! Load-then-validate: a missing or structurally invalid file is treated as
//! an empty cache and logged, never a fatal error. Writes go through a
//! temporary file in the target directory followed by a rename, so a crash
//! mid-write can never corrupt the previous snapshot.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tracing::{debug, warn};

use crate::constants::SNAPSHOT_SCHEMA_VERSION;
use crate::core::{CatalogError, Result};
use crate::models::Component;

/// On-disk snapshot of the component cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSnapshot {
    /// Schema tag for future migration.
    pub version: u32,
    /// Cached components at the time of the last successful refresh.
    pub components: Vec<Component>,
    /// Epoch milliseconds of the last successful refresh.
    pub last_refresh_ms: i64,
    /// Version cache entries as ordered `(instance|path, versions)` pairs.
    #[serde(default)]
    pub project_versions: Vec<(String, Vec<String>)>,
}

impl CacheSnapshot {
    /// Creates a snapshot with the current schema version.
    #[must_use]
    pub fn new(
        components: Vec<Component>,
        last_refresh_ms: i64,
        project_versions: Vec<(String, Vec<String>)>,
    ) -> Self {
        Self {
            version: SNAPSHOT_SCHEMA_VERSION,
            components,
            last_refresh_ms,
            project_versions,
        }
    }

    /// Loads and validates a snapshot from disk.
    ///
    /// Returns `None` (never an error) when the file is absent, unreadable,
    /// undecodable, or carries an unknown schema version - the in-memory
    /// cache simply starts empty.
    #[must_use]
    pub fn load(path: &Path) -> Option<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "snapshot unreadable, starting empty");
                return None;
            }
        };

        let snapshot: Self = match serde_json::from_str(&content) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "snapshot invalid, starting empty");
                return None;
            }
        };

        if snapshot.version != SNAPSHOT_SCHEMA_VERSION {
            warn!(
                path = %path.display(),
                found = snapshot.version,
                expected = SNAPSHOT_SCHEMA_VERSION,
                "snapshot schema mismatch, starting empty"
            );
            return None;
        }

        debug!(
            path = %path.display(),
            components = snapshot.components.len(),
            "snapshot loaded"
        );
        Some(snapshot)
    }

    /// Writes the snapshot atomically (temp file + rename).
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::SnapshotError`] when the directory cannot be
    /// created or the write/rename fails. Callers log and continue; a failed
    /// save never blocks the in-memory cache.
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path.parent().ok_or_else(|| CatalogError::SnapshotError {
            reason: format!("snapshot path {} has no parent directory", path.display()),
        })?;
        std::fs::create_dir_all(parent)?;

        let json = serde_json::to_string_pretty(self)?;

        let mut temp = tempfile::NamedTempFile::new_in(parent).map_err(|e| {
            CatalogError::SnapshotError {
                reason: format!("temp file creation failed: {e}"),
            }
        })?;
        temp.write_all(json.as_bytes())?;
        temp.persist(path).map_err(|e| CatalogError::SnapshotError {
            reason: format!("rename into place failed: {e}"),
        })?;

        debug!(path = %path.display(), components = self.components.len(), "snapshot saved");
        Ok(())
    }
}
