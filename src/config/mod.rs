//! Configuration management for cicat
//!
//! One TOML file drives the catalog: the list of configured sources, the two
//! cache freshness windows, and optional per-instance authentication tokens.
//!
//! # Location
//!
//! - Unix/macOS: `~/.cicat/config.toml`
//! - Windows: `%LOCALAPPDATA%\cicat\config.toml`
//! - Override the directory with the `CICAT_CONFIG_DIR` environment variable,
//!   or pass an explicit path on the CLI with `--config`.
//!
//! A missing file is not an error; it yields default settings with no
//! sources, in which case the cache falls back to the built-in placeholder
//! components.
//!
//! # Format
//!
//! ```toml
//! cache_time = 3600           # seconds; default shown
//! # version_cache_time = 14400  # defaults to 4x cache_time
//!
//! [[sources]]
//! name = "deploy components"
//! path = "components/deploy"
//!
//! [[sources]]
//! name = "Platform Team"
//! path = "platform"
//! type = "group"
//! gitlab_instance = "gitlab.example.com"
//!
//! [tokens]
//! "gitlab.example.com" = "glpat-..."
//! ```
//!
//! This file may contain tokens; it is never meant for version control.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

use crate::constants::{DEFAULT_CACHE_TIME, VERSION_CACHE_TIME_FACTOR};
use crate::models::SourceConfig;

/// User settings consumed by the cache manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Configured component sources, scanned in order on every refresh.
    #[serde(default)]
    pub sources: Vec<SourceConfig>,

    /// Catalog freshness window in seconds.
    #[serde(default = "default_cache_time_secs")]
    pub cache_time: u64,

    /// Version-list freshness window in seconds; defaults to
    /// 4x `cache_time` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_cache_time: Option<u64>,

    /// Whether snapshots are persisted to disk.
    #[serde(default = "default_true")]
    pub persistence: bool,

    /// Private tokens keyed by instance host.
    #[serde(default)]
    pub tokens: HashMap<String, String>,
}

fn default_cache_time_secs() -> u64 {
    DEFAULT_CACHE_TIME.as_secs()
}

const fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            cache_time: default_cache_time_secs(),
            version_cache_time: None,
            persistence: true,
            tokens: HashMap::new(),
        }
    }
}

impl Settings {
    /// Catalog freshness window.
    #[must_use]
    pub const fn cache_window(&self) -> Duration {
        Duration::from_secs(self.cache_time)
    }

    /// Version freshness window (configured, or 4x the catalog window).
    #[must_use]
    pub fn version_cache_window(&self) -> Duration {
        Duration::from_secs(
            self.version_cache_time.unwrap_or(self.cache_time * VERSION_CACHE_TIME_FACTOR),
        )
    }

    /// Loads settings from the default location.
    ///
    /// A missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined, or the
    /// file exists but cannot be read or parsed.
    pub async fn load() -> Result<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Loads settings from an optional explicit path, falling back to the
    /// default location.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Settings::load`].
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(&path).await,
            None => Self::load().await,
        }
    }

    /// Loads settings from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Platform config directory, honoring the `CICAT_CONFIG_DIR` override.
    ///
    /// # Errors
    ///
    /// Returns an error if the home (or local data) directory cannot be
    /// determined.
    pub fn config_dir() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var("CICAT_CONFIG_DIR") {
            return Ok(PathBuf::from(dir));
        }
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("cicat")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".cicat")
        };
        Ok(config_dir)
    }

    /// Default config file path.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Settings::config_dir`].
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Default path of the persisted cache snapshot.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Settings::config_dir`].
    pub fn snapshot_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("components-cache.json"))
    }

    /// Token configured for an instance host, if any.
    #[must_use]
    pub fn token_for(&self, instance: &str) -> Option<&str> {
        self.tokens.get(instance).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceKind;
    use serial_test::serial;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert!(settings.sources.is_empty());
        assert_eq!(settings.cache_window(), Duration::from_secs(3600));
        assert_eq!(settings.version_cache_window(), Duration::from_secs(4 * 3600));
        assert!(settings.persistence);
    }

    #[test]
    fn explicit_version_window_wins() {
        let settings = Settings {
            cache_time: 100,
            version_cache_time: Some(900),
            ..Settings::default()
        };
        assert_eq!(settings.version_cache_window(), Duration::from_secs(900));
    }

    #[test]
    fn parses_full_config() {
        let settings: Settings = toml::from_str(
            r#"
cache_time = 600

[[sources]]
name = "deploy"
path = "components/deploy"

[[sources]]
name = "Platform"
path = "platform"
type = "group"
gitlab_instance = "gitlab.example.com"

[tokens]
"gitlab.example.com" = "glpat-abc"
"#,
        )
        .unwrap();

        assert_eq!(settings.cache_time, 600);
        assert_eq!(settings.sources.len(), 2);
        assert_eq!(settings.sources[0].kind, SourceKind::Project);
        assert_eq!(settings.sources[1].kind, SourceKind::Group);
        assert_eq!(settings.sources[1].gitlab_instance, "gitlab.example.com");
        assert_eq!(settings.token_for("gitlab.example.com"), Some("glpat-abc"));
        assert_eq!(settings.token_for("gitlab.com"), None);
    }

    #[test]
    #[serial]
    fn config_dir_env_override() {
        // SAFETY: test runs serially; no other thread reads the environment.
        unsafe {
            std::env::set_var("CICAT_CONFIG_DIR", "/tmp/cicat-test");
        }
        let dir = Settings::config_dir().unwrap();
        unsafe {
            std::env::remove_var("CICAT_CONFIG_DIR");
        }
        assert_eq!(dir, PathBuf::from("/tmp/cicat-test"));
    }

    #[tokio::test]
    async fn missing_explicit_path_is_an_error() {
        let result = Settings::load_from(Path::new("/definitely/not/here.toml")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn load_from_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "cache_time = 42\n").unwrap();

        let settings = Settings::load_from(&path).await.unwrap();
        assert_eq!(settings.cache_time, 42);
    }
}
