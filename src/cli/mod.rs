//! Command-line interface for cicat.
//!
//! The CLI is thin glue over the catalog core: every command builds the
//! shared [`ComponentCacheManager`] from the user configuration and invokes
//! one of its operations. Each command is implemented in its own module with
//! its own argument struct and execution logic.
//!
//! # Available Commands
//!
//! - `list` - list cached components (freshness-gated read)
//! - `refresh` - force a full catalog refresh
//! - `versions` - show the ranked version list of a component
//! - `show` - show one component's description and parameters, optionally
//!   pinned to a specific version (`name@version`)
//! - `info` - cache diagnostics
//!
//! # Global Options
//!
//! - `--config <path>` - explicit config file instead of the default
//! - `-v` / `-vv` / `-vvv` - raise log verbosity (warn is the default)
//!
//! ```bash
//! cicat refresh
//! cicat list
//! cicat versions deploy
//! cicat show deploy@v2.1.0
//! ```

mod info;
mod list;
mod refresh;
mod show;
mod versions;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use crate::cache::ComponentCacheManager;
use crate::config::Settings;
use crate::remote::GitlabClient;

/// The manager type every CLI command operates on.
pub(crate) type Manager = Arc<ComponentCacheManager<GitlabClient>>;

/// Main CLI entry point for the cicat binary.
#[derive(Debug, Parser)]
#[command(name = "cicat", version, about = "A caching catalog for CI/CD pipeline components")]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Path to a config file (defaults to the platform location).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// List cached components.
    List(list::ListCommand),
    /// Force a full catalog refresh from all configured sources.
    Refresh(refresh::RefreshCommand),
    /// Show the ranked version list of a component.
    Versions(versions::VersionsCommand),
    /// Show one component's description and parameters.
    Show(show::ShowCommand),
    /// Show cache diagnostics.
    Info(info::InfoCommand),
}

impl Cli {
    /// Default tracing filter derived from the `-v` count.
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Executes the parsed command.
    ///
    /// # Errors
    ///
    /// Returns an error when configuration loading fails or the command
    /// itself reports a failure; the binary converts it to a user-friendly
    /// message.
    pub async fn execute(self) -> Result<()> {
        let settings = Settings::load_with_optional(self.config).await?;
        let snapshot_path = if settings.persistence {
            Some(Settings::snapshot_path()?)
        } else {
            None
        };

        let api = Arc::new(GitlabClient::new(settings.tokens.clone()));
        let manager: Manager = Arc::new(ComponentCacheManager::new(api, settings, snapshot_path));

        match self.command {
            Commands::List(cmd) => cmd.execute(&manager).await,
            Commands::Refresh(cmd) => cmd.execute(&manager).await,
            Commands::Versions(cmd) => cmd.execute(&manager).await,
            Commands::Show(cmd) => cmd.execute(&manager).await,
            Commands::Info(cmd) => cmd.execute(&manager),
        }
    }
}

/// Makes sure the cache has content before a read-oriented command runs.
///
/// One-shot CLI invocations cannot rely on the background refresh the
/// long-lived editor integration uses - the process would exit before it
/// lands - so an empty cache is refreshed inline here.
pub(crate) async fn ensure_populated(manager: &Manager) {
    if manager.cache_info().component_count == 0 {
        manager.refresh_components().await;
    }
}
