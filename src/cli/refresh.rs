//! Force a full catalog refresh.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::Manager;
use crate::utils::ProgressBar;

/// Arguments for the `refresh` command.
#[derive(Debug, Args)]
pub struct RefreshCommand {}

impl RefreshCommand {
    /// Forces a refresh regardless of freshness and reports the outcome.
    pub async fn execute(self, manager: &Manager) -> Result<()> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_message("Refreshing component catalog...");

        manager.force_refresh().await;
        spinner.finish_and_clear();

        let info = manager.cache_info();
        println!("{} {} component(s) cached", "✓".green(), info.component_count);

        let errors = manager.source_errors();
        for (source, message) in errors {
            eprintln!("{}: source '{}' failed: {}", "error".red().bold(), source, message);
        }
        Ok(())
    }
}
