//! Show cache diagnostics.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::Manager;
use crate::config::Settings;

/// Arguments for the `info` command.
#[derive(Debug, Args)]
pub struct InfoCommand {}

impl InfoCommand {
    /// Prints the diagnostic snapshot of cache internals.
    pub fn execute(self, manager: &Manager) -> Result<()> {
        let info = manager.cache_info();

        println!("components cached: {}", info.component_count);
        match info.last_refresh {
            Some(when) => println!("last refresh:      {}", when.to_rfc3339()),
            None => println!("last refresh:      {}", "never".dimmed()),
        }
        println!("persistence:       {}", if info.persistence_enabled { "enabled" } else { "disabled" });
        if info.persistence_enabled
            && let Ok(path) = Settings::snapshot_path()
        {
            println!("snapshot:          {}", path.display());
        }

        let errors = manager.source_errors();
        if !errors.is_empty() {
            println!("\n{}", "source errors from last refresh:".red().bold());
            for (source, message) in errors {
                println!("  {source}: {message}");
            }
        }
        Ok(())
    }
}
