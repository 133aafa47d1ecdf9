//! Show the ranked version list of a component.

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;

use super::{Manager, ensure_populated};

/// Arguments for the `versions` command.
#[derive(Debug, Args)]
pub struct VersionsCommand {
    /// Component name as shown by `cicat list`.
    component: String,
}

impl VersionsCommand {
    /// Resolves and prints the ranked versions for a component's project.
    pub async fn execute(self, manager: &Manager) -> Result<()> {
        ensure_populated(manager).await;

        let components = manager.components();
        let Some(component) = components.iter().find(|c| c.name == self.component) else {
            bail!(
                "component '{}' is not in the cache; run 'cicat list' to see what is",
                self.component
            );
        };

        let versions = manager.fetch_component_versions(component).await;
        for version in &versions {
            if version == &component.version {
                println!("{} {}", version.bold(), "(cached)".dimmed());
            } else {
                println!("{version}");
            }
        }
        Ok(())
    }
}
