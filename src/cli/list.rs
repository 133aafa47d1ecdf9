//! List cached components.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::{Manager, ensure_populated};

/// Arguments for the `list` command.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only show components from this source.
    #[arg(long)]
    source: Option<String>,

    /// Show parameters and the pipeline reference for each component.
    #[arg(long)]
    details: bool,
}

impl ListCommand {
    /// Prints the cached catalog, refreshing first when the cache is empty.
    pub async fn execute(self, manager: &Manager) -> Result<()> {
        ensure_populated(manager).await;

        let components = manager.components();
        let filtered: Vec<_> = components
            .iter()
            .filter(|c| self.source.as_ref().is_none_or(|s| &c.source == s))
            .collect();

        if filtered.is_empty() {
            println!("No components cached. Check configured sources with 'cicat info'.");
            return Ok(());
        }

        for component in &filtered {
            println!(
                "{} {} {}",
                component.name.bold(),
                format!("@{}", component.version).cyan(),
                format!("({})", component.source).dimmed(),
            );
            println!("  {}", component.description.lines().next().unwrap_or_default());
            if self.details {
                println!("  {}", component.url.underline());
                for parameter in &component.parameters {
                    let type_name: String = parameter.param_type.clone().into();
                    let required = if parameter.required { " (required)" } else { "" };
                    println!("    {}: {}{}", parameter.name, type_name, required.yellow());
                }
            }
        }
        println!("\n{} component(s)", filtered.len());

        let errors = manager.source_errors();
        if !errors.is_empty() {
            eprintln!();
            for (source, message) in errors {
                eprintln!("{}: source '{}': {}", "warning".yellow().bold(), source, message);
            }
        }
        Ok(())
    }
}
