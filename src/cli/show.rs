//! Show one component's description and parameters.

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;

use super::{Manager, ensure_populated};
use crate::models::Component;

/// Arguments for the `show` command.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Component reference: `name` or `name@version`.
    reference: String,
}

impl ShowCommand {
    /// Prints full details for one component, fetching a pinned version on
    /// demand when the reference names one.
    pub async fn execute(self, manager: &Manager) -> Result<()> {
        ensure_populated(manager).await;

        let (name, version) = match self.reference.split_once('@') {
            Some((name, version)) => (name, Some(version)),
            None => (self.reference.as_str(), None),
        };

        let components = manager.components();
        let Some(base) = components.iter().find(|c| c.name == name) else {
            bail!("component '{name}' is not in the cache; run 'cicat list' to see what is");
        };

        let component = match version {
            Some(version) if version != base.version => {
                let fetched = manager
                    .fetch_specific_version(
                        name,
                        &base.source_path,
                        &base.gitlab_instance,
                        version,
                    )
                    .await?;
                match fetched {
                    Some(component) => component,
                    None => bail!(
                        "version '{version}' of '{name}' does not exist; \
                         run 'cicat versions {name}' to list known versions"
                    ),
                }
            }
            _ => base.clone(),
        };

        print_component(&component);
        Ok(())
    }
}

fn print_component(component: &Component) {
    println!("{} {}", component.name.bold(), format!("@{}", component.version).cyan());
    println!("{}", component.url.underline());
    println!("source: {}\n", component.source);
    println!("{}\n", component.description);

    if component.parameters.is_empty() {
        println!("{}", "no parameters".dimmed());
    } else {
        println!("{}", "parameters:".bold());
        for parameter in &component.parameters {
            let type_name: String = parameter.param_type.clone().into();
            let mut line = format!("  {} ({type_name})", parameter.name);
            if parameter.required {
                line.push_str(&format!(" {}", "required".yellow()));
            }
            if let Some(default) = &parameter.default_value {
                line.push_str(&format!(" [default: {}]", default.display()));
            }
            println!("{line}");
            println!("      {}", parameter.description.dimmed());
        }
    }

    if let Some(versions) = &component.available_versions {
        let preview: Vec<&str> = versions.iter().take(5).map(String::as_str).collect();
        println!("\nversions: {}", preview.join(", "));
    }
}
