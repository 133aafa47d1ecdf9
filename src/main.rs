//! cicat CLI entry point
//!
//! This is the main executable for the CI component catalog. It handles
//! command-line argument parsing, logging setup, error display, and command
//! execution.
//!
//! Supported commands:
//! - `list` - list cached components
//! - `refresh` - force a full catalog refresh
//! - `versions` - show the ranked version list of a component
//! - `show` - show a component's description and parameters
//! - `info` - show cache diagnostics

use anyhow::Result;
use cicat_cli::cli::Cli;
use cicat_cli::core::user_friendly_error;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise the -v count picks the level.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    // Execute the command
    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            // Convert to a user-friendly error with context and suggestions
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
