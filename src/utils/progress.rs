//! Progress indicators for CLI operations.
//!
//! A thin wrapper over [`indicatif`] that keeps styling consistent and
//! automatically disables itself in non-interactive environments:
//! - when stderr is not a TTY (pipes, redirects, CI)
//! - when the `CICAT_NO_PROGRESS` environment variable is set
//!
//! This keeps scripted output clean while interactive use gets a spinner.

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

/// Spinner for indeterminate work (network refreshes).
#[derive(Debug, Clone)]
pub struct ProgressBar {
    bar: IndicatifBar,
}

fn progress_disabled() -> bool {
    std::env::var_os("CICAT_NO_PROGRESS").is_some() || !std::io::stderr().is_terminal()
}

impl ProgressBar {
    /// Creates a spinner, hidden entirely when progress is disabled.
    #[must_use]
    pub fn new_spinner() -> Self {
        let bar = if progress_disabled() {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template("{spinner:.cyan} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        };
        Self { bar }
    }

    /// Updates the spinner message.
    pub fn set_message(&self, msg: impl Into<String>) {
        self.bar.set_message(msg.into());
    }

    /// Stops the spinner, leaving a final message.
    pub fn finish_with_message(&self, msg: impl Into<String>) {
        self.bar.finish_with_message(msg.into());
    }

    /// Stops the spinner and clears its line.
    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}
