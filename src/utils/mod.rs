//! Cross-cutting utilities.
//!
//! Currently just progress indication for the CLI; kept as a module so
//! future helpers have a home that matches the rest of the layout.

pub mod progress;

pub use progress::ProgressBar;
