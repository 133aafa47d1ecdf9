//! Error handling for cicat
//!
//! This module provides the error types and user-friendly error reporting for
//! the component catalog. The error system is designed around two core
//! principles:
//! 1. **Strongly-typed errors** for precise error handling in code
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! The error system consists of two main types:
//! - [`CatalogError`] - Enumerated error types for all failure cases
//! - [`ErrorContext`] - Wrapper that adds user-friendly messages and suggestions
//!
//! # Error Taxonomy
//!
//! Failures fall into four categories, each handled at the narrowest scope
//! that can recover from it:
//! - **Transport errors**: [`CatalogError::HttpStatus`],
//!   [`CatalogError::Transport`] - caught per fetch, converted to fallback
//!   results or per-source error entries.
//! - **Parse errors**: never surfaced as errors at all; the spec parser
//!   degrades to partial data.
//! - **Validation errors**: [`CatalogError::VersionNotFound`],
//!   [`CatalogError::ProjectNotFound`] - surfaced as explicit empty results
//!   so callers can distinguish "absent" from "unreachable".
//! - **Persistence errors**: [`CatalogError::SnapshotError`] - logged and
//!   treated as "no persisted state", never fatal.
//!
//! # Examples
//!
//! ```rust,no_run
//! use cicat_cli::core::{CatalogError, user_friendly_error};
//!
//! fn fetch() -> Result<(), CatalogError> {
//!     Err(CatalogError::HttpStatus {
//!         status: 404,
//!         url: "https://gitlab.com/api/v4/projects/x".to_string(),
//!     })
//! }
//!
//! if let Err(e) = fetch() {
//!     let ctx = user_friendly_error(anyhow::Error::from(e));
//!     ctx.display(); // Colored error with suggestion
//! }
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for catalog operations.
///
/// Each variant represents a specific failure mode with enough context for
/// both programmatic handling and a useful CLI message.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Remote API returned a non-success status code.
    ///
    /// # Fields
    /// - `status`: The HTTP status code received
    /// - `url`: The request URL (tokens are never part of the URL)
    #[error("HTTP {status} from {url}")]
    HttpStatus {
        /// The HTTP status code received
        status: u16,
        /// The request URL
        url: String,
    },

    /// Connection-level failure (DNS, TLS, timeout) after retries.
    #[error("request to {url} failed: {reason}")]
    Transport {
        /// The request URL
        url: String,
        /// Underlying failure description
        reason: String,
    },

    /// Project metadata lookup failed; fatal for that one source only.
    #[error("project '{path}' not found on {instance}")]
    ProjectNotFound {
        /// Project path that could not be resolved
        path: String,
        /// Instance host queried
        instance: String,
    },

    /// A requested version is absent from the project's tags and branches.
    ///
    /// Surfaced as an explicit empty result by most callers; kept as a
    /// variant so the distinction from transport failures survives logging.
    #[error("version '{version}' does not exist for {path}")]
    VersionNotFound {
        /// The version string that was requested
        version: String,
        /// Project path the version was looked up against
        path: String,
    },

    /// Snapshot load/save failure.
    #[error("cache snapshot error: {reason}")]
    SnapshotError {
        /// Description of the persistence failure
        reason: String,
    },

    /// Configuration file is present but invalid.
    #[error("configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// IO operation failed.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON payload could not be decoded.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Generic error for cases not covered by specific variants.
    #[error("{message}")]
    Other {
        /// Description of the error
        message: String,
    },
}

impl CatalogError {
    /// Whether this error is a validation miss (absent version/project)
    /// rather than a transport problem.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ProjectNotFound { .. }
                | Self::VersionNotFound { .. }
                | Self::HttpStatus { status: 404, .. }
        )
    }
}

/// User-friendly error wrapper with suggestions and details.
///
/// Wraps a [`CatalogError`] with optional actionable guidance for CLI
/// display. Suggestions render green, details yellow.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying catalog error
    pub error: CatalogError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no additional guidance.
    #[must_use]
    pub const fn new(error: CatalogError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add an actionable suggestion for resolving the error.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Attach catalog-specific suggestions to a typed error.
fn create_error_context(error: CatalogError) -> ErrorContext {
    match &error {
        CatalogError::HttpStatus { status: 401 | 403, .. } => ErrorContext::new(error)
            .with_suggestion(
                "Add a token for this instance under [tokens] in the cicat config file",
            )
            .with_details("The instance rejected the request as unauthorized"),
        CatalogError::HttpStatus { status: 404, .. } => ErrorContext::new(error)
            .with_suggestion("Check the source path in the config file for typos")
            .with_details("The instance answered, but the requested resource does not exist"),
        CatalogError::HttpStatus { .. } | CatalogError::Transport { .. } => {
            ErrorContext::new(error)
                .with_suggestion("Check network connectivity and the instance host name")
        }
        CatalogError::ProjectNotFound { .. } => ErrorContext::new(error)
            .with_suggestion("Verify the project path and that your token can read it"),
        CatalogError::VersionNotFound { .. } => ErrorContext::new(error)
            .with_suggestion("Run 'cicat versions <component>' to list known versions"),
        CatalogError::SnapshotError { .. } => ErrorContext::new(error)
            .with_suggestion("Delete the snapshot file; it will be rebuilt on the next refresh")
            .with_details("The cache keeps working in memory when the snapshot is unreadable"),
        CatalogError::ConfigError { .. } => ErrorContext::new(error)
            .with_suggestion("Check the config file syntax (TOML) and field names"),
        _ => ErrorContext::new(error),
    }
}

/// Convert any error into a user-friendly [`ErrorContext`] for CLI display.
///
/// Typed [`CatalogError`]s get tailored suggestions; everything else is
/// wrapped generically.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    match error.downcast::<CatalogError>() {
        Ok(catalog_error) => create_error_context(catalog_error),
        Err(error) => ErrorContext::new(CatalogError::Other {
            message: format!("{error:#}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_classification() {
        assert!(
            CatalogError::VersionNotFound {
                version: "v9.9.9".to_string(),
                path: "a/b".to_string(),
            }
            .is_not_found()
        );
        assert!(
            CatalogError::HttpStatus {
                status: 404,
                url: "https://gitlab.com/x".to_string(),
            }
            .is_not_found()
        );
        assert!(
            !CatalogError::HttpStatus {
                status: 500,
                url: "https://gitlab.com/x".to_string(),
            }
            .is_not_found()
        );
    }

    #[test]
    fn error_context_formatting() {
        let ctx = ErrorContext::new(CatalogError::Other {
            message: "boom".to_string(),
        })
        .with_details("why")
        .with_suggestion("how");

        let rendered = format!("{ctx}");
        assert!(rendered.contains("boom"));
        assert!(rendered.contains("Details: why"));
        assert!(rendered.contains("Suggestion: how"));
    }

    #[test]
    fn user_friendly_error_downcasts_typed_errors() {
        let err = anyhow::Error::from(CatalogError::HttpStatus {
            status: 401,
            url: "https://gitlab.example.com/api/v4/projects/p".to_string(),
        });
        let ctx = user_friendly_error(err);
        assert!(ctx.suggestion.is_some());
        assert!(matches!(ctx.error, CatalogError::HttpStatus { status: 401, .. }));
    }

    #[test]
    fn user_friendly_error_wraps_unknown_errors() {
        let ctx = user_friendly_error(anyhow::anyhow!("something odd"));
        assert!(matches!(ctx.error, CatalogError::Other { .. }));
    }
}
