//! Core types and functionality for cicat
//!
//! This module forms the foundation of cicat's type system, providing the
//! error handling contracts used throughout the codebase.
//!
//! # Error Management
//!
//! cicat distinguishes developer-facing and user-facing error handling:
//! - **Strongly-typed errors** ([`CatalogError`]) for precise handling in code
//! - **User-friendly contexts** ([`ErrorContext`]) with actionable suggestions
//!   for CLI users
//! - [`user_friendly_error`] to convert any error into the user-facing form
//!
//! Failure-recovery policy lives with the types: transport and parse failures
//! are recovered as close to their source as possible (per-file, per-project,
//! per-source), validation misses surface as explicit empty results, and
//! persistence failures never block the in-memory cache.

pub mod error;

pub use error::{CatalogError, ErrorContext, user_friendly_error};

/// Convenient result type alias using [`CatalogError`].
pub type Result<T> = std::result::Result<T, CatalogError>;
