//! Integration test suite for cicat
//!
//! End-to-end tests that drive the cache manager and catalog fetcher over
//! the scripted stub API (no network), plus CLI smoke tests against the
//! built binary.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **cache_manager**: full refresh cycles across mixed sources, group
//!   partial failure, snapshot restore across process restarts
//! - **cli_smoke**: argument parsing and offline commands of the `cicat`
//!   binary

mod cache_manager;
mod cli_smoke;
