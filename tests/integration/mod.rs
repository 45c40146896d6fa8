//! Integration test suite for viewmodel
//!
//! End-to-end tests that forge view models against real Tera templates on disk
//! and drive the `vmrender` binary.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **forge**: Class resolution, template binding and response publishing
//! - **lifecycle**: Hook order, variables, filtering and error handling
//! - **cli**: The `vmrender` command line

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod cli;
mod forge;
mod lifecycle;
