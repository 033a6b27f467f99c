//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! insurance purchase test suite.
//!
//! # Modules
//!
//! - `fixtures`: The sample catalog and predictable purchase data
//! - `builders`: Builder patterns for providers, forms and dependents
//! - `assertions`: Custom assertion helpers for domain types
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
