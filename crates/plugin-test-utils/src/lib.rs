//! Shared test utilities for the plugin-host workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only — never published.
//!
//! # Modules
//!
//! - [`tree`] — [`PackageTree`] builder for on-disk package layouts

pub mod tree;

pub use tree::PackageTree;
