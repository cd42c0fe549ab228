//! Shared test utilities for the cfgsync workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`fixtures`]: canonical schema, artifact and configuration texts
//! - [`project`]: [`TestProject`](project::TestProject) builder for a
//!   temporary project with one or more variants

pub mod fixtures;
pub mod project;
