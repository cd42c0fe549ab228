//! Core orchestration layer for cfgsync
//!
//! Keeps a Kconfig-style configuration file and an assembler artifact in
//! sync, driven by the parameter mappings of a schema:
//!
//! - **ConfigFile**: line-preserving reader/writer of the configuration file
//! - **ArtifactReader**: computes configuration state from the artifact
//! - **ArtifactPatcher**: rewrites managed artifact lines from configuration state
//! - **RoundTripVerifier**: checks that every parameter survives patch + extract
//! - **SyncEngine**: resolves the variant's files and runs one operation
//!
//! # Architecture
//!
//! ```text
//!                      cfgsync-cli
//!                           |
//!                      cfgsync-core
//!                           |
//!          +----------------+----------------+
//!          |                |                |
//!     cfgsync-fs     cfgsync-schema   cfgsync-content
//! ```
//!
//! # Example
//!
//! ```no_run
//! use cfgsync_core::{NormalizedPath, Operation, SyncEngine, SyncOptions};
//!
//! fn example() -> cfgsync_core::Result<()> {
//!     let engine = SyncEngine::load(NormalizedPath::new("."))?;
//!     let report = engine.run(Operation::Extract, ".config", "bc_a5120", &SyncOptions::default())?;
//!     println!("{} keys changed", report.config_changes.len());
//!     Ok(())
//! }
//! ```

pub mod dotconfig;
pub mod error;
pub mod settings;
pub mod sync;

pub use cfgsync_content::ConfigValue;
pub use cfgsync_fs::NormalizedPath;
pub use dotconfig::{ConfigChange, ConfigFile};
pub use error::{Error, Result};
pub use settings::{SETTINGS_FILE, SyncSettings};
pub use sync::{
    AUTO_VARIANT, ArtifactPatcher, ArtifactReader, Operation, RoundTripVerifier, StepStatus,
    SyncEngine, SyncOptions, SyncReport, UnmatchedSymbol, VerifyReport, VerifyStep,
};
