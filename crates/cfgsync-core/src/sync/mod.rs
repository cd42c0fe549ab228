//! Synchronization between configuration and artifact
//!
//! - [`extract`]: artifact -> configuration state
//! - [`patch`]: configuration state -> artifact, in a clear and a select pass
//! - [`verify`]: in-memory round trip of every parameter
//! - [`engine`]: variant resolution and dispatch

pub mod engine;
pub mod extract;
pub mod patch;
pub mod report;
pub mod verify;

pub use engine::{AUTO_VARIANT, Operation, SyncEngine, SyncOptions};
pub use extract::{ArtifactReader, Extraction, UnmatchedSymbol};
pub use patch::{ArtifactPatcher, IgnoredState, Pass, PatchOutcome, PatchPlan, PlannedWrite};
pub use report::SyncReport;
pub use verify::{RoundTripVerifier, StepStatus, VerifyReport, VerifyStep};
