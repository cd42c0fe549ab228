//! Artifact content handling for cfgsync
//!
//! Models an assembler listing as an arena of lines with a symbol index,
//! converts values between their artifact and configuration forms, and
//! describes edits as line-level changes and unified diffs.

pub mod artifact;
pub mod codec;
pub mod diff;
pub mod error;
pub mod text;

pub use artifact::{ArtifactDocument, ArtifactValue, Assignment, AssignmentForm};
pub use codec::ConfigValue;
pub use diff::{LineChange, unified_diff};
pub use error::{Error, Result};
pub use text::{Line, LineEnding, join_lines, split_lines};
