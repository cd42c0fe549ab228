//! Report of a sync run

use cfgsync_content::LineChange;
use serde::Serialize;

use crate::Result;
use crate::dotconfig::ConfigChange;
use crate::sync::engine::Operation;
use crate::sync::extract::UnmatchedSymbol;
use crate::sync::patch::IgnoredState;
use crate::sync::verify::VerifyReport;

/// What a run did, or would do in dry-run mode.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub operation: Operation,
    pub variant: String,
    pub schema: String,
    pub artifact: String,
    pub config: String,
    pub dry_run: bool,
    /// Rewritten artifact lines (patch).
    pub artifact_changes: Vec<LineChange>,
    /// Changed configuration keys (extract).
    pub config_changes: Vec<ConfigChange>,
    pub unmatched: Vec<UnmatchedSymbol>,
    pub ignored: Vec<IgnoredState>,
    /// Files written to disk.
    pub written: Vec<String>,
    /// Unified diff of the file that would change (dry run only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify: Option<VerifyReport>,
}

impl SyncReport {
    pub(crate) fn new(operation: Operation, variant: &str, dry_run: bool) -> Self {
        Self {
            operation,
            variant: variant.to_string(),
            schema: String::new(),
            artifact: String::new(),
            config: String::new(),
            dry_run,
            artifact_changes: Vec::new(),
            config_changes: Vec::new(),
            unmatched: Vec::new(),
            ignored: Vec::new(),
            written: Vec::new(),
            diff: None,
            verify: None,
        }
    }

    /// False only when a verification step failed.
    pub fn is_success(&self) -> bool {
        self.verify.as_ref().is_none_or(VerifyReport::is_success)
    }

    /// Whether the run changed, or would change, anything.
    pub fn has_changes(&self) -> bool {
        !self.artifact_changes.is_empty() || !self.config_changes.is_empty()
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
