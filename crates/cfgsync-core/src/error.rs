//! Error types for cfgsync-core

use std::path::PathBuf;

/// Result type for cfgsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in cfgsync-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Schema file of the selected variant does not exist
    #[error("Schema not found at {path}")]
    SchemaMissing { path: PathBuf },

    /// Artifact file of the selected variant does not exist
    #[error("Artifact not found at {path}")]
    ArtifactMissing { path: PathBuf },

    /// Operation verb is not one of extract, patch, verify
    #[error("Unknown operation: {operation} (expected extract, patch or verify)")]
    UnknownOperation { operation: String },

    /// Several selected parameters would write different values to one symbol
    #[error("Conflicting selection for symbol {symbol}: {}", .members.join(", "))]
    ConflictingSelection { symbol: String, members: Vec<String> },

    /// `auto` variant requested but the configuration selects none
    #[error("Cannot determine variant from {config}: no {key_pattern} key is set")]
    VariantUndetermined { config: PathBuf, key_pattern: String },

    /// `cfgsync.toml` exists but cannot be parsed
    #[error("Invalid settings in {path}: {message}")]
    InvalidSettings { path: PathBuf, message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from cfgsync-fs
    #[error(transparent)]
    Fs(#[from] cfgsync_fs::Error),

    /// Schema error from cfgsync-schema
    #[error(transparent)]
    Schema(#[from] cfgsync_schema::Error),

    /// Content error from cfgsync-content
    #[error(transparent)]
    Content(#[from] cfgsync_content::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
