//! Error types for cfgsync-schema

/// Result type for cfgsync-schema operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in cfgsync-schema operations
///
/// Parsing itself is best-effort and never fails; only reading the schema
/// file can.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Fs(#[from] cfgsync_fs::Error),
}
