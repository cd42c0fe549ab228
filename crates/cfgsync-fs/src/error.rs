//! Error types for cfgsync-fs

use std::path::PathBuf;

/// Result type for cfgsync-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in cfgsync-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot encode {ch:?} as ISO-8859-1 when writing {path}")]
    Unencodable { path: PathBuf, ch: char },

    #[error("Invalid path identifier {value:?}: {reason}")]
    InvalidIdentifier { value: String, reason: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
