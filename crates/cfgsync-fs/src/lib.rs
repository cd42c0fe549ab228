//! Filesystem layer for cfgsync
//!
//! Provides normalized paths, whole-file text I/O that round-trips the
//! original encoding, and resolution of per-variant schema/artifact paths.

pub mod error;
pub mod io;
pub mod layout;
pub mod path;

pub use error::{Error, Result};
pub use io::{TextEncoding, TextFile};
pub use layout::{VariantLayout, VariantPaths};
pub use path::{NormalizedPath, validate_path_identifier};
