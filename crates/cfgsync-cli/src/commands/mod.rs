//! Command implementations for cfgsync-cli

pub mod sync;
pub mod verify;

pub use sync::{Output, run_sync};
