//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::Parser;

/// cfgsync - Keep a Kconfig .config and a variant's bios.mac in sync
///
/// Examples:
///   cfgsync extract .config bc_a5120    # bios.mac -> .config
///   cfgsync patch .config auto          # .config -> bios.mac, variant from .config
///   cfgsync verify .config bc_a5120     # round-trip every parameter in memory
#[derive(Parser, Debug)]
#[command(name = "cfgsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Operation: extract, patch or verify
    pub operation: String,

    /// Configuration file, relative to the project root
    pub config: String,

    /// Variant name, or "auto" to read it from the configuration
    #[arg(default_value = cfgsync_core::AUTO_VARIANT)]
    pub variant: String,

    /// Print every rewritten line and configuration key
    #[arg(short, long)]
    pub verbose: bool,

    /// Project root
    #[arg(long, env = "CFGSYNC_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Schema path overriding the configured template
    #[arg(long)]
    pub schema: Option<String>,

    /// Artifact path overriding the configured template
    #[arg(long)]
    pub artifact: Option<String>,

    /// Preview changes without writing them
    #[arg(long)]
    pub dry_run: bool,

    /// Output the report as JSON
    #[arg(long)]
    pub json: bool,
}
