//! cfgsync CLI
//!
//! Synchronizes a Kconfig `.config` with the assembler configuration of a
//! system variant, in either direction.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cfgsync_core::{NormalizedPath, SyncOptions};

use cli::Cli;
use commands::Output;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: failed to initialize logging: {e}", "warning".yellow().bold());
    }
    tracing::debug!(?cli, "arguments");

    let options = SyncOptions {
        dry_run: cli.dry_run,
        schema: cli.schema.as_deref().map(NormalizedPath::new),
        artifact: cli.artifact.as_deref().map(NormalizedPath::new),
    };
    let output = Output {
        json: cli.json,
        verbose: cli.verbose,
    };

    commands::run_sync(
        &cli.root,
        &cli.operation,
        &cli.config,
        &cli.variant,
        &options,
        output,
    )
}
