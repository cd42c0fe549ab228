//! Extract and patch command implementation

use std::path::Path;

use colored::Colorize;

use cfgsync_core::{NormalizedPath, Operation, SyncEngine, SyncOptions, SyncReport};

use crate::commands::verify::print_verify;
use crate::error::{CliError, Result};

/// How a report is printed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    pub json: bool,
    pub verbose: bool,
}

/// Run one operation against the project at `root`.
///
/// Returns an error when the run fails or when verification reports a
/// failed step.
pub fn run_sync(
    root: &Path,
    operation: &str,
    config: &str,
    variant: &str,
    options: &SyncOptions,
    output: Output,
) -> Result<()> {
    let operation: Operation = operation.parse()?;
    let engine = SyncEngine::load(NormalizedPath::new(root))?;
    let report = engine.run(operation, config, variant, options)?;

    if output.json {
        println!("{}", report.to_json()?);
    } else {
        println!(
            "{} {} {} (variant {})",
            "=>".blue().bold(),
            heading(operation, options.dry_run),
            config.cyan(),
            report.variant.cyan()
        );
        print_report(&report, output.verbose);
    }

    if !report.is_success() {
        return Err(CliError::user("Round-trip verification failed"));
    }
    Ok(())
}

fn heading(operation: Operation, dry_run: bool) -> &'static str {
    match (operation, dry_run) {
        (Operation::Extract, false) => "Extracting into",
        (Operation::Extract, true) => "Previewing extraction into",
        (Operation::Patch, false) => "Patching from",
        (Operation::Patch, true) => "Previewing patch from",
        (Operation::Verify, _) => "Verifying with",
    }
}

fn print_report(report: &SyncReport, verbose: bool) {
    if let Some(verify) = &report.verify {
        print_verify(verify, verbose);
        return;
    }

    println!("   {} {}", "schema:".dimmed(), report.schema);
    println!("   {} {}", "artifact:".dimmed(), report.artifact);

    for unmatched in &report.unmatched {
        println!(
            "   {} {}: symbol {} not found in artifact",
            "!".yellow(),
            unmatched.parameter,
            unmatched.symbol.cyan()
        );
    }
    for ignored in &report.ignored {
        println!(
            "   {} {}: state {} does not fit the parameter, ignored",
            "!".yellow(),
            ignored.parameter,
            ignored.value
        );
    }

    if verbose {
        for change in &report.artifact_changes {
            println!("{change}");
        }
        for change in &report.config_changes {
            let before = change
                .before
                .as_ref()
                .map_or_else(|| "(absent)".to_string(), ToString::to_string);
            println!("   {} {}: {} -> {}", "~".yellow(), change.key, before, change.after);
        }
    }

    if let Some(diff) = &report.diff {
        print!("{diff}");
    }

    if !report.has_changes() {
        println!("{} Already synchronized. No changes needed.", "OK".green().bold());
        return;
    }

    let summary = match report.operation {
        Operation::Patch => format!("{} artifact line(s)", report.artifact_changes.len()),
        _ => format!("{} configuration key(s)", report.config_changes.len()),
    };
    if report.dry_run {
        println!("{} Would change {summary}.", "DRY RUN".yellow().bold());
    } else {
        println!("{} Changed {summary}:", "OK".green().bold());
        for path in &report.written {
            println!("   {} {}", "+".green(), path);
        }
    }
}
