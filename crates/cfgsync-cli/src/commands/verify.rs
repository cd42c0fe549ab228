//! Output of the verify operation

use colored::Colorize;

use cfgsync_core::{StepStatus, VerifyReport, VerifyStep};

/// Print failed and skipped steps (every step with `verbose`) and a summary.
pub fn print_verify(report: &VerifyReport, verbose: bool) {
    for step in &report.steps {
        if verbose || step.status != StepStatus::Pass {
            println!("{}", format_step(step));
        }
    }

    let summary = format!(
        "{} passed, {} failed, {} skipped",
        report.passed(),
        report.failed(),
        report.skipped()
    );
    if report.is_success() {
        println!("{} Round trip verified: {summary}", "OK".green().bold());
    } else {
        println!("{} Round trip failed: {summary}", "FAILED".red().bold());
    }
}

fn format_step(step: &VerifyStep) -> String {
    let status = match step.status {
        StepStatus::Pass => "PASS".green(),
        StepStatus::Fail => "FAIL".red().bold(),
        StepStatus::Skip => "SKIP".yellow(),
    };
    match &step.detail {
        Some(detail) => format!("   {status} {} = {}: {detail}", step.parameter, step.probe),
        None => format!("   {status} {} = {}", step.parameter, step.probe),
    }
}
