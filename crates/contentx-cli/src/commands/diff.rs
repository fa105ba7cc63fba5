//! Diff command implementation
//!
//! Previews the content changes reconcile would emit, without writing.

use colored::Colorize;

use contentx_core::{ReconcileReport, Reconciler, Settings};

use crate::commands::print_channel_changes;
use crate::error::Result;

/// Run the diff command
pub fn run_diff(settings: Settings, json: bool) -> Result<()> {
    let reconciler = Reconciler::new(settings)?;
    let report = reconciler.plan(&reconciler.load_snapshot(), &reconciler.load_live());

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

/// Print human-readable diff-style output
pub(crate) fn print_report(report: &ReconcileReport) {
    if !report.has_changes() {
        println!(
            "{} No changes. Attached extensions match the snapshot.",
            "OK".green().bold()
        );
        return;
    }

    println!("{}", "Extensions:".bold());
    for key in &report.removed {
        println!("  {} {}", "-".red(), key.to_string().red());
    }
    for key in &report.added {
        println!("  {} {}", "+".green(), key.to_string().green());
    }

    if report.changes.is_empty() {
        println!();
        println!("No content changes.");
        return;
    }

    println!();
    print_channel_changes(&report.changes);
    println!();
    println!(
        "{} removed, {} added across {} channel(s)",
        report.changes.count(contentx_core::Direction::Removed),
        report.changes.count(contentx_core::Direction::Added),
        report.changes.len()
    );
}
