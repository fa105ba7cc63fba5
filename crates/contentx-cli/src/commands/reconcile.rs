//! Reconcile command implementation
//!
//! Emits the content changes since the last snapshot, channel by channel,
//! then records the new snapshot.

use colored::Colorize;

use contentx_core::{
    ContentRegistry, ItemChange, ReconcileOptions, Reconciler, RecordingRegistry, Settings,
};

use crate::commands::format_change;
use crate::commands::diff::print_report;
use crate::error::Result;

/// Registry that prints each channel's changes as it receives them.
struct PrintRegistry;

impl ContentRegistry for PrintRegistry {
    fn apply_channel(
        &mut self,
        channel_id: &str,
        changes: &[ItemChange],
    ) -> contentx_core::Result<()> {
        println!("{} {}", "Channel".bold(), channel_id.cyan());
        for change in changes {
            println!("  {}", format_change(change));
        }
        Ok(())
    }
}

/// Run the reconcile command
pub fn run_reconcile(settings: Settings, dry_run: bool, json: bool) -> Result<()> {
    let reconciler = Reconciler::new(settings)?;
    let options = ReconcileOptions { dry_run };

    if json {
        let mut registry = RecordingRegistry::new();
        let report = reconciler.run(&mut registry, options)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if dry_run {
        let report = reconciler.run(&mut RecordingRegistry::new(), options)?;
        print_report(&report);
        println!();
        println!("{} Snapshot not updated.", "[dry-run]".yellow());
        return Ok(());
    }

    let report = reconciler.run(&mut PrintRegistry, options)?;

    if !report.has_changes() {
        println!(
            "{} No changes. Attached extensions match the snapshot.",
            "OK".green().bold()
        );
        return Ok(());
    }

    println!();
    println!(
        "{} {} extension(s) removed, {} added. Snapshot written to {}",
        "OK".green().bold(),
        report.removed.len(),
        report.added.len(),
        reconciler.settings().snapshot_path.display().to_string().yellow()
    );
    Ok(())
}
