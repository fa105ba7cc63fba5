//! Status command implementation
//!
//! Shows the extensions attached now and the ones recorded in the snapshot.

use colored::Colorize;
use serde::Serialize;

use contentx_core::{ExtensionSet, Reconciler, Settings};

use crate::error::Result;

#[derive(Debug, Serialize)]
struct ExtensionStatus {
    name: String,
    version: String,
    #[serde(rename = "ref")]
    reference: String,
    channels: usize,
    /// Whether the extension appears in both live and snapshot sets
    recorded: bool,
}

fn describe(set: &ExtensionSet, other: &ExtensionSet) -> Vec<ExtensionStatus> {
    set.iter()
        .map(|record| ExtensionStatus {
            name: record.name().to_string(),
            version: record.version().to_string(),
            reference: record.reference().to_string(),
            channels: record.content_index().channels.len(),
            recorded: other.contains(record),
        })
        .collect()
}

/// Run the status command
pub fn run_status(settings: Settings, json: bool) -> Result<()> {
    let reconciler = Reconciler::new(settings)?;
    let live = reconciler.load_live();
    let snapshot = reconciler.load_snapshot();

    let live_status = describe(&live, &snapshot);
    let snapshot_status = describe(&snapshot, &live);
    let in_sync = live == snapshot;

    if json {
        let output = serde_json::json!({
            "in_sync": in_sync,
            "live": live_status,
            "snapshot": snapshot_status,
            "snapshot_path": reconciler.settings().snapshot_path,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", "Attached extensions:".bold());
    if live_status.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for ext in &live_status {
        let marker = if ext.recorded { " ".normal() } else { "+".green() };
        println!(
            "  {} {}@{} ({} channels)",
            marker,
            ext.name.cyan(),
            ext.version,
            ext.channels
        );
    }

    let detached: Vec<_> = snapshot_status.iter().filter(|e| !e.recorded).collect();
    if !detached.is_empty() {
        println!();
        println!("{}", "Detached since last reconcile:".bold());
        for ext in detached {
            println!("  {} {}@{}", "-".red(), ext.name.cyan(), ext.version);
        }
    }

    println!();
    if in_sync {
        println!("{} Snapshot is up to date.", "OK".green().bold());
    } else {
        println!(
            "{} Snapshot is out of date. Run {} to update it.",
            "!".yellow().bold(),
            "contentx reconcile".cyan()
        );
    }

    Ok(())
}
