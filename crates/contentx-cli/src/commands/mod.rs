//! Command implementations

mod diff;
mod dirs;
mod reconcile;
mod status;

pub use diff::run_diff;
pub use dirs::run_dirs;
pub use reconcile::run_reconcile;
pub use status::run_status;

use colored::Colorize;
use contentx_core::{ChannelChanges, Direction, ItemChange, Settings};

use crate::cli::PathArgs;
use crate::error::Result;

/// Build settings from an optional settings file plus command-line overrides.
pub fn resolve_settings(paths: &PathArgs) -> Result<Settings> {
    let mut settings = match &paths.config {
        Some(config) => Settings::load(config)?,
        None => Settings::default(),
    };

    if let Some(manifest) = &paths.manifest {
        settings.manifest_path = manifest.clone();
    }
    if let Some(extensions_dir) = &paths.extensions_dir {
        settings.extensions_dir = extensions_dir.clone();
    }
    if let Some(snapshot) = &paths.snapshot {
        settings.snapshot_path = snapshot.clone();
    }

    tracing::debug!(?settings, "resolved settings");
    Ok(settings)
}

/// One diff-style line for a change: `+ item n1`, `- exclusion n2`.
pub(crate) fn format_change(change: &ItemChange) -> String {
    match change.direction {
        Direction::Added => format!("{} {} {}", "+".green(), change.kind, change.item_id.green()),
        Direction::Removed => format!("{} {} {}", "-".red(), change.kind, change.item_id.red()),
    }
}

/// Print grouped changes under a header per channel.
pub(crate) fn print_channel_changes(changes: &ChannelChanges) {
    for (channel_id, channel_changes) in changes.iter() {
        println!("{} {}", "Channel".bold(), channel_id.cyan());
        for change in channel_changes {
            println!("  {}", format_change(change));
        }
    }
}
