//! Content extension tracking and reconciliation
//!
//! Tracks which content extensions are attached to the host application and
//! works out which content became available or went away between two points
//! in time:
//!
//! - **Data model**: [`ExtensionRecord`] with a lazily resolved [`ContentIndex`]
//! - **Sets**: [`ExtensionSet`] with set difference and snapshot persistence
//! - **Diff**: [`ExtensionsDiff`] producing [`ChannelChanges`] grouped by channel
//! - **Flow**: [`Reconciler`] applying changes to a [`ContentRegistry`]
//!
//! # Architecture
//!
//! ```text
//!     manifest ──> live ExtensionSet ─┐
//!                                     ├─> ExtensionsDiff ──> ChannelChanges ──> ContentRegistry
//!     snapshot ──> old ExtensionSet ──┘
//! ```
//!
//! Reading never fails: missing or malformed manifests, content descriptions
//! and snapshots all degrade to "nothing there".

pub mod content;
pub mod diff;
pub mod error;
pub mod layout;
pub mod manifest;
pub mod reconciler;
pub mod record;
pub mod registry;
pub mod set;
pub mod settings;

pub use content::{CONTENT_FILENAME, Channel, ContentIndex};
pub use diff::{
    ChangeKind, ChannelChange, ChannelChanges, Direction, ExtensionsDiff, ItemChange, reconcile,
};
pub use error::{Error, Result};
pub use layout::ContentLayout;
pub use manifest::{KeyFileManifest, ManifestEntry, ManifestSource, StaticManifest};
pub use reconciler::{ReconcileOptions, ReconcileReport, Reconciler};
pub use record::{ExtensionRecord, RecordKey, SnapshotEntry};
pub use registry::{ContentRegistry, RecordingRegistry, apply_all};
pub use set::ExtensionSet;
pub use settings::Settings;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn error_settings_not_found_displays_path() {
        let error = Error::SettingsNotFound {
            path: PathBuf::from("/etc/contentx.toml"),
        };

        let display = format!("{}", error);
        assert!(
            display.contains("/etc/contentx.toml"),
            "Error display should contain the path, got: {}",
            display
        );
    }

    #[test]
    fn error_registry_names_channel() {
        let display = Error::registry("math", "locked").to_string();
        assert!(display.contains("'math'"), "got: {}", display);
        assert!(display.contains("locked"), "got: {}", display);
    }
}
