//! End-to-end reconciliation: snapshot vs live environment, applied to the
//! host registry, then persisted.

use contentx_fs::FileLock;
use serde::Serialize;

use crate::diff::{ChannelChanges, ExtensionsDiff};
use crate::error::Result;
use crate::layout::ContentLayout;
use crate::record::RecordKey;
use crate::registry::{ContentRegistry, apply_all};
use crate::set::ExtensionSet;
use crate::settings::Settings;

/// Options for [`Reconciler::run`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileOptions {
    /// Compute and apply nothing; leave the snapshot untouched.
    pub dry_run: bool,
}

/// Outcome of a reconciliation run.
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileReport {
    /// Extensions detached since the last snapshot.
    pub removed: Vec<RecordKey>,
    /// Extensions attached since the last snapshot.
    pub added: Vec<RecordKey>,
    /// Content changes, grouped by channel.
    pub changes: ChannelChanges,
    /// Whether the new snapshot was written.
    pub snapshot_written: bool,
    pub dry_run: bool,
}

impl ReconcileReport {
    pub fn has_changes(&self) -> bool {
        !self.removed.is_empty() || !self.added.is_empty()
    }
}

/// Runs the reconciliation flow for one set of [`Settings`].
#[derive(Debug, Clone)]
pub struct Reconciler {
    settings: Settings,
    layout: ContentLayout,
}

impl Reconciler {
    pub fn new(settings: Settings) -> Result<Self> {
        let layout = settings.layout()?;
        Ok(Self { settings, layout })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn layout(&self) -> &ContentLayout {
        &self.layout
    }

    /// Extensions recorded by the last successful run.
    pub fn load_snapshot(&self) -> ExtensionSet {
        ExtensionSet::from_snapshot(&self.settings.snapshot_path, &self.layout)
    }

    /// Extensions attached right now.
    pub fn load_live(&self) -> ExtensionSet {
        ExtensionSet::from_live_environment(&self.settings.manifest(), &self.layout)
    }

    /// Build a report for `old` -> `new` without applying anything.
    pub fn plan(&self, old: &ExtensionSet, new: &ExtensionSet) -> ReconcileReport {
        let diff = ExtensionsDiff::new(old, new);
        ReconcileReport {
            removed: diff.removed_extensions().iter().map(|r| r.key()).collect(),
            added: diff.added_extensions().iter().map(|r| r.key()).collect(),
            changes: diff.channel_changes(),
            snapshot_written: false,
            dry_run: true,
        }
    }

    /// Reconcile the snapshot with the live environment.
    ///
    /// Holds an exclusive lock beside the snapshot for the whole run. Changes
    /// are applied channel by channel; if the registry fails, the error is
    /// returned and the old snapshot is kept so the next run retries.
    pub fn run(
        &self,
        registry: &mut dyn ContentRegistry,
        options: ReconcileOptions,
    ) -> Result<ReconcileReport> {
        let _lock = FileLock::exclusive(&self.settings.lock_path())?;

        let old = self.load_snapshot();
        let new = self.load_live();
        let mut report = self.plan(&old, &new);
        report.dry_run = options.dry_run;

        if options.dry_run {
            tracing::info!(
                removed = report.removed.len(),
                added = report.added.len(),
                changes = report.changes.change_count(),
                "dry run, nothing applied"
            );
            return Ok(report);
        }

        let channels = apply_all(registry, &report.changes)?;

        new.save(&self.settings.snapshot_path)?;
        report.snapshot_written = true;

        tracing::info!(
            removed = report.removed.len(),
            added = report.added.len(),
            channels,
            changes = report.changes.change_count(),
            "reconciled content extensions"
        );
        Ok(report)
    }
}
