//! The host application's content registry, as seen from reconciliation.

use crate::diff::{ChannelChanges, ItemChange};
use crate::error::Result;

/// Receives content changes one channel at a time.
///
/// Implemented by the host; the method is called once per channel that has
/// changes, with changes in the order they were produced.
pub trait ContentRegistry {
    /// Apply the changes for one channel.
    fn apply_channel(&mut self, channel_id: &str, changes: &[ItemChange]) -> Result<()>;
}

/// Apply all grouped changes, stopping at the first channel that fails.
pub fn apply_all(registry: &mut dyn ContentRegistry, changes: &ChannelChanges) -> Result<usize> {
    let mut applied = 0;
    for (channel_id, channel_changes) in changes.iter() {
        registry.apply_channel(channel_id, channel_changes)?;
        tracing::debug!(channel_id, changes = channel_changes.len(), "applied channel changes");
        applied += 1;
    }
    Ok(applied)
}

/// In-memory registry that records what it was asked to apply.
#[derive(Debug, Clone, Default)]
pub struct RecordingRegistry {
    applied: Vec<(String, Vec<ItemChange>)>,
}

impl RecordingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Channels and their changes, in application order.
    pub fn applied(&self) -> &[(String, Vec<ItemChange>)] {
        &self.applied
    }
}

impl ContentRegistry for RecordingRegistry {
    fn apply_channel(&mut self, channel_id: &str, changes: &[ItemChange]) -> Result<()> {
        self.applied.push((channel_id.to_string(), changes.to_vec()));
        Ok(())
    }
}
