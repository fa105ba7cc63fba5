//! Reconciliation of two extension sets into per-channel content changes.
//!
//! Diffing is a pure function of an old and a new [`ExtensionSet`]:
//!
//! 1. extensions in `old` but not `new` are removed, the reverse are added;
//! 2. every node and exclusion of every channel of a removed (added)
//!    extension becomes a `Removed` (`Added`) [`ChannelChange`];
//! 3. changes are grouped by channel into [`ChannelChanges`], since the host
//!    registry applies changes one channel at a time.
//!
//! Opposite changes to the same item are never cancelled against each
//! other. When a node moves from one extension to another both the removal
//! and the addition are kept, in that order.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::record::ExtensionRecord;
use crate::set::ExtensionSet;

/// What a change applies to within a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// A content node made available by an extension.
    Item,
    /// A content node an extension explicitly hides.
    Exclusion,
}

/// Whether the item or exclusion appeared or went away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Added,
    Removed,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Self::Added => Self::Removed,
            Self::Removed => Self::Added,
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Item => write!(f, "item"),
            Self::Exclusion => write!(f, "exclusion"),
        }
    }
}

/// A change scoped to one channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ItemChange {
    pub kind: ChangeKind,
    pub direction: Direction,
    pub item_id: String,
}

impl ItemChange {
    pub fn new(kind: ChangeKind, direction: Direction, item_id: impl Into<String>) -> Self {
        Self {
            kind,
            direction,
            item_id: item_id.into(),
        }
    }

    pub fn reversed(&self) -> Self {
        Self {
            direction: self.direction.reversed(),
            ..self.clone()
        }
    }
}

/// A flat change before grouping: `(channel, kind, direction, item)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ChannelChange {
    pub channel_id: String,
    pub kind: ChangeKind,
    pub direction: Direction,
    pub item_id: String,
}

impl ChannelChange {
    fn into_parts(self) -> (String, ItemChange) {
        (
            self.channel_id,
            ItemChange {
                kind: self.kind,
                direction: self.direction,
                item_id: self.item_id,
            },
        )
    }
}

/// Changes grouped by channel.
///
/// Channels iterate in id order; each channel's list keeps the order in
/// which changes were produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChannelChanges {
    channels: BTreeMap<String, Vec<ItemChange>>,
}

impl ChannelChanges {
    /// Group flat changes by channel in a single pass.
    pub fn from_changes(changes: impl IntoIterator<Item = ChannelChange>) -> Self {
        let mut channels: BTreeMap<String, Vec<ItemChange>> = BTreeMap::new();
        for change in changes {
            let (channel_id, item) = change.into_parts();
            channels.entry(channel_id).or_default().push(item);
        }
        Self { channels }
    }

    /// Changes for one channel.
    pub fn get(&self, channel_id: &str) -> Option<&[ItemChange]> {
        self.channels.get(channel_id).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ItemChange])> {
        self.channels
            .iter()
            .map(|(id, changes)| (id.as_str(), changes.as_slice()))
    }

    pub fn channel_ids(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }

    /// Number of channels with changes.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Total number of changes across all channels.
    pub fn change_count(&self) -> usize {
        self.channels.values().map(Vec::len).sum()
    }

    /// Number of changes in `direction` across all channels.
    pub fn count(&self, direction: Direction) -> usize {
        self.channels
            .values()
            .flatten()
            .filter(|c| c.direction == direction)
            .count()
    }

    /// The same changes with every direction flipped.
    pub fn reversed(&self) -> Self {
        Self {
            channels: self
                .channels
                .iter()
                .map(|(id, changes)| {
                    (id.clone(), changes.iter().map(ItemChange::reversed).collect())
                })
                .collect(),
        }
    }

    /// Back to flat changes, channel by channel.
    pub fn to_flat(&self) -> Vec<ChannelChange> {
        self.iter()
            .flat_map(|(channel_id, changes)| {
                changes.iter().map(move |c| ChannelChange {
                    channel_id: channel_id.to_string(),
                    kind: c.kind,
                    direction: c.direction,
                    item_id: c.item_id.clone(),
                })
            })
            .collect()
    }
}

/// The difference between a previous and a current extension set.
#[derive(Debug, Clone, Copy)]
pub struct ExtensionsDiff<'a> {
    old: &'a ExtensionSet,
    new: &'a ExtensionSet,
}

impl<'a> ExtensionsDiff<'a> {
    pub fn new(old: &'a ExtensionSet, new: &'a ExtensionSet) -> Self {
        Self { old, new }
    }

    /// Extensions attached before but not now, ordered by key.
    pub fn removed_extensions(&self) -> Vec<&'a ExtensionRecord> {
        ExtensionSet::removed(self.old, self.new)
    }

    /// Extensions attached now but not before, ordered by key.
    pub fn added_extensions(&self) -> Vec<&'a ExtensionRecord> {
        ExtensionSet::added(self.old, self.new)
    }

    /// Whether any extension was attached or detached.
    pub fn has_changes(&self) -> bool {
        !self.removed_extensions().is_empty() || !self.added_extensions().is_empty()
    }

    /// Flat content changes: all removals, then all additions.
    ///
    /// Every extension contributes its own entries; a tuple shared by two
    /// extensions appears once per extension.
    pub fn content_changes(&self) -> Vec<ChannelChange> {
        let removed = self
            .removed_extensions()
            .into_iter()
            .flat_map(|extension| extension_changes(extension, Direction::Removed));
        let added = self
            .added_extensions()
            .into_iter()
            .flat_map(|extension| extension_changes(extension, Direction::Added));

        removed.chain(added).collect()
    }

    /// Content changes grouped by channel.
    pub fn channel_changes(&self) -> ChannelChanges {
        ChannelChanges::from_changes(self.content_changes())
    }
}

/// Every node and exclusion an extension contributes, tagged `direction`.
fn extension_changes(
    extension: &ExtensionRecord,
    direction: Direction,
) -> impl Iterator<Item = ChannelChange> + '_ {
    extension
        .content_index()
        .channels
        .iter()
        .flat_map(move |channel| {
            let change = move |kind, item_id: &String| ChannelChange {
                channel_id: channel.channel_id.clone(),
                kind,
                direction,
                item_id: item_id.clone(),
            };
            let items = channel.node_ids.iter().map(move |id| change(ChangeKind::Item, id));
            let exclusions = channel
                .exclude_node_ids
                .iter()
                .map(move |id| change(ChangeKind::Exclusion, id));
            items.chain(exclusions)
        })
}

/// Diff `old` against `new` and group the result by channel.
pub fn reconcile(old: &ExtensionSet, new: &ExtensionSet) -> ChannelChanges {
    ExtensionsDiff::new(old, new).channel_changes()
}
