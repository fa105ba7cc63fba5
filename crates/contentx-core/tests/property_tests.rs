use contentx_core::{
    Channel, ContentIndex, ContentLayout, Direction, ExtensionRecord, ExtensionSet, RecordKey,
    SnapshotEntry, reconcile,
};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn layout() -> ContentLayout {
    ContentLayout::with_default_prefix("/unused").unwrap()
}

fn channel_strategy() -> impl Strategy<Value = Channel> {
    (
        "[a-c]",
        prop::collection::vec("n[0-4]", 0..4),
        prop::collection::vec("n[0-4]", 0..2),
    )
        .prop_map(|(id, nodes, excluded)| Channel::new(id, nodes, excluded))
}

fn record_strategy() -> impl Strategy<Value = ExtensionRecord> {
    (
        "[p-s]",
        "v[1-2]",
        prop::collection::vec(channel_strategy(), 0..3),
    )
        .prop_map(|(name, version, channels)| {
            let entry = SnapshotEntry {
                reference: format!("org.learningequality.Kolibri.Content.{name}"),
                name,
                version,
                content: Some(ContentIndex::new(channels)),
            };
            ExtensionRecord::from_snapshot_entry(&layout(), entry).unwrap()
        })
}

fn set_strategy() -> impl Strategy<Value = ExtensionSet> {
    prop::collection::vec(record_strategy(), 0..5).prop_map(|records| records.into_iter().collect())
}

fn keys(records: &[&ExtensionRecord]) -> BTreeSet<RecordKey> {
    records.iter().map(|r| r.key()).collect()
}

fn all_keys(set: &ExtensionSet) -> BTreeSet<RecordKey> {
    set.iter().map(|r| r.key()).collect()
}

proptest! {
    #[test]
    fn diff_against_self_is_empty(set in set_strategy()) {
        prop_assert!(set.difference(&set).is_empty());
        prop_assert!(reconcile(&set, &set).is_empty());
    }

    #[test]
    fn difference_matches_key_sets(a in set_strategy(), b in set_strategy()) {
        let expected_a: BTreeSet<_> = all_keys(&a).difference(&all_keys(&b)).cloned().collect();
        let expected_b: BTreeSet<_> = all_keys(&b).difference(&all_keys(&a)).cloned().collect();

        prop_assert_eq!(keys(&a.difference(&b)), expected_a);
        prop_assert_eq!(keys(&b.difference(&a)), expected_b);
    }

    #[test]
    fn swapping_old_and_new_reverses_changes(a in set_strategy(), b in set_strategy()) {
        let mut forward = reconcile(&a, &b).reversed().to_flat();
        let mut backward = reconcile(&b, &a).to_flat();
        forward.sort();
        backward.sort();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn removals_precede_additions_in_every_channel(a in set_strategy(), b in set_strategy()) {
        let changes = reconcile(&a, &b);
        for (_, channel_changes) in changes.iter() {
            let first_added = channel_changes
                .iter()
                .position(|c| c.direction == Direction::Added)
                .unwrap_or(channel_changes.len());
            prop_assert!(channel_changes[first_added..]
                .iter()
                .all(|c| c.direction == Direction::Added));
        }
    }

    #[test]
    fn diff_is_deterministic(a in set_strategy(), b in set_strategy()) {
        prop_assert_eq!(reconcile(&a, &b), reconcile(&a, &b));
    }
}
