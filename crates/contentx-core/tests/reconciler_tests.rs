//! End-to-end reconciliation runs against a sandbox

use contentx_core::{
    ChangeKind, ContentRegistry, Direction, Error, ItemChange, ReconcileOptions, Reconciler,
    RecordingRegistry, Result, Settings,
};
use contentx_test_utils::TestEnv;
use pretty_assertions::assert_eq;

fn reconciler(env: &TestEnv) -> Reconciler {
    Reconciler::new(Settings::rooted_at(env.root())).unwrap()
}

fn item(direction: Direction, id: &str) -> ItemChange {
    ItemChange::new(ChangeKind::Item, direction, id)
}

struct RejectingRegistry;

impl ContentRegistry for RejectingRegistry {
    fn apply_channel(&mut self, channel_id: &str, _changes: &[ItemChange]) -> Result<()> {
        Err(Error::registry(channel_id, "database is locked"))
    }
}

#[test]
fn test_env_matches_rooted_settings() {
    let env = TestEnv::new();
    let settings = Settings::rooted_at(env.root());
    assert_eq!(settings.manifest_path, env.manifest_path());
    assert_eq!(settings.extensions_dir, env.extensions_dir());
    assert_eq!(settings.snapshot_path, env.snapshot_path());
}

#[test]
fn second_run_is_quiet_for_unicode_names() {
    let env = TestEnv::new();
    env.add_extension("cafe\u{301}", &[("c", &["n1"], &[])]);
    env.attach(&[("cafe\u{301}", "v1")]);
    let reconciler = reconciler(&env);

    let first = reconciler
        .run(&mut RecordingRegistry::new(), ReconcileOptions::default())
        .unwrap();
    assert_eq!(first.added.len(), 1);

    let second = reconciler
        .run(&mut RecordingRegistry::new(), ReconcileOptions::default())
        .unwrap();
    assert!(!second.has_changes());
    assert!(second.changes.is_empty());
}

#[test]
fn first_run_adds_everything_and_writes_snapshot() {
    let env = TestEnv::new();
    env.add_extension("math", &[("math", &["n1", "n2"], &["n3"])]);
    env.attach(&[("math", "v1")]);

    let mut registry = RecordingRegistry::new();
    let report = reconciler(&env)
        .run(&mut registry, ReconcileOptions::default())
        .unwrap();

    assert!(report.has_changes());
    assert!(report.snapshot_written);
    assert_eq!(report.added.len(), 1);
    assert!(report.removed.is_empty());
    assert_eq!(
        registry.applied(),
        &[(
            "math".to_string(),
            vec![
                item(Direction::Added, "n1"),
                item(Direction::Added, "n2"),
                ItemChange::new(ChangeKind::Exclusion, Direction::Added, "n3"),
            ]
        )]
    );
    assert!(env.snapshot_exists());
}

#[test]
fn second_run_without_changes_is_a_no_op() {
    let env = TestEnv::new();
    env.add_extension("math", &[("math", &["n1"], &[])]);
    env.attach(&[("math", "v1")]);
    let reconciler = reconciler(&env);

    reconciler
        .run(&mut RecordingRegistry::new(), ReconcileOptions::default())
        .unwrap();
    let mut registry = RecordingRegistry::new();
    let report = reconciler
        .run(&mut registry, ReconcileOptions::default())
        .unwrap();

    assert!(!report.has_changes());
    assert!(report.changes.is_empty());
    assert!(registry.applied().is_empty());
}

#[test]
fn swapping_extensions_removes_then_adds() {
    let env = TestEnv::new();
    env.add_extension("a", &[("math", &["n1", "n2"], &[])]);
    env.attach(&[("a", "v1")]);
    let reconciler = reconciler(&env);
    reconciler
        .run(&mut RecordingRegistry::new(), ReconcileOptions::default())
        .unwrap();

    env.remove_extension("a");
    env.add_extension("b", &[("math", &["n2", "n3"], &[])]);
    env.attach(&[("b", "v1")]);

    let mut registry = RecordingRegistry::new();
    let report = reconciler
        .run(&mut registry, ReconcileOptions::default())
        .unwrap();

    assert_eq!(report.removed[0].name, "a");
    assert_eq!(report.added[0].name, "b");
    assert_eq!(
        report.changes.get("math").unwrap(),
        &[
            item(Direction::Removed, "n1"),
            item(Direction::Removed, "n2"),
            item(Direction::Added, "n2"),
            item(Direction::Added, "n3"),
        ]
    );
    assert_eq!(registry.applied().len(), 1);
}

#[test]
fn removed_extension_content_comes_from_snapshot() {
    let env = TestEnv::new();
    env.add_extension("a", &[("math", &["n1"], &[])]);
    env.attach(&[("a", "v1")]);
    let reconciler = reconciler(&env);
    reconciler
        .run(&mut RecordingRegistry::new(), ReconcileOptions::default())
        .unwrap();

    // The extension's files are gone by the time we notice it was detached
    env.remove_extension("a");
    env.attach(&[]);

    let report = reconciler
        .run(&mut RecordingRegistry::new(), ReconcileOptions::default())
        .unwrap();

    assert_eq!(
        report.changes.get("math").unwrap(),
        &[item(Direction::Removed, "n1")]
    );
}

#[test]
fn dry_run_leaves_snapshot_and_registry_alone() {
    let env = TestEnv::new();
    env.add_extension("math", &[("math", &["n1"], &[])]);
    env.attach(&[("math", "v1")]);

    let mut registry = RecordingRegistry::new();
    let report = reconciler(&env)
        .run(&mut registry, ReconcileOptions { dry_run: true })
        .unwrap();

    assert!(report.dry_run);
    assert!(!report.snapshot_written);
    assert_eq!(report.changes.change_count(), 1);
    assert!(registry.applied().is_empty());
    assert!(!env.snapshot_exists());
}

#[test]
fn registry_failure_keeps_previous_snapshot() {
    let env = TestEnv::new();
    env.write_snapshot_raw("[]");
    env.add_extension("math", &[("math", &["n1"], &[])]);
    env.attach(&[("math", "v1")]);
    let reconciler = reconciler(&env);

    let err = reconciler
        .run(&mut RejectingRegistry, ReconcileOptions::default())
        .unwrap_err();

    assert!(matches!(err, Error::Registry { ref channel_id, .. } if channel_id == "math"));
    assert_eq!(env.read_snapshot(), serde_json::json!([]));

    // The retry sees the same pending change
    let report = reconciler
        .run(&mut RecordingRegistry::new(), ReconcileOptions::default())
        .unwrap();
    assert_eq!(report.changes.change_count(), 1);
}

#[test]
fn lock_file_is_created_beside_snapshot() {
    let env = TestEnv::new();
    let reconciler = reconciler(&env);

    reconciler
        .run(&mut RecordingRegistry::new(), ReconcileOptions::default())
        .unwrap();

    assert!(reconciler.settings().lock_path().exists());
    assert!(env.snapshot_exists());
}

#[test]
fn plan_reports_without_side_effects() {
    let env = TestEnv::new();
    env.add_extension("math", &[("math", &["n1"], &[])]);
    env.attach(&[("math", "v1")]);
    let reconciler = reconciler(&env);

    let report = reconciler.plan(&reconciler.load_snapshot(), &reconciler.load_live());

    assert_eq!(report.added[0].to_string(), "math@v1");
    assert!(!env.snapshot_exists());
}
