//! Building extension sets from the live manifest

use contentx_core::{ContentLayout, ExtensionSet, KeyFileManifest, ManifestEntry, StaticManifest};
use contentx_test_utils::{TestEnv, ext_ref};
use pretty_assertions::assert_eq;

fn layout(env: &TestEnv) -> ContentLayout {
    ContentLayout::with_default_prefix(env.extensions_dir()).unwrap()
}

fn live(env: &TestEnv) -> ExtensionSet {
    ExtensionSet::from_live_environment(&KeyFileManifest::at(env.manifest_path()), &layout(env))
}

fn keys(set: &ExtensionSet) -> Vec<String> {
    set.iter().map(|r| r.to_string()).collect()
}

#[test]
fn valid_extensions_are_loaded() {
    let env = TestEnv::new();
    env.add_extension("math", &[("math", &["n1"], &[])]);
    env.add_extension("art", &[("art", &["a1"], &[])]);
    env.attach(&[("math", "v1"), ("art", "v2")]);

    let set = live(&env);

    assert_eq!(keys(&set), vec!["art@v2", "math@v1"]);
}

#[test]
fn foreign_references_are_filtered_out() {
    let env = TestEnv::new();
    env.add_extension("math", &[]);
    env.attach_refs(&[
        ("org.freedesktop.Platform.ffmpeg-full", "abc"),
        (&ext_ref("math"), "v1"),
        ("org.learningequality.Kolibri.Content.bad-name", "v1"),
    ]);

    let set = live(&env);

    assert_eq!(keys(&set), vec!["math@v1"]);
}

#[test]
fn extensions_without_content_are_filtered_out() {
    let env = TestEnv::new();
    env.add_empty_extension("hollow");
    env.add_extension("math", &[]);
    env.attach(&[("hollow", "v1"), ("missing", "v1"), ("math", "v1")]);

    let set = live(&env);

    assert_eq!(keys(&set), vec!["math@v1"]);
}

#[test]
fn missing_manifest_is_empty_set() {
    let env = TestEnv::new();
    env.add_extension("math", &[]);

    let set = live(&env);

    assert!(set.is_empty());
}

#[test]
fn manifest_without_extension_key_is_empty_set() {
    let env = TestEnv::new();
    env.add_extension("math", &[]);
    env.write_manifest("[Application]\nname=org.learningequality.Kolibri\n");

    let set = live(&env);

    assert!(set.is_empty());
}

#[test]
fn malformed_manifest_items_are_skipped() {
    let env = TestEnv::new();
    env.add_extension("math", &[]);
    env.write_manifest(&format!(
        "[Instance]\napp-extensions=;garbage;{}=v1;\n",
        ext_ref("math")
    ));

    let set = live(&env);

    assert_eq!(keys(&set), vec!["math@v1"]);
}

#[test]
fn duplicate_entries_collapse() {
    let env = TestEnv::new();
    env.add_extension("math", &[]);
    let manifest = StaticManifest::new(vec![
        ManifestEntry::new(ext_ref("math"), "v1"),
        ManifestEntry::new(ext_ref("math"), "v1"),
        ManifestEntry::new(ext_ref("math"), "v2"),
    ]);

    let set = ExtensionSet::from_live_environment(&manifest, &layout(&env));

    assert_eq!(keys(&set), vec!["math@v1", "math@v2"]);
}

#[test]
fn content_dirs_point_into_extensions_dir() {
    let env = TestEnv::new();
    env.add_extension("math", &[]);
    env.attach(&[("math", "v1")]);

    let set = live(&env);

    assert_eq!(set.content_dirs(), vec![env.content_dir("math")]);
}

#[test]
fn live_content_is_resolved_lazily() {
    let env = TestEnv::new();
    env.add_extension("math", &[("math", &["n1"], &[])]);
    env.attach(&[("math", "v1")]);

    let set = live(&env);
    let record = set.get("math", "v1").unwrap();

    assert!(!record.is_content_resolved());
    assert_eq!(record.content_index().channels.len(), 1);
    assert!(record.is_content_resolved());
}
