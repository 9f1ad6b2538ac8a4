use milka::error::PlanError;
use milka::sketch::{CompilationEntry, SketchConfig};
use proptest::prelude::*;

use crate::integration::support::SketchRoot;

#[test]
fn main_entry_is_always_last() {
    let root = SketchRoot::new();
    root.file("orbit/a_util.js", "")
        .file("orbit/sketch.js", "")
        .file("orbit/z_util.js", "");

    let index = root.index();
    let orbit = index.get_resolved_sketch("orbit").unwrap();
    let plan = index.plan_entries(orbit, None).unwrap();

    let keys: Vec<&str> = plan.ordered_entries().iter().map(|e| e.key.as_str()).collect();
    assert_eq!(keys, vec!["a_util", "z_util", "sketch"]);
    assert_eq!(
        plan.compilation_entry(),
        CompilationEntry::Ordered(vec![
            "a_util".to_string(),
            "z_util".to_string(),
            "sketch".to_string()
        ])
    );
    let main = plan.main_entry().unwrap();
    assert_eq!(main.exposed_name, "orbit");
}

#[test]
fn nested_sources_keep_relative_dir() {
    let root = SketchRoot::new();
    root.file("orbit/sketch.js", "")
        .file("orbit/lib/shapes/circle.js", "")
        .file("orbit/lib/noise.js", "");

    let index = root.index();
    let orbit = index.get_resolved_sketch("orbit").unwrap();
    let plan = index.plan_entries(orbit, None).unwrap();

    let circle = plan.entries.iter().find(|e| e.key == "circle").unwrap();
    assert_eq!(circle.relative_dir.as_deref(), Some("lib/shapes/"));
    assert_eq!(
        plan.output_file_name("circle").as_deref(),
        Some("lib/shapes/circle.js")
    );
    let main = plan.main_entry().unwrap();
    assert_eq!(main.relative_dir, None);
}

#[test]
fn single_source_directory_collapses_like_file_sketch() {
    let root = SketchRoot::new();
    root.file("moon.js", "").file("orbit/sketch.js", "");

    let index = root.index();
    let file_plan = index
        .plan_entries(index.get_resolved_sketch("moon").unwrap(), None)
        .unwrap();
    let dir_plan = index
        .plan_entries(index.get_resolved_sketch("orbit").unwrap(), None)
        .unwrap();

    assert_eq!(file_plan.compilation_entry(), CompilationEntry::Single("sketch".to_string()));
    assert_eq!(dir_plan.compilation_entry(), file_plan.compilation_entry());
    assert_eq!(dir_plan.entries.len(), 1);
    assert_eq!(dir_plan.entries[0].key, file_plan.entries[0].key);
    assert_eq!(dir_plan.entries[0].relative_dir, file_plan.entries[0].relative_dir);
}

#[test]
fn explicit_config_overrides_discovered_one() {
    let root = SketchRoot::new();
    root.file("comet/sketch.js", "").file("comet/main.js", "");

    let index = root.index();
    let comet = index.get_resolved_sketch("comet").unwrap();
    let config = SketchConfig {
        entry: "main".to_string(),
        output_name: "bundle".to_string(),
        ..Default::default()
    };
    let plan = index.plan_entries(comet, Some(&config)).unwrap();

    assert_eq!(plan.main_key, "bundle");
    assert_eq!(plan.main_entry().unwrap().source_path, root.join("comet/main.js"));
    assert_eq!(plan.ordered_entries().last().unwrap().key, "bundle");
}

#[test]
fn nested_sketch_file_does_not_replace_outer_main_entry() {
    let root = SketchRoot::new();
    root.file("outer/sketch.js", "").file("outer/inner/sketch.js", "");

    let index = root.index();
    assert!(index.get_resolved_sketch("inner").is_none());
    let outer = index.get_resolved_sketch("outer").unwrap();
    let plan = index.plan_entries(outer, None).unwrap();

    let main = plan.main_entry().unwrap();
    assert_eq!(main.source_path, root.join("outer/sketch.js"));
    assert_eq!(main.relative_dir, None);
    assert_eq!(main.exposed_name, "outer");
    assert_eq!(plan.entries.len(), 1);
    assert_eq!(plan.compilation_entry(), CompilationEntry::Single("sketch".to_string()));
    assert_eq!(plan.output_file_name("sketch").as_deref(), Some("sketch.js"));
}

#[test]
fn nested_lib_entry_name_stays_auxiliary() {
    let root = SketchRoot::new();
    root.file("orbit/sketch.js", "")
        .file("orbit/lib/sketch.js", "")
        .file("orbit/lib/noise.js", "");

    let index = root.index();
    let orbit = index.get_resolved_sketch("orbit").unwrap();
    let plan = index.plan_entries(orbit, None).unwrap();

    let main = plan.main_entry().unwrap();
    assert_eq!(main.source_path, root.join("orbit/sketch.js"));
    assert_eq!(main.relative_dir, None);
    assert!(plan
        .entries
        .iter()
        .all(|e| e.source_path != root.join("orbit/lib/sketch.js")));
    assert_eq!(plan.compilation_entry().keys(), vec!["noise", "sketch"]);
}

#[test]
fn missing_main_entry_is_an_error() {
    let root = SketchRoot::new();
    root.file("comet/sketch.js", "").file("comet/tail.js", "");

    let index = root.index();
    let comet = index.get_resolved_sketch("comet").unwrap();
    let config = SketchConfig {
        entry: "nucleus".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        index.plan_entries(comet, Some(&config)),
        Err(PlanError::MissingMainEntry { .. })
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn main_key_appears_exactly_once_at_end(
        helpers in prop::collection::btree_set("[a-r][a-z]{0,6}", 1..6)
    ) {
        let root = SketchRoot::new();
        root.file("orbit/sketch.js", "");
        for helper in &helpers {
            root.file(&format!("orbit/{}.js", helper), "");
        }

        let index = root.index();
        let orbit = index.get_resolved_sketch("orbit").unwrap();
        let plan = index.plan_entries(orbit, None).unwrap();
        let keys: Vec<String> = plan.ordered_entries().iter().map(|e| e.key.clone()).collect();

        prop_assert_eq!(keys.iter().filter(|k| *k == "sketch").count(), 1);
        prop_assert_eq!(keys.last().map(String::as_str), Some("sketch"));
        let expected: Vec<String> = helpers.iter().cloned().collect();
        prop_assert_eq!(&keys[..keys.len() - 1], expected.as_slice());
    }
}
