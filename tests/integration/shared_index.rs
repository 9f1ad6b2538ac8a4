use milka::sketch::config::SidecarLoader;
use milka::{IndexOptions, SharedIndex};
use std::fs;
use std::sync::Arc;

use crate::integration::support::SketchRoot;

fn shared(root: &SketchRoot) -> SharedIndex {
    SharedIndex::build(IndexOptions::new(root.path()), Arc::new(SidecarLoader))
}

#[test]
fn rebuild_publishes_new_sketches() {
    let root = SketchRoot::new();
    root.file("moon.js", "");
    let shared = shared(&root);
    assert!(shared.snapshot().get_resolved_sketch("orbit").is_none());

    root.file("orbit/sketch.js", "");
    let outcome = shared.rebuild();

    assert!(shared.snapshot().get_resolved_sketch("orbit").is_some());
    assert_eq!(outcome.generation, 2);
    assert_eq!(shared.generation(), 2);
}

#[test]
fn readers_keep_their_snapshot_across_rebuild() {
    let root = SketchRoot::new();
    root.file("orbit/sketch.js", "").file("orbit/star.png", "");
    let shared = shared(&root);

    let held = shared.snapshot();
    fs::remove_file(root.join("orbit/star.png")).unwrap();
    shared.rebuild();

    assert!(held.resolve_request("/orbit/star.png").is_ok());
    assert!(shared.snapshot().resolve_request("/orbit/star.png").is_err());
}

#[test]
fn sidecar_edit_takes_effect_after_rebuild() {
    let root = SketchRoot::new();
    root.file("comet/sketch.js", "").file("comet/main.js", "");
    let shared = shared(&root);
    assert!(shared.snapshot().resolve_file("/comet/bundle.js").is_none());

    root.file(
        "comet/milka.config.json",
        r#"{"entry": "main", "outputName": "bundle"}"#,
    );
    let outcome = shared.rebuild();

    assert!(outcome.previous.resolve_file("/comet/bundle.js").is_none());
    assert_eq!(
        outcome.next.resolve_file("/comet/bundle.js"),
        Some(&root.join("comet/main.js"))
    );
}

#[test]
fn each_rebuild_reports_the_generation_it_published() {
    let root = SketchRoot::new();
    root.file("moon.js", "");
    let shared = Arc::new(shared(&root));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let shared = Arc::clone(&shared);
            std::thread::spawn(move || {
                (0..5)
                    .map(|_| shared.rebuild().generation)
                    .collect::<Vec<u64>>()
            })
        })
        .collect();
    let mut generations: Vec<u64> = handles
        .into_iter()
        .flat_map(|handle| handle.join().unwrap())
        .collect();
    generations.sort_unstable();

    assert_eq!(generations, (2..=21).collect::<Vec<u64>>());
}
