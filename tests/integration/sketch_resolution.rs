use milka::error::ResolveError;
use milka::sketch::config::SidecarLoader;
use milka::sketch::{RequestTarget, SketchKind};
use milka::{IndexOptions, SketchIndex};

use crate::integration::support::SketchRoot;

#[test]
fn outer_sketch_shadows_nested_sketch() {
    let root = SketchRoot::new();
    root.file("outer/sketch.js", "")
        .file("outer/inner/sketch.js", "")
        .file("outer/inner/texture.png", "");

    let index = root.index();

    assert!(index.get_resolved_sketch("outer").is_some());
    assert!(index.get_resolved_sketch("inner").is_none());
    assert!(index.tables().sketch("/outer/inner").is_none());

    let asset = index.resolve_request("/outer/inner/texture.png").unwrap();
    assert_eq!(asset.sketch_name(), "outer");
    assert_eq!(asset.relative_file_request_path(), Some("inner/texture.png"));
}

#[test]
fn deeper_sketch_found_through_plain_directories() {
    let root = SketchRoot::new();
    root.file("collections/spring/bloom/sketch.js", "")
        .file("collections/readme.md", "");

    let index = root.index();
    let bloom = index.get_resolved_sketch("bloom").unwrap();
    assert_eq!(bloom.request_path, "/collections/spring/bloom");
    assert!(index.get_resolved_sketch("collections").is_none());
    assert!(index.get_resolved_sketch("spring").is_none());
}

#[test]
fn pass_through_segment_only_in_fs_path() {
    let root = SketchRoot::new();
    root.file("[drafts]/orbit/sketch.js", "")
        .file("[drafts]/moon.js", "");

    let index = root.index();
    for sketch in index.sketches() {
        assert!(!sketch.request_path.contains("[drafts]"));
        assert!(sketch.fs_path.starts_with(root.join("[drafts]")));
    }
    assert_eq!(index.sketches().count(), 2);
    assert_eq!(index.get_resolved_sketch("moon").unwrap().kind, SketchKind::File);
}

#[test]
fn renamed_entry_is_projected_under_output_name() {
    let root = SketchRoot::new();
    root.file("comet/main.js", "")
        .file(
            "comet/milka.config.json",
            r#"{"entry": "main", "outputName": "sketch"}"#,
        );

    let index = root.index();
    let main = index.resolve_request("/comet/main.js").unwrap();
    let projected = index.resolve_request("/comet/sketch.js").unwrap();

    assert_eq!(main.sketch, projected.sketch);
    assert_eq!(main.resolved_file(), projected.resolved_file());
    assert_eq!(projected.resolved_file(), Some(&root.join("comet/main.js")));
}

#[test]
fn malformed_sidecar_falls_back_to_defaults() {
    let root = SketchRoot::new();
    root.file("broken/sketch.js", "")
        .file("broken/milka.config.toml", "entry = [");

    let index = root.index();
    let broken = index.get_resolved_sketch("broken").unwrap();
    assert_eq!(index.sketch_config(broken, None).entry, "sketch");
}

#[test]
fn directory_without_entry_file_is_not_a_sketch() {
    let root = SketchRoot::new();
    root.file("assets/logo.png", "").file("assets/util.js", "");

    let index = root.index();
    assert_eq!(index.sketches().count(), 0);
    assert!(index.resolve_request("/assets/util.js").is_err());
}

#[test]
fn every_top_level_file_becomes_a_file_sketch() {
    let root = SketchRoot::new();
    root.file("notes.md", "").file("moon.js", "").file("orbit/readme.md", "");

    let index = root.index();
    let names: Vec<&str> = index.sketches().map(|s| s.sketch_name.as_str()).collect();
    assert_eq!(names, vec!["moon", "notes"]);

    let notes = index.resolve_request("/notes").unwrap();
    assert_eq!(notes.target, RequestTarget::Sketch);
    assert_eq!(notes.sketch.kind, SketchKind::File);
    assert_eq!(notes.sketch.fs_path, root.join("notes.md"));
    assert!(index.resolve_request("/orbit/readme").is_err());
}

#[test]
fn source_files_only_restricts_file_sketches() {
    let root = SketchRoot::new();
    root.file("notes.md", "").file("moon.js", "");

    let options = IndexOptions {
        source_files_only: true,
        ..IndexOptions::new(root.path())
    };
    let index = SketchIndex::build(options, &SidecarLoader);
    let names: Vec<&str> = index.sketches().map(|s| s.sketch_name.as_str()).collect();
    assert_eq!(names, vec!["moon"]);
    assert!(matches!(
        index.resolve_request("/notes"),
        Err(ResolveError::SketchNotFound { .. })
    ));
    assert!(matches!(
        index.resolve_request("/notes.md"),
        Err(ResolveError::UnownedAsset { .. })
    ));
}
