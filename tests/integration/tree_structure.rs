use milka::tree::path::is_pass_through_dir;
use milka::tree::{NodeKind, TreeBuilder};
use proptest::prelude::*;

use crate::integration::support::SketchRoot;

#[test]
fn tree_mirrors_directory_layout() {
    let root = SketchRoot::new();
    root.file("moon.js", "")
        .file("orbit/sketch.js", "")
        .file("orbit/assets/star.png", "")
        .dir("empty");

    let built = TreeBuilder::new(root.path().to_path_buf()).build();
    let tree = &built.tree;

    let orbit = tree.find("/orbit").unwrap();
    assert_eq!(orbit.kind, NodeKind::Directory);
    assert_eq!(orbit.fs_path, root.join("orbit"));
    assert!(tree.find("/orbit/assets/star.png").unwrap().is_file());
    assert!(tree.find("/empty").unwrap().is_dir());
    assert!(tree.find("/missing").is_none());

    let names: Vec<&str> = tree
        .children(tree.root())
        .into_iter()
        .filter_map(|id| tree.node(id))
        .map(|node| node.name.as_str())
        .collect();
    assert_eq!(names, vec!["empty", "moon.js", "orbit"]);
}

#[test]
fn file_table_excludes_sidecars_and_directories() {
    let root = SketchRoot::new();
    root.file("comet/main.js", "")
        .file("comet/milka.config.toml", "entry = \"main\"\n")
        .file("comet/notes.txt", "");

    let built = TreeBuilder::new(root.path().to_path_buf()).build();

    assert_eq!(
        built.files.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["/comet/main.js", "/comet/notes.txt"]
    );
    // still attached to the tree so resolution can find it
    assert!(built.tree.find("/comet/milka.config.toml").is_some());
}

#[test]
fn nested_pass_through_directories_flatten() {
    let root = SketchRoot::new();
    root.file("[gallery]/[2024]/orbit/sketch.js", "");

    let built = TreeBuilder::new(root.path().to_path_buf()).build();

    assert!(built.tree.find("/[gallery]").is_none());
    let orbit = built.tree.find("/orbit").unwrap();
    assert_eq!(orbit.fs_path, root.join("[gallery]/[2024]/orbit"));
    assert_eq!(
        built.files.get("/orbit/sketch.js"),
        Some(&root.join("[gallery]/[2024]/orbit/sketch.js"))
    );
}

#[test]
fn missing_root_builds_empty_tree() {
    let root = SketchRoot::new();
    let built = TreeBuilder::new(root.join("does-not-exist")).build();
    assert!(built.tree.is_empty());
    assert!(built.files.is_empty());
}

#[cfg(unix)]
#[test]
fn unreadable_directory_is_skipped() {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    let root = SketchRoot::new();
    root.file("moon.js", "").file("locked/secret.js", "");
    let locked = root.join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    let built = TreeBuilder::new(root.path().to_path_buf()).build();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert!(built.files.contains_key("/moon.js"));
    // root can read anything; only assert the secret is absent when permissions applied
    if built.tree.find("/locked/secret.js").is_none() {
        assert!(!built.files.contains_key("/locked/secret.js"));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn pass_through_directories_vanish_from_request_paths(
        groups in prop::collection::vec("[a-z]{1,5}", 1..4),
        sketch in "[a-z]{1,6}",
        helper in "[a-z]{1,6}",
    ) {
        let root = SketchRoot::new();
        let group_path: String = groups.iter().map(|g| format!("[{}]/", g)).collect();
        root.file(&format!("{}{}/sketch.js", group_path, sketch), "")
            .file(&format!("{}{}/lib/{}.js", group_path, sketch, helper), "");

        let built = TreeBuilder::new(root.path().to_path_buf()).build();
        for (_, node) in built.tree.iter() {
            prop_assert!(!node.request_path.split('/').any(is_pass_through_dir));

            let relative = node.fs_path.strip_prefix(root.path()).unwrap();
            let visible: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().to_string())
                .filter(|segment| !is_pass_through_dir(segment))
                .collect();
            prop_assert_eq!(&node.request_path, &format!("/{}", visible.join("/")));
        }

        let index = root.index();
        let resolved = index.get_resolved_sketch(&sketch).unwrap();
        prop_assert_eq!(&resolved.request_path, &format!("/{}", sketch));
        prop_assert_eq!(&resolved.fs_path, &root.join(&format!("{}{}", group_path, sketch)));
        prop_assert_eq!(
            index.resolve_file(&format!("/{}/lib/{}.js", sketch, helper)),
            Some(&root.join(&format!("{}{}/lib/{}.js", group_path, sketch, helper)))
        );
    }
}
