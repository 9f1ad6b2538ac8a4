use milka::config::MilkaConfig;
use milka::tooling::cli::{CliContext, Commands};

use crate::integration::support::SketchRoot;

fn context(root: &SketchRoot) -> CliContext {
    let mut config = MilkaConfig::default();
    config.sketches.root = root.path().to_path_buf();
    CliContext::new(config).unwrap()
}

#[test]
fn sketches_json_contract_has_required_fields() {
    let root = SketchRoot::new();
    root.file("moon.js", "").file("orbit/sketch.js", "");
    let cli = context(&root);

    let output = cli
        .execute(&Commands::Sketches {
            format: "json".to_string(),
        })
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    let sketches = parsed.as_array().unwrap();
    assert_eq!(sketches.len(), 2);
    for sketch in sketches {
        assert!(sketch.get("sketchName").and_then(|v| v.as_str()).is_some());
        assert!(sketch.get("requestPath").and_then(|v| v.as_str()).is_some());
        assert!(sketch.get("fsPath").and_then(|v| v.as_str()).is_some());
        assert!(sketch.get("kind").and_then(|v| v.as_str()).is_some());
    }
}

#[test]
fn resolve_json_contract_has_required_fields() {
    let root = SketchRoot::new();
    root.file("orbit/sketch.js", "").file("orbit/star.png", "");
    let cli = context(&root);

    let output = cli
        .execute(&Commands::Resolve {
            path: "/orbit/star.png".to_string(),
            upgrade: false,
            format: "json".to_string(),
        })
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["kind"], "asset");
    assert_eq!(parsed["request_path"], "/orbit/star.png");
    assert_eq!(parsed["target"]["type"], "asset");
    assert_eq!(parsed["target"]["relative_path"], "star.png");
}

#[test]
fn plan_json_contract_has_required_fields() {
    let root = SketchRoot::new();
    root.file("orbit/sketch.js", "");
    let cli = context(&root);

    let output = cli
        .execute(&Commands::Plan {
            sketch: "orbit".to_string(),
            format: "json".to_string(),
        })
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["sketchName"], "orbit");
    assert_eq!(parsed["mainKey"], "sketch");
    assert_eq!(parsed["compilationEntry"], "sketch");
    let entries = parsed["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].get("sourcePath").is_some());
    assert_eq!(entries[0]["exposedName"], "orbit");
}

#[test]
fn empty_root_lists_no_sketches() {
    let root = SketchRoot::new();
    root.dir("[drafts]");
    let cli = context(&root);

    let output = cli
        .execute(&Commands::Sketches {
            format: "text".to_string(),
        })
        .unwrap();
    assert!(output.contains("No sketches found"));
}
