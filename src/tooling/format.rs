//! Text and JSON rendering for CLI output.

use crate::error::ApiError;
use crate::sketch::{
    CompilationEntry, EntryPlan, RequestKind, RequestTarget, ResolvedRequest, ResolvedSketch,
    SketchKind,
};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::Path;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn kind_label(kind: SketchKind) -> &'static str {
    match kind {
        SketchKind::File => "file",
        SketchKind::Directory => "directory",
    }
}

fn request_kind_label(kind: RequestKind) -> &'static str {
    match kind {
        RequestKind::WebSocketUpgrade => "websocket upgrade",
        RequestKind::Asset => "asset",
        RequestKind::SketchRoot => "sketch root",
    }
}

fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

pub fn format_sketch_list_text(sketches: &[&ResolvedSketch], root: &Path) -> String {
    let mut out = format!("{}\n\n", format_section_heading("Sketches"));
    if sketches.is_empty() {
        out.push_str(&format!("  No sketches found under {}\n", root.display()));
        return out;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Name", "Request path", "Kind", "Source"]);
    for sketch in sketches {
        table.add_row(vec![
            sketch.sketch_name.clone(),
            sketch.request_path.clone(),
            kind_label(sketch.kind).to_string(),
            display_path(&sketch.fs_path, root),
        ]);
    }
    out.push_str(&format!("{}\n\n", table));
    out.push_str(&format!("Total: {} sketch(es)\n", sketches.len()));
    out
}

pub fn format_sketch_list_json(sketches: &[&ResolvedSketch]) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(sketches)?)
}

#[derive(Serialize)]
struct ResolveOutput<'a> {
    kind: RequestKind,
    #[serde(flatten)]
    request: &'a ResolvedRequest,
}

pub fn format_resolved_request_text(request: &ResolvedRequest, kind: RequestKind) -> String {
    let mut out = format!("{}\n\n", format_section_heading("Resolved request"));
    out.push_str(&format!("  Request: {}\n", request.request_path));
    out.push_str(&format!(
        "  Sketch: {} ({})\n",
        request.sketch_name(),
        request.sketch.request_path
    ));
    out.push_str(&format!("  Kind: {}\n", request_kind_label(kind)));
    if let RequestTarget::Asset {
        fs_path,
        relative_path,
    } = &request.target
    {
        out.push_str(&format!("  File: {}\n", fs_path.display()));
        out.push_str(&format!("  Relative path: {}\n", relative_path));
    }
    out
}

pub fn format_resolved_request_json(
    request: &ResolvedRequest,
    kind: RequestKind,
) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(&ResolveOutput { kind, request })?)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanOutput<'a> {
    #[serde(flatten)]
    plan: &'a EntryPlan,
    compilation_entry: CompilationEntry,
}

pub fn format_entry_plan_text(plan: &EntryPlan, root: &Path) -> String {
    let mut out = format!(
        "{}\n\n",
        format_section_heading(&format!("Entry plan: {}", plan.sketch_name))
    );

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Key", "Exposed as", "Source", "Output"]);
    for entry in plan.ordered_entries() {
        let key = if entry.key == plan.main_key {
            format!("{} (main)", entry.key)
        } else {
            entry.key.clone()
        };
        let output = plan
            .output_file_name(&entry.key)
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            key,
            entry.exposed_name.clone(),
            display_path(&entry.source_path, root),
            output,
        ]);
    }
    out.push_str(&format!("{}\n\n", table));

    let compilation = match plan.compilation_entry() {
        CompilationEntry::Single(key) => key,
        CompilationEntry::Ordered(keys) => keys.join(" -> "),
    };
    out.push_str(&format!("Compilation entry: {}\n", compilation));
    out
}

pub fn format_entry_plan_json(plan: &EntryPlan) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(&PlanOutput {
        plan,
        compilation_entry: plan.compilation_entry(),
    })?)
}
