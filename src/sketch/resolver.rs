//! Sketch resolution over a built tree.
//!
//! Breadth-first walk from the root's children classifying nodes as sketch
//! roots or plain containers. The first sketch boundary found on a branch
//! wins: nothing below a resolved sketch root is resolved independently.

use crate::sketch::config::{
    is_sidecar_name, load_sidecar, SketchConfig, SketchConfigLoader, DEFAULT_SOURCE_EXTENSION,
};
use crate::tree::builder::FileTable;
use crate::tree::node::{NodeKind, SketchTree};
use crate::tree::path::{file_extension, file_stem, join_request_path, ROOT_REQUEST_PATH};
use crate::types::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Whether a sketch is a single source file or a directory project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SketchKind {
    File,
    Directory,
}

/// An addressable sketch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSketch {
    /// Canonical identity: file stem or directory name
    pub sketch_name: String,
    /// Canonical URL prefix serving this sketch
    pub request_path: String,
    pub fs_path: PathBuf,
    pub kind: SketchKind,
}

impl ResolvedSketch {
    pub fn is_file(&self) -> bool {
        self.kind == SketchKind::File
    }

    pub fn is_dir(&self) -> bool {
        self.kind == SketchKind::Directory
    }
}

/// Lookup tables produced by resolution.
///
/// Everything is keyed by normalized request path (or sketch name); nothing
/// here references tree nodes, so a rebuild replaces tree and tables together.
#[derive(Debug, Clone, Default)]
pub struct ResolutionTables {
    /// Request path -> filesystem path for servable files
    pub files: FileTable,
    /// Sketch request path -> resolved sketch
    pub sketches: BTreeMap<String, ResolvedSketch>,
    /// Sketch request path -> effective config discovered during resolution
    pub configs: HashMap<String, SketchConfig>,
    /// Sketch name -> sketch request path (first registered wins)
    pub names: HashMap<String, String>,
}

impl ResolutionTables {
    pub fn file(&self, request_path: &str) -> Option<&PathBuf> {
        self.files.get(request_path)
    }

    pub fn sketch(&self, request_path: &str) -> Option<&ResolvedSketch> {
        self.sketches.get(request_path)
    }

    pub fn sketch_by_name(&self, name: &str) -> Option<&ResolvedSketch> {
        self.names.get(name).and_then(|path| self.sketches.get(path))
    }

    pub fn config(&self, request_path: &str) -> Option<&SketchConfig> {
        self.configs.get(request_path)
    }

    fn register_sketch(&mut self, sketch: ResolvedSketch) -> bool {
        if self.sketches.contains_key(&sketch.request_path) {
            warn!(
                request_path = %sketch.request_path,
                fs_path = ?sketch.fs_path,
                "Sketch shadowed by an earlier sketch with the same request path"
            );
            return false;
        }
        match self.names.get(&sketch.sketch_name) {
            Some(existing) => warn!(
                sketch = %sketch.sketch_name,
                existing = %existing,
                request_path = %sketch.request_path,
                "Duplicate sketch name; lookups by name resolve to the first"
            ),
            None => {
                self.names
                    .insert(sketch.sketch_name.clone(), sketch.request_path.clone());
            }
        }
        self.sketches.insert(sketch.request_path.clone(), sketch);
        true
    }
}

/// Classifies tree nodes into sketches
pub struct SketchResolver<'a> {
    loader: &'a dyn SketchConfigLoader,
    inherited: SketchConfig,
    source_extension: String,
    sidecar_names: Vec<String>,
    source_files_only: bool,
}

impl<'a> SketchResolver<'a> {
    pub fn new(loader: &'a dyn SketchConfigLoader) -> Self {
        Self {
            loader,
            inherited: SketchConfig::default(),
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            sidecar_names: crate::sketch::config::default_sidecar_names(),
            source_files_only: false,
        }
    }

    /// Config used for directories without a usable sidecar
    pub fn with_inherited(mut self, config: SketchConfig) -> Self {
        self.inherited = config;
        self
    }

    pub fn with_source_extension(mut self, extension: impl Into<String>) -> Self {
        self.source_extension = extension.into();
        self
    }

    pub fn with_sidecar_names(mut self, names: Vec<String>) -> Self {
        self.sidecar_names = names;
        self
    }

    /// Only promote top-level files with the source extension
    pub fn with_source_files_only(mut self, enabled: bool) -> Self {
        self.source_files_only = enabled;
        self
    }

    /// Resolve sketches in `tree`, marking sketch roots and extending `files`
    /// with implicit entry mappings and rename projections.
    pub fn resolve(&self, tree: &mut SketchTree, files: FileTable) -> ResolutionTables {
        let mut tables = ResolutionTables {
            files,
            ..Default::default()
        };

        let mut queue: VecDeque<NodeId> = tree.children(tree.root()).into();
        while let Some(id) = queue.pop_front() {
            let Some(node) = tree.node(id) else { continue };
            let resolved = match node.kind {
                NodeKind::File => self.resolve_file(tree, id, &mut tables),
                NodeKind::Directory => self.resolve_directory(tree, id, &mut tables),
            };
            if resolved {
                if let Some(node) = tree.node_mut(id) {
                    node.is_sketch_root = true;
                }
            } else if tree.node(id).map(|n| n.is_dir()).unwrap_or(false) {
                queue.extend(tree.children(id));
            }
        }

        info!(
            sketches = tables.sketches.len(),
            files = tables.files.len(),
            "Sketches resolved"
        );
        tables
    }

    /// A file sitting directly at the top of the request namespace is a
    /// single-file sketch, whatever its extension. Sidecars are never
    /// sketches; `source_files_only` narrows promotion to source files.
    fn resolve_file(&self, tree: &SketchTree, id: NodeId, tables: &mut ResolutionTables) -> bool {
        let Some(node) = tree.node(id) else {
            return false;
        };
        if node.request_path != join_request_path(ROOT_REQUEST_PATH, &node.name) {
            return false;
        }
        if is_sidecar_name(&node.name, &self.sidecar_names) {
            return false;
        }
        if self.source_files_only
            && file_extension(&node.name) != Some(self.source_extension.as_str())
        {
            return false;
        }

        let sketch_name = file_stem(&node.name).to_string();
        let request_path = join_request_path(ROOT_REQUEST_PATH, &sketch_name);
        let sketch = ResolvedSketch {
            sketch_name,
            request_path: request_path.clone(),
            fs_path: node.fs_path.clone(),
            kind: SketchKind::File,
        };
        if !tables.register_sketch(sketch) {
            return false;
        }

        let implicit_entry = join_request_path(
            &request_path,
            &self.inherited.entry_file_name(&self.source_extension),
        );
        debug!(request_path = %implicit_entry, fs_path = ?node.fs_path, "Registered implicit sketch entry");
        tables.files.insert(implicit_entry, node.fs_path.clone());
        true
    }

    /// A directory holding `<entry>.<ext>` is a directory sketch.
    fn resolve_directory(
        &self,
        tree: &SketchTree,
        id: NodeId,
        tables: &mut ResolutionTables,
    ) -> bool {
        let Some(node) = tree.node(id) else {
            return false;
        };

        let sidecar = node
            .children
            .keys()
            .filter(|name| is_sidecar_name(name, &self.sidecar_names))
            .min_by_key(|name| self.sidecar_names.iter().position(|s| s == *name))
            .and_then(|name| tree.child(id, name))
            .filter(|child| child.is_file());
        let config = sidecar
            .and_then(|child| load_sidecar(self.loader, &child.fs_path, &self.inherited))
            .unwrap_or_else(|| self.inherited.clone());

        let Some(entry) = tree
            .child(id, &config.entry_file_name(&self.source_extension))
            .filter(|child| child.is_file())
        else {
            return false;
        };

        let sketch = ResolvedSketch {
            sketch_name: node.name.clone(),
            request_path: node.request_path.clone(),
            fs_path: node.fs_path.clone(),
            kind: SketchKind::Directory,
        };
        if !tables.register_sketch(sketch) {
            return false;
        }

        if config.is_renamed() {
            let projected = join_request_path(
                &node.request_path,
                &config.output_file_name(&self.source_extension),
            );
            debug!(
                request_path = %projected,
                fs_path = ?entry.fs_path,
                "Projected renamed sketch entry"
            );
            tables.files.insert(projected, entry.fs_path.clone());
        }
        tables.configs.insert(node.request_path.clone(), config);
        true
    }
}
