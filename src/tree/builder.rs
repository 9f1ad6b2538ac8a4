//! Tree construction from the sketches directory.
//!
//! Walks the sketches root once, creating a node per file and directory.
//! Bracket-named directories (`[name]`) are flattened into their parent's
//! request namespace: they contribute to `fs_path` but never to
//! `request_path`. Every file except config sidecars is registered in the
//! servable file table.

use crate::sketch::config::is_sidecar_name;
use crate::tree::node::{NodeKind, SketchNode, SketchTree};
use crate::tree::path::{is_pass_through_dir, join_request_path};
use crate::tree::walker::WalkerConfig;
use crate::types::NodeId;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Request path -> filesystem path for every servable file
pub type FileTable = BTreeMap<String, PathBuf>;

/// Output of a build pass: the tree plus its servable file table
#[derive(Debug, Clone)]
pub struct BuiltTree {
    pub tree: SketchTree,
    pub files: FileTable,
}

/// Builds a `SketchTree` from a sketches root directory
pub struct TreeBuilder {
    root: PathBuf,
    walker_config: WalkerConfig,
    sidecar_names: Vec<String>,
}

impl TreeBuilder {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            walker_config: WalkerConfig::default(),
            sidecar_names: crate::sketch::config::default_sidecar_names(),
        }
    }

    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    pub fn with_sidecar_names(mut self, names: Vec<String>) -> Self {
        self.sidecar_names = names;
        self
    }

    /// Walk the sketches root and build the tree.
    ///
    /// Never fails: unreadable directories (including a missing root) are
    /// logged and treated as empty.
    pub fn build(&self) -> BuiltTree {
        let mut tree = SketchTree::new(&self.root);
        let mut files = FileTable::new();

        // fs path of every walked directory -> node its children attach to
        let mut attach_points: HashMap<PathBuf, NodeId> = HashMap::new();
        attach_points.insert(self.root.clone(), tree.root());

        let mut entries = self.walker_config.walk(&self.root).into_iter();
        while let Some(result) = entries.next() {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(path = ?e.path(), error = %e, "Skipping unreadable sketch directory");
                    continue;
                }
            };
            let file_type = entry.file_type();
            let is_dir = file_type.is_dir();

            let Some(parent_id) = entry
                .path()
                .parent()
                .and_then(|p| attach_points.get(p))
                .copied()
            else {
                if is_dir {
                    entries.skip_current_dir();
                }
                continue;
            };

            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                warn!(path = ?entry.path(), "Skipping entry with non UTF-8 name");
                if is_dir {
                    entries.skip_current_dir();
                }
                continue;
            };

            let parent_request = match tree.node(parent_id) {
                Some(parent) => parent.request_path.clone(),
                None => continue,
            };
            let fs_path = entry.path().to_path_buf();

            if is_dir {
                if is_pass_through_dir(&name) {
                    debug!(path = ?fs_path, "Flattening pass-through directory");
                    attach_points.insert(fs_path, parent_id);
                    continue;
                }

                let request_path = join_request_path(&parent_request, &name);
                let node = SketchNode::new(&name, &fs_path, &request_path, NodeKind::Directory);
                match tree.add_child(parent_id, node) {
                    Ok(id) => {
                        attach_points.insert(fs_path, id);
                    }
                    Err(_) => {
                        warn!(
                            path = ?fs_path,
                            request_path = %request_path,
                            "Directory shadowed by an earlier entry with the same request path"
                        );
                        entries.skip_current_dir();
                    }
                }
            } else if file_type.is_file() {
                let request_path = join_request_path(&parent_request, &name);
                let node = SketchNode::new(&name, &fs_path, &request_path, NodeKind::File);
                if tree.add_child(parent_id, node).is_err() {
                    warn!(
                        path = ?fs_path,
                        request_path = %request_path,
                        "File shadowed by an earlier entry with the same request path"
                    );
                    continue;
                }
                if !is_sidecar_name(&name, &self.sidecar_names) {
                    files.insert(request_path, fs_path);
                }
            }
        }

        info!(
            root = ?self.root,
            nodes = tree.len(),
            files = files.len(),
            "Sketch tree built"
        );

        BuiltTree { tree, files }
    }
}
