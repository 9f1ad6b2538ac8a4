//! Sketch tree node types and the arena that owns them.

use crate::types::NodeId;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Kind of filesystem entry a node represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    File,
    Directory,
}

/// One filesystem entry under the sketches root
#[derive(Debug, Clone)]
pub struct SketchNode {
    /// Base name as it appears on disk
    pub name: String,
    pub fs_path: PathBuf,
    /// Normalized URL path this node is addressed by
    pub request_path: String,
    pub kind: NodeKind,
    pub children: BTreeMap<String, NodeId>, // (name, node_id) sorted by name
    /// Set during resolution once the node is an independently servable unit
    pub is_sketch_root: bool,
}

impl SketchNode {
    pub fn new(
        name: impl Into<String>,
        fs_path: impl Into<PathBuf>,
        request_path: impl Into<String>,
        kind: NodeKind,
    ) -> Self {
        Self {
            name: name.into(),
            fs_path: fs_path.into(),
            request_path: request_path.into(),
            kind,
            children: BTreeMap::new(),
            is_sketch_root: false,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    /// Name without its final extension
    pub fn clean_name(&self) -> &str {
        crate::tree::path::file_stem(&self.name)
    }
}

/// Arena-backed sketch tree.
///
/// Every node is owned by the arena and addressed by its `NodeId`; parents
/// reference children by id through their `children` map. There are no
/// back-references: callers walk upward by re-deriving request prefixes.
#[derive(Debug, Clone)]
pub struct SketchTree {
    nodes: Vec<SketchNode>,
    root: NodeId,
}

impl SketchTree {
    /// Create a tree holding only the root directory node
    pub fn new(root_fs_path: &Path) -> Self {
        let name = root_fs_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let root = SketchNode::new(
            name,
            root_fs_path,
            crate::tree::path::ROOT_REQUEST_PATH,
            NodeKind::Directory,
        );
        Self {
            nodes: vec![root],
            root: 0,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_node(&self) -> &SketchNode {
        &self.nodes[self.root]
    }

    pub fn node(&self, id: NodeId) -> Option<&SketchNode> {
        self.nodes.get(id)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut SketchNode> {
        self.nodes.get_mut(id)
    }

    /// Attach `node` under `parent`.
    ///
    /// Returns the existing child id as `Err` when the parent already has a
    /// child with the same name; the new node is not added in that case.
    pub fn add_child(&mut self, parent: NodeId, node: SketchNode) -> Result<NodeId, NodeId> {
        if let Some(existing) = self
            .nodes
            .get(parent)
            .and_then(|p| p.children.get(&node.name))
        {
            return Err(*existing);
        }
        let id = self.nodes.len();
        let name = node.name.clone();
        self.nodes.push(node);
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.insert(name, id);
        }
        Ok(id)
    }

    pub fn child(&self, parent: NodeId, name: &str) -> Option<&SketchNode> {
        self.child_id(parent, name).and_then(|id| self.node(id))
    }

    pub fn child_id(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.nodes.get(parent)?.children.get(name).copied()
    }

    /// Child ids of `parent`, sorted by name
    pub fn children(&self, parent: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(parent)
            .map(|p| p.children.values().copied().collect())
            .unwrap_or_default()
    }

    /// Find a node by its request path by descending from the root
    pub fn find(&self, request_path: &str) -> Option<&SketchNode> {
        let normalized = crate::tree::path::normalize_request_path(request_path);
        let mut current = self.root;
        for segment in normalized.split('/').filter(|s| !s.is_empty()) {
            current = self.child_id(current, segment)?;
        }
        self.node(current)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SketchNode)> {
        self.nodes.iter().enumerate()
    }

    /// Nodes marked as sketch roots
    pub fn sketch_roots(&self) -> impl Iterator<Item = &SketchNode> {
        self.nodes.iter().filter(|n| n.is_sketch_root)
    }
}
