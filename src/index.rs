//! Sketch Index
//!
//! Owns one consistent snapshot of the sketch tree and its resolution
//! tables. An index is built in one pass and never mutated afterwards; a
//! rebuild produces a new index (see `concurrency::SharedIndex`).

use crate::error::{PlanError, ResolveError};
use crate::sketch::config::{
    default_sidecar_names, SketchConfig, SketchConfigLoader, DEFAULT_SOURCE_EXTENSION,
};
use crate::sketch::entries::{EntryPlan, EntryPlanner};
use crate::sketch::request::{self, ResolvedRequest};
use crate::sketch::resolver::{ResolutionTables, ResolvedSketch, SketchResolver};
use crate::tree::builder::TreeBuilder;
use crate::tree::node::SketchTree;
use crate::tree::walker::WalkerConfig;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Options controlling how an index is built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexOptions {
    /// Absolute sketches root
    pub root: PathBuf,
    pub source_extension: String,
    pub sidecar_names: Vec<String>,
    pub walker: WalkerConfig,
    /// Config applied where no sidecar is found
    pub inherited: SketchConfig,
    /// Restrict single-file sketches to source files
    pub source_files_only: bool,
}

impl IndexOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            sidecar_names: default_sidecar_names(),
            walker: WalkerConfig::default(),
            inherited: SketchConfig::default(),
            source_files_only: false,
        }
    }
}

/// Tree plus resolution tables for one build pass
#[derive(Debug, Clone)]
pub struct SketchIndex {
    options: IndexOptions,
    tree: SketchTree,
    tables: ResolutionTables,
}

impl SketchIndex {
    /// Build the tree and resolve sketches. Never fails; unreadable parts of
    /// the sketches root are treated as empty.
    pub fn build(options: IndexOptions, loader: &dyn SketchConfigLoader) -> Self {
        let started = Instant::now();
        let built = TreeBuilder::new(options.root.clone())
            .with_walker_config(options.walker.clone())
            .with_sidecar_names(options.sidecar_names.clone())
            .build();

        let mut tree = built.tree;
        let tables = SketchResolver::new(loader)
            .with_inherited(options.inherited.clone())
            .with_source_extension(options.source_extension.clone())
            .with_sidecar_names(options.sidecar_names.clone())
            .with_source_files_only(options.source_files_only)
            .resolve(&mut tree, built.files);

        info!(
            root = ?options.root,
            sketches = tables.sketches.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Sketch index built"
        );

        Self {
            options,
            tree,
            tables,
        }
    }

    pub fn options(&self) -> &IndexOptions {
        &self.options
    }

    pub fn root(&self) -> &Path {
        &self.options.root
    }

    pub fn tree(&self) -> &SketchTree {
        &self.tree
    }

    pub fn tables(&self) -> &ResolutionTables {
        &self.tables
    }

    /// Resolve an incoming request path to its owning sketch
    pub fn resolve_request(&self, request_path: &str) -> Result<ResolvedRequest, ResolveError> {
        request::resolve_request(&self.tables, request_path)
    }

    /// Look up a sketch by its canonical name
    pub fn get_resolved_sketch(&self, name: &str) -> Option<&ResolvedSketch> {
        self.tables.sketch_by_name(name)
    }

    /// Filesystem path registered for a file request path
    pub fn resolve_file(&self, request_path: &str) -> Option<&PathBuf> {
        self.tables
            .file(&crate::tree::path::normalize_request_path(request_path))
    }

    /// All resolved sketches, ordered by request path
    pub fn sketches(&self) -> impl Iterator<Item = &ResolvedSketch> {
        self.tables.sketches.values()
    }

    /// Effective config for `sketch`.
    ///
    /// An explicit `extend_from` always wins; otherwise directory sketches
    /// use the config discovered during resolution and everything else the
    /// inherited default.
    pub fn sketch_config(
        &self,
        sketch: &ResolvedSketch,
        extend_from: Option<&SketchConfig>,
    ) -> SketchConfig {
        if let Some(config) = extend_from {
            return config.clone();
        }
        if sketch.is_dir() {
            if let Some(config) = self.tables.config(&sketch.request_path) {
                return config.clone();
            }
        }
        self.options.inherited.clone()
    }

    /// Plan compile entries for `sketch`
    pub fn plan_entries(
        &self,
        sketch: &ResolvedSketch,
        extend_from: Option<&SketchConfig>,
    ) -> Result<EntryPlan, PlanError> {
        let config = self.sketch_config(sketch, extend_from);
        EntryPlanner::new()
            .with_source_extension(self.options.source_extension.clone())
            .with_walker_config(self.options.walker.clone())
            .plan(sketch, &config)
    }

    /// Sketch whose files include the filesystem path `path`
    pub fn sketch_for_fs_path(&self, path: &Path) -> Option<&ResolvedSketch> {
        self.sketches().find(|sketch| {
            if sketch.is_file() {
                sketch.fs_path == path
            } else {
                path.starts_with(&sketch.fs_path)
            }
        })
    }
}
