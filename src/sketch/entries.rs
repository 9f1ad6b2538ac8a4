//! Compile entry planning for resolved sketches.
//!
//! Produces the bundler-agnostic entry list for one sketch. Ordering law:
//! every consumer of the ordered list sees non-main entries in discovery
//! order followed by the main entry last, so the main sketch script loads
//! after all of its dependency scripts.

use crate::error::PlanError;
use crate::sketch::config::{SketchConfig, DEFAULT_SOURCE_EXTENSION};
use crate::sketch::resolver::ResolvedSketch;
use crate::tree::path::file_stem;
use crate::tree::walker::WalkerConfig;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One bundler entry point
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileEntry {
    pub key: String,
    pub source_path: PathBuf,
    /// Global name the entry's default export is attached to
    pub exposed_name: String,
    /// Directory prefix (with trailing `/`) preserved in the output layout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_dir: Option<String>,
}

/// Compilation entry identifier handed to script-ordering logic.
///
/// A list triggers load-order coordination downstream; a scalar does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CompilationEntry {
    Single(String),
    Ordered(Vec<String>),
}

impl CompilationEntry {
    pub fn is_single(&self) -> bool {
        matches!(self, CompilationEntry::Single(_))
    }

    pub fn keys(&self) -> Vec<&str> {
        match self {
            CompilationEntry::Single(key) => vec![key.as_str()],
            CompilationEntry::Ordered(keys) => keys.iter().map(String::as_str).collect(),
        }
    }
}

/// Planned entries for one sketch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPlan {
    pub sketch_name: String,
    /// Entries in discovery order
    pub entries: Vec<CompileEntry>,
    pub main_key: String,
    pub extension: String,
}

impl EntryPlan {
    pub fn main_entry(&self) -> Option<&CompileEntry> {
        self.entries.iter().find(|e| e.key == self.main_key)
    }

    /// Non-main entries in discovery order, then the main entry
    pub fn ordered_entries(&self) -> Vec<&CompileEntry> {
        let mut ordered: Vec<&CompileEntry> = self
            .entries
            .iter()
            .filter(|e| e.key != self.main_key)
            .collect();
        ordered.extend(self.main_entry());
        ordered
    }

    /// Scalar when the plan holds a single entry, ordered list otherwise
    pub fn compilation_entry(&self) -> CompilationEntry {
        if self.entries.len() == 1 {
            return CompilationEntry::Single(self.entries[0].key.clone());
        }
        CompilationEntry::Ordered(
            self.ordered_entries()
                .into_iter()
                .map(|e| e.key.clone())
                .collect(),
        )
    }

    /// Output filename for `key`, keeping its sub-folder, e.g. `other/other.js`
    pub fn output_file_name(&self, key: &str) -> Option<String> {
        let entry = self.entries.iter().find(|e| e.key == key)?;
        Some(format!(
            "{}{}.{}",
            entry.relative_dir.as_deref().unwrap_or(""),
            entry.key,
            self.extension
        ))
    }
}

/// Computes entry plans
#[derive(Debug, Clone)]
pub struct EntryPlanner {
    source_extension: String,
    walker_config: WalkerConfig,
}

impl Default for EntryPlanner {
    fn default() -> Self {
        Self {
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            walker_config: WalkerConfig::default(),
        }
    }
}

impl EntryPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source_extension(mut self, extension: impl Into<String>) -> Self {
        self.source_extension = extension.into();
        self
    }

    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    pub fn plan(
        &self,
        sketch: &ResolvedSketch,
        config: &SketchConfig,
    ) -> Result<EntryPlan, PlanError> {
        if sketch.is_file() {
            return Ok(EntryPlan {
                sketch_name: sketch.sketch_name.clone(),
                entries: vec![CompileEntry {
                    key: config.entry.clone(),
                    source_path: sketch.fs_path.clone(),
                    exposed_name: sketch.sketch_name.clone(),
                    relative_dir: None,
                }],
                main_key: config.entry.clone(),
                extension: self.source_extension.clone(),
            });
        }

        let sources = self.discover_sources(&sketch.fs_path);
        if sources.is_empty() {
            return Err(PlanError::NoEntries {
                sketch: sketch.sketch_name.clone(),
            });
        }

        let stems: Vec<&str> = sources.iter().map(|s| file_stem(&s.name)).collect();
        let main_idx = select_main(&sources, &stems, &config.entry).ok_or_else(|| {
            PlanError::MissingMainEntry {
                sketch: sketch.sketch_name.clone(),
                entry: config.entry.clone(),
            }
        })?;

        let mut used_keys: HashSet<String> = HashSet::new();
        used_keys.insert(config.output_name.clone());

        let mut entries = Vec::with_capacity(sources.len());
        for (idx, source) in sources.iter().enumerate() {
            let (key, exposed_name) = if idx == main_idx {
                (config.output_name.clone(), sketch.sketch_name.clone())
            } else {
                let key = stems[idx].to_string();
                if !used_keys.insert(key.clone()) {
                    warn!(
                        sketch = %sketch.sketch_name,
                        path = ?source.path,
                        key = %key,
                        "Skipping source whose entry key is already taken"
                    );
                    continue;
                }
                (key.clone(), key)
            };
            entries.push(CompileEntry {
                key,
                source_path: source.path.clone(),
                exposed_name,
                relative_dir: source.relative_dir.clone(),
            });
        }

        debug!(
            sketch = %sketch.sketch_name,
            entries = entries.len(),
            "Planned compile entries"
        );

        Ok(EntryPlan {
            sketch_name: sketch.sketch_name.clone(),
            entries,
            main_key: config.output_name.clone(),
            extension: self.source_extension.clone(),
        })
    }

    fn discover_sources(&self, dir: &Path) -> Vec<SourceFile> {
        let mut sources = Vec::new();
        for result in self.walker_config.walk(dir) {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(path = ?e.path(), error = %e, "Skipping unreadable sketch source");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            if crate::tree::path::file_extension(name) != Some(self.source_extension.as_str()) {
                continue;
            }

            let relative = entry.path().strip_prefix(dir).unwrap_or(entry.path());
            let parents: Vec<String> = relative
                .parent()
                .map(|p| {
                    p.components()
                        .map(|c| c.as_os_str().to_string_lossy().to_string())
                        .collect()
                })
                .unwrap_or_default();
            let relative_dir = if parents.is_empty() {
                None
            } else {
                Some(format!("{}/", parents.join("/")))
            };

            sources.push(SourceFile {
                name: name.to_string(),
                path: entry.path().to_path_buf(),
                relative_dir,
            });
        }
        sources
    }
}

struct SourceFile {
    name: String,
    path: PathBuf,
    relative_dir: Option<String>,
}

impl SourceFile {
    fn depth(&self) -> usize {
        self.relative_dir
            .as_deref()
            .map_or(0, |dir| dir.split('/').filter(|s| !s.is_empty()).count())
    }
}

/// Index of the main source: exact stem matches beat substring matches,
/// then shallower files beat deeper ones, then discovery order.
///
/// A nested directory can sort ahead of its parent's own files in the walk,
/// so depth outranks discovery order and `<dir>/<entry>.<ext>` always wins.
fn select_main(sources: &[SourceFile], stems: &[&str], entry: &str) -> Option<usize> {
    stems
        .iter()
        .enumerate()
        .filter_map(|(idx, stem)| {
            let tier = if *stem == entry {
                0
            } else if stem.contains(entry) {
                1
            } else {
                return None;
            };
            Some((idx, (tier, sources[idx].depth())))
        })
        .min_by_key(|(_, rank)| *rank)
        .map(|(idx, _)| idx)
}

/// Plan entries with the default planner
pub fn plan_entries(
    sketch: &ResolvedSketch,
    config: &SketchConfig,
) -> Result<EntryPlan, PlanError> {
    EntryPlanner::default().plan(sketch, config)
}
