//! Application configuration.
//!
//! Layered with the `config` crate: built-in defaults, an optional
//! `milka.toml` in the working directory, then `MILKA__*` environment
//! variables (and the legacy `SKETCHES_PATH`).

pub mod facade;
pub mod merge;
pub mod sources;

pub use facade::ConfigLoader;

use crate::error::ApiError;
use crate::index::IndexOptions;
use crate::logging::LoggingConfig;
use crate::sketch::config::{default_sidecar_names, SketchConfig, DEFAULT_SOURCE_EXTENSION};
use crate::tree::walker::WalkerConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MilkaConfig {
    #[serde(default)]
    pub sketches: SketchesConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub watch: WatchSettings,
}

/// Where sketches live and how they are recognized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SketchesConfig {
    /// Sketches root; relative paths resolve against the working directory
    #[serde(default = "default_root")]
    pub root: PathBuf,

    #[serde(default = "default_source_extension")]
    pub source_extension: String,

    #[serde(default = "default_sidecar_names")]
    pub sidecar_names: Vec<String>,

    #[serde(default)]
    pub follow_symlinks: bool,

    #[serde(default)]
    pub max_depth: Option<usize>,

    /// Promote only top-level files with `source_extension` to sketches.
    /// Off by default: every top-level file is addressable as `/<stem>`.
    #[serde(default)]
    pub source_files_only: bool,
}

pub(crate) fn default_root() -> PathBuf {
    PathBuf::from("sketches")
}

fn default_source_extension() -> String {
    DEFAULT_SOURCE_EXTENSION.to_string()
}

impl Default for SketchesConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            source_extension: default_source_extension(),
            sidecar_names: default_sidecar_names(),
            follow_symlinks: false,
            max_depth: None,
            source_files_only: false,
        }
    }
}

impl SketchesConfig {
    /// Index build options with the root made absolute
    pub fn index_options(&self) -> Result<IndexOptions, ApiError> {
        let root = crate::tree::path::resolve_root(&self.root).map_err(|e| {
            ApiError::ConfigError(format!(
                "Failed to resolve sketches root {:?}: {}",
                self.root, e
            ))
        })?;
        if self.source_extension.trim().is_empty() {
            return Err(ApiError::ConfigError(
                "sketches.source_extension must not be empty".to_string(),
            ));
        }
        Ok(IndexOptions {
            root,
            source_extension: self.source_extension.trim_start_matches('.').to_string(),
            sidecar_names: self.sidecar_names.clone(),
            walker: WalkerConfig {
                follow_symlinks: self.follow_symlinks,
                max_depth: self.max_depth,
            },
            inherited: SketchConfig::default(),
            source_files_only: self.source_files_only,
        })
    }
}

/// Watch daemon tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchSettings {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default = "default_batch_window_ms")]
    pub batch_window_ms: u64,

    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,

    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,
}

fn default_debounce_ms() -> u64 {
    100
}

fn default_batch_window_ms() -> u64 {
    50
}

fn default_max_batch_size() -> usize {
    100
}

fn default_ignore_patterns() -> Vec<String> {
    vec![
        "**/.git/**".to_string(),
        "**/node_modules/**".to_string(),
        "**/.DS_Store".to_string(),
        "**/*.swp".to_string(),
        "**/*.tmp".to_string(),
        "**/__milka_*".to_string(),
    ]
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            batch_window_ms: default_batch_window_ms(),
            max_batch_size: default_max_batch_size(),
            ignore_patterns: default_ignore_patterns(),
        }
    }
}
