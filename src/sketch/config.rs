//! Per-sketch configuration and sidecar loading.
//!
//! A sketch directory may carry a static sidecar (`milka.config.toml` or
//! `milka.config.json`) naming its main entry and output name. Sidecars are
//! parsed, never executed. Only allow-listed keys are read; anything else is
//! ignored.

use crate::error::SketchConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default main entry base name
pub const DEFAULT_ENTRY: &str = "sketch";

/// Default output/global name
pub const DEFAULT_OUTPUT_NAME: &str = "sketch";

/// Extension of compilable sketch sources
pub const DEFAULT_SOURCE_EXTENSION: &str = "js";

/// Sidecar file names, in lookup priority order
pub fn default_sidecar_names() -> Vec<String> {
    vec![
        "milka.config.toml".to_string(),
        "milka.config.json".to_string(),
    ]
}

pub fn is_sidecar_name(name: &str, sidecar_names: &[String]) -> bool {
    sidecar_names.iter().any(|s| s == name)
}

/// Effective configuration of one sketch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SketchConfig {
    /// Base name (without extension) of the main entry file
    pub entry: String,

    /// Global name the main entry is exposed under and renamed to
    pub output_name: String,

    /// Reserved; carried but not acted on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drawing_lib: Option<String>,

    /// Reserved; carried but not acted on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_all: Option<bool>,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            entry: DEFAULT_ENTRY.to_string(),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            drawing_lib: None,
            bundle_all: None,
        }
    }
}

impl SketchConfig {
    /// Apply the fields present in `partial` over `self`
    pub fn merged(&self, partial: &PartialSketchConfig) -> Self {
        Self {
            entry: partial.entry.clone().unwrap_or_else(|| self.entry.clone()),
            output_name: partial
                .output_name
                .clone()
                .unwrap_or_else(|| self.output_name.clone()),
            drawing_lib: partial.drawing_lib.clone().or_else(|| self.drawing_lib.clone()),
            bundle_all: partial.bundle_all.or(self.bundle_all),
        }
    }

    /// Whether the entry file is exposed under a different name
    pub fn is_renamed(&self) -> bool {
        self.entry != self.output_name
    }

    /// File name of the main entry, e.g. `sketch.js`
    pub fn entry_file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.entry, extension)
    }

    /// File name the main entry is projected to, e.g. `sketch.js`
    pub fn output_file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.output_name, extension)
    }
}

/// Sidecar contents as parsed: every field optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialSketchConfig {
    #[serde(default)]
    pub entry: Option<String>,
    #[serde(default)]
    pub output_name: Option<String>,
    #[serde(default)]
    pub drawing_lib: Option<String>,
    #[serde(default)]
    pub bundle_all: Option<bool>,
}

impl PartialSketchConfig {
    /// Empty strings count as absent
    fn normalized(mut self) -> Self {
        self.entry = self.entry.filter(|s| !s.trim().is_empty());
        self.output_name = self.output_name.filter(|s| !s.trim().is_empty());
        self.drawing_lib = self.drawing_lib.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_none()
            && self.output_name.is_none()
            && self.drawing_lib.is_none()
            && self.bundle_all.is_none()
    }
}

/// Capability to turn a sidecar path into a partial config
pub trait SketchConfigLoader: Send + Sync {
    fn load_sketch_config(&self, path: &Path) -> Result<PartialSketchConfig, SketchConfigError>;
}

/// Default loader: TOML or JSON chosen by file extension
#[derive(Debug, Clone, Copy, Default)]
pub struct SidecarLoader;

impl SketchConfigLoader for SidecarLoader {
    fn load_sketch_config(&self, path: &Path) -> Result<PartialSketchConfig, SketchConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| SketchConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let partial: PartialSketchConfig =
            match path.extension().and_then(|e| e.to_str()) {
                Some("toml") => toml::from_str(&contents).map_err(|source| {
                    SketchConfigError::Toml {
                        path: path.to_path_buf(),
                        source,
                    }
                })?,
                Some("json") => serde_json::from_str(&contents).map_err(|source| {
                    SketchConfigError::Json {
                        path: path.to_path_buf(),
                        source,
                    }
                })?,
                _ => return Err(SketchConfigError::UnsupportedFormat(path.to_path_buf())),
            };

        let partial = partial.normalized();
        if partial.is_empty() {
            return Err(SketchConfigError::Empty(path.to_path_buf()));
        }
        Ok(partial)
    }
}

/// Load a sidecar and merge it over `base`.
///
/// Any load failure is logged and reported as `None` so callers fall back to
/// their default or inherited config.
pub fn load_sidecar(
    loader: &dyn SketchConfigLoader,
    path: &Path,
    base: &SketchConfig,
) -> Option<SketchConfig> {
    match loader.load_sketch_config(path) {
        Ok(partial) => {
            debug!(path = ?path, "Loaded sketch sidecar config");
            Some(base.merged(&partial))
        }
        Err(e) => {
            warn!(path = ?path, error = %e, "Ignoring unusable sketch sidecar config");
            None
        }
    }
}

/// First sidecar present in `dir`, in `sidecar_names` order
pub fn find_sidecar(dir: &Path, sidecar_names: &[String]) -> Option<PathBuf> {
    sidecar_names
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}
