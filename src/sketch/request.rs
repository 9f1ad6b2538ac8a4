//! Per-request resolution against the resolution tables.

use crate::error::ResolveError;
use crate::sketch::resolver::{ResolutionTables, ResolvedSketch};
use crate::tree::path::{
    is_file_request, normalize_request_path, request_prefixes, strip_request_prefix,
};
use serde::Serialize;
use std::path::PathBuf;

/// How the routing layer should treat a resolved request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    /// Live-reload socket for the owning sketch
    WebSocketUpgrade,
    /// A file belonging to a sketch
    Asset,
    /// The sketch page itself
    SketchRoot,
}

/// What a request points at inside its sketch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequestTarget {
    Sketch,
    Asset {
        fs_path: PathBuf,
        /// Request path relative to the sketch root, without leading `/`
        relative_path: String,
    },
}

/// A request resolved to its owning sketch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRequest {
    pub request_path: String,
    pub sketch: ResolvedSketch,
    pub target: RequestTarget,
}

impl ResolvedRequest {
    pub fn sketch_name(&self) -> &str {
        &self.sketch.sketch_name
    }

    pub fn is_file_request(&self) -> bool {
        matches!(self.target, RequestTarget::Asset { .. })
    }

    /// Filesystem path of the requested file, for asset requests
    pub fn resolved_file(&self) -> Option<&PathBuf> {
        match &self.target {
            RequestTarget::Asset { fs_path, .. } => Some(fs_path),
            RequestTarget::Sketch => None,
        }
    }

    /// Path to hand to a static file responder rooted at the sketch output
    pub fn relative_file_request_path(&self) -> Option<&str> {
        match &self.target {
            RequestTarget::Asset { relative_path, .. } => Some(relative_path),
            RequestTarget::Sketch => None,
        }
    }

    /// Classify for routing; `upgrade` is whether the request asked for a
    /// websocket upgrade.
    pub fn classify(&self, upgrade: bool) -> RequestKind {
        if upgrade {
            RequestKind::WebSocketUpgrade
        } else if self.is_file_request() {
            RequestKind::Asset
        } else {
            RequestKind::SketchRoot
        }
    }
}

/// Resolve `request_path` to its owning sketch.
///
/// A path whose last segment contains a `.` is a file request: it must be a
/// registered file and must live under a sketch root, the shortest matching
/// prefix winning. Anything else is a sketch request looked up directly.
pub fn resolve_request(
    tables: &ResolutionTables,
    request_path: &str,
) -> Result<ResolvedRequest, ResolveError> {
    let normalized = normalize_request_path(request_path);

    if !is_file_request(&normalized) {
        let sketch = tables
            .sketch(&normalized)
            .cloned()
            .ok_or_else(|| ResolveError::SketchNotFound {
                path: normalized.clone(),
            })?;
        return Ok(ResolvedRequest {
            request_path: normalized,
            sketch,
            target: RequestTarget::Sketch,
        });
    }

    let fs_path = tables
        .file(&normalized)
        .cloned()
        .ok_or_else(|| ResolveError::AssetNotFound {
            path: normalized.clone(),
        })?;
    let sketch = owning_sketch(tables, &normalized)
        .cloned()
        .ok_or_else(|| ResolveError::UnownedAsset {
            path: normalized.clone(),
        })?;
    let relative_path = strip_request_prefix(&normalized, &sketch.request_path)
        .unwrap_or_else(|| normalized.trim_start_matches('/').to_string());

    Ok(ResolvedRequest {
        request_path: normalized,
        sketch,
        target: RequestTarget::Asset {
            fs_path,
            relative_path,
        },
    })
}

/// Shortest request prefix registered as a sketch
pub fn owning_sketch<'a>(
    tables: &'a ResolutionTables,
    request_path: &str,
) -> Option<&'a ResolvedSketch> {
    request_prefixes(request_path)
        .iter()
        .find_map(|prefix| tables.sketch(prefix))
}
