//! Error types for the sketch resolution engine.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to resolve an incoming request path to a sketch.
///
/// Surfaced to the routing layer as a not-found response; never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("sketch not found: {path}")]
    SketchNotFound { path: String },

    #[error("asset not found: {path}")]
    AssetNotFound { path: String },

    #[error("cannot serve asset to unresolved sketch: {path}")]
    UnownedAsset { path: String },
}

impl ResolveError {
    pub fn path(&self) -> &str {
        match self {
            ResolveError::SketchNotFound { path }
            | ResolveError::AssetNotFound { path }
            | ResolveError::UnownedAsset { path } => path,
        }
    }
}

/// Failure to load a sidecar config file.
///
/// The resolver always absorbs these and falls back to defaults.
#[derive(Debug, Error)]
pub enum SketchConfigError {
    #[error("failed to read sidecar {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in {path:?}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid JSON in {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported sidecar format: {0:?}")]
    UnsupportedFormat(PathBuf),

    #[error("sidecar {0:?} has no usable fields")]
    Empty(PathBuf),
}

/// Failure to plan compile entries for a resolved sketch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("sketch {sketch} has no source files")]
    NoEntries { sketch: String },

    #[error("sketch {sketch} has no main entry matching {entry:?}")]
    MissingMainEntry { sketch: String, entry: String },
}

/// Top-level error for configuration, logging, watch and CLI operations.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("watch error: {0}")]
    Watch(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<notify::Error> for ApiError {
    fn from(err: notify::Error) -> Self {
        ApiError::Watch(err.to_string())
    }
}
