//! CLI Tooling
//!
//! Command-line interface for inspecting how a sketches root resolves:
//! listing sketches, resolving request paths, planning compile entries and
//! watching for changes.

use crate::concurrency::SharedIndex;
use crate::config::{ConfigLoader, MilkaConfig};
use crate::error::{ApiError, ResolveError};
use crate::logging::LoggingConfig;
use crate::sketch::config::SidecarLoader;
use crate::tooling::format::{
    format_entry_plan_json, format_entry_plan_text, format_resolved_request_json,
    format_resolved_request_text, format_sketch_list_json, format_sketch_list_text,
};
use crate::watch::{WatchConfig, WatchDaemon};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Milka CLI - sketch resolution for a live-reloading dev server
#[derive(Parser)]
#[command(name = "milka")]
#[command(about = "Resolve request paths to sketches in a sketches directory")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Sketches root directory (overrides config)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Apply the logging flags over `base`
    pub fn logging_config(&self, base: &LoggingConfig) -> LoggingConfig {
        let mut config = base.clone();
        if let Some(level) = &self.log_level {
            config.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            config.file = Some(file.clone());
        }
        config
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List resolved sketches
    Sketches {
        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Resolve a request path to its owning sketch
    Resolve {
        /// Request path, e.g. /orbit/lib/helper.js
        path: String,
        /// Treat the request as a WebSocket upgrade
        #[arg(long)]
        upgrade: bool,
        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Plan compile entries for a sketch
    Plan {
        /// Sketch name
        sketch: String,
        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Watch the sketches root and rebuild on change
    Watch {
        /// Debounce window in milliseconds
        #[arg(long)]
        debounce_ms: Option<u64>,
        /// Batch window in milliseconds
        #[arg(long)]
        batch_window_ms: Option<u64>,
    },
}

/// CLI context holding the loaded config and the shared sketch index
pub struct CliContext {
    config: MilkaConfig,
    shared: Arc<SharedIndex>,
}

impl CliContext {
    /// Load configuration, applying a root override if given
    pub fn load_config(
        root: Option<PathBuf>,
        config_path: Option<PathBuf>,
    ) -> Result<MilkaConfig, ApiError> {
        let mut config = match &config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&std::env::current_dir()?)?,
        };
        if let Some(root) = root {
            config.sketches.root = root;
        }
        Ok(config)
    }

    /// Create a new CLI context, building the initial index
    pub fn new(config: MilkaConfig) -> Result<Self, ApiError> {
        let options = config.sketches.index_options()?;
        let shared = Arc::new(SharedIndex::build(options, Arc::new(SidecarLoader)));
        Ok(Self { config, shared })
    }

    pub fn config(&self) -> &MilkaConfig {
        &self.config
    }

    pub fn shared(&self) -> Arc<SharedIndex> {
        Arc::clone(&self.shared)
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Sketches { format } => self.handle_sketches(format),
            Commands::Resolve {
                path,
                upgrade,
                format,
            } => self.handle_resolve(path, *upgrade, format),
            Commands::Plan { sketch, format } => self.handle_plan(sketch, format),
            Commands::Watch {
                debounce_ms,
                batch_window_ms,
            } => self.handle_watch(*debounce_ms, *batch_window_ms),
        }
    }

    fn handle_sketches(&self, format: &str) -> Result<String, ApiError> {
        let index = self.shared.snapshot();
        let sketches: Vec<_> = index.sketches().collect();
        match format {
            "json" => format_sketch_list_json(&sketches),
            _ => Ok(format_sketch_list_text(&sketches, index.root())),
        }
    }

    fn handle_resolve(&self, path: &str, upgrade: bool, format: &str) -> Result<String, ApiError> {
        let index = self.shared.snapshot();
        let request = index.resolve_request(path)?;
        let kind = request.classify(upgrade);
        match format {
            "json" => format_resolved_request_json(&request, kind),
            _ => Ok(format_resolved_request_text(&request, kind)),
        }
    }

    fn handle_plan(&self, sketch_name: &str, format: &str) -> Result<String, ApiError> {
        let index = self.shared.snapshot();
        let sketch = index
            .get_resolved_sketch(sketch_name)
            .ok_or_else(|| ResolveError::SketchNotFound {
                path: sketch_name.to_string(),
            })?;
        let plan = index.plan_entries(sketch, None)?;
        match format {
            "json" => format_entry_plan_json(&plan),
            _ => Ok(format_entry_plan_text(&plan, index.root())),
        }
    }

    fn handle_watch(
        &self,
        debounce_ms: Option<u64>,
        batch_window_ms: Option<u64>,
    ) -> Result<String, ApiError> {
        let mut settings = self.config.watch.clone();
        if let Some(ms) = debounce_ms {
            settings.debounce_ms = ms;
        }
        if let Some(ms) = batch_window_ms {
            settings.batch_window_ms = ms;
        }

        let root = self.shared.snapshot().root().to_path_buf();
        if !root.is_dir() {
            return Err(ApiError::Watch(format!(
                "Sketches root {:?} is not a directory",
                root
            )));
        }

        let daemon = WatchDaemon::new(self.shared(), WatchConfig::from_settings(root, &settings))
            .with_on_rebuild(|report| {
                info!(
                    generation = report.generation,
                    sketches = ?report.affected_sketches,
                    "Sketches changed"
                );
            });
        daemon.start()?;
        Ok("Watch stopped".to_string())
    }
}
