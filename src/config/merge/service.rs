//! MergeService: orchestrates sources, applies merge policy, deserializes to MilkaConfig.

use crate::config::sources::{environment, workspace_file};
use crate::config::MilkaConfig;
use config::ConfigError;
use std::path::Path;

use super::policy;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config from workspace and standard sources.
    /// Precedence: defaults (lowest) -> workspace file -> environment (highest).
    pub fn load(workspace_root: &Path) -> Result<MilkaConfig, ConfigError> {
        let builder = policy::builder_with_defaults()?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load config from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<MilkaConfig, ConfigError> {
        use config::File;

        let builder = policy::builder_with_defaults()?;
        let builder = builder.add_source(File::from(path.to_path_buf()));
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }
}
