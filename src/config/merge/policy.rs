//! Merge policy: built-in defaults that every source overlays.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};

/// Builder seeded with defaults for keys that must always be present.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    config::Config::builder()
        .set_default("sketches.root", "sketches")?
        .set_default("sketches.source_extension", "js")?
        .set_default("sketches.follow_symlinks", false)
}
