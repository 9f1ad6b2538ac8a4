//! Environment variable source: MILKA_* prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Legacy single-variable override for the sketches root
pub const SKETCHES_PATH_VAR: &str = "SKETCHES_PATH";

/// Add environment variable overlay to builder.
/// Uses MILKA prefix and __ as separator for nested keys; list values are
/// comma separated.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = builder.add_source(
        Environment::with_prefix("MILKA")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("sketches.sidecar_names")
            .with_list_parse_key("watch.ignore_patterns")
            .try_parsing(true),
    );
    let legacy_root = std::env::var(SKETCHES_PATH_VAR)
        .ok()
        .filter(|v| !v.trim().is_empty());
    builder.set_override_option("sketches.root", legacy_root)
}
