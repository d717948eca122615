//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
///
/// Later sources replace earlier ones key by key; arrays such as
/// `explorer.roots` are replaced whole, never concatenated.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("store.backend", "sled")?
        .set_default("store.seed", true)?
        .set_default("explorer.max_depth", crate::tree::DEFAULT_MAX_DEPTH as i64)?
        .set_default("logging.enabled", true)
}
