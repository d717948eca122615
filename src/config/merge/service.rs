//! Runs the ordered sources through the merge policy and deserializes.

use super::merge_policy::builder_with_defaults;
use crate::config::sources::{environment, global_file, workspace_file};
use crate::config::RegtreeConfig;
use config::{ConfigError, File};
use std::path::Path;
use tracing::debug;

pub struct MergeService;

impl MergeService {
    /// defaults -> global file -> workspace files -> environment
    pub fn load(workspace_root: &Path) -> Result<RegtreeConfig, ConfigError> {
        let builder = builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder);
        let config: RegtreeConfig = builder.build()?.try_deserialize()?;
        debug!(workspace = %workspace_root.display(), "Configuration merged");
        Ok(config)
    }

    /// defaults -> explicit file -> environment
    pub fn load_from_file(path: &Path) -> Result<RegtreeConfig, ConfigError> {
        let builder = builder_with_defaults()?.add_source(File::from(path).required(true));
        let builder = environment::add_to_builder(builder);
        builder.build()?.try_deserialize()
    }

    /// Defaults only, no files or environment.
    pub fn defaults() -> Result<RegtreeConfig, ConfigError> {
        builder_with_defaults()?.build()?.try_deserialize()
    }
}
