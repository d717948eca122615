//! Public entry point for loading configuration.

use super::merge::MergeService;
use super::sources::global_file;
use super::RegtreeConfig;
use config::ConfigError;
use std::path::{Path, PathBuf};

/// Loads [`RegtreeConfig`] from the layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    pub fn load(workspace_root: &Path) -> Result<RegtreeConfig, ConfigError> {
        MergeService::load(workspace_root)
    }

    /// Load configuration from one explicit file (`--config`).
    pub fn load_from_file(path: &Path) -> Result<RegtreeConfig, ConfigError> {
        MergeService::load_from_file(path)
    }

    /// Location of the per-user config file, if one can be determined.
    pub fn xdg_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }

    /// Built-in defaults.
    pub fn defaults() -> RegtreeConfig {
        MergeService::defaults().unwrap_or_default()
    }
}
