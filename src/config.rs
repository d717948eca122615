//! Configuration System
//!
//! Layered configuration: built-in defaults, the per-user file, workspace
//! files, and `REGTREE__*` environment overrides, merged by `config`.

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::tree::DEFAULT_MAX_DEPTH;
use crate::types::RootKey;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RegtreeConfig {
    /// Backend selection
    #[serde(default)]
    pub store: StoreConfig,

    /// Tree population settings
    #[serde(default)]
    pub explorer: ExplorerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which store implementation backs a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// In-process store; contents are lost on exit
    Memory,
    /// Persistent store on disk
    #[default]
    Sled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Sled database directory; defaults to the per-user data directory
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Seed the memory backend with demo keys
    #[serde(default = "default_true")]
    pub seed: bool,
}

fn default_true() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: None,
            seed: true,
        }
    }
}

impl StoreConfig {
    /// Database directory for the sled backend.
    pub fn resolve_path(&self) -> Result<PathBuf, ApiError> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        directories::ProjectDirs::from("", "", "regtree")
            .map(|dirs| dirs.data_dir().join("store"))
            .ok_or_else(|| {
                ApiError::ConfigError("Could not determine a data directory for the store".into())
            })
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(path) = &self.path {
            if path.as_os_str().is_empty() {
                return Err("Store path cannot be empty".to_string());
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorerConfig {
    /// Deepest level populated eagerly
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Roots shown, in order
    #[serde(default = "default_roots")]
    pub roots: Vec<RootKey>,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_roots() -> Vec<RootKey> {
    RootKey::ALL.to_vec()
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            roots: default_roots(),
        }
    }
}

impl ExplorerConfig {
    /// Roots paired with their display labels.
    pub fn labelled_roots(&self) -> Vec<(RootKey, String)> {
        self.roots
            .iter()
            .map(|root| (*root, root.name().to_string()))
            .collect()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_depth == 0 {
            return Err("max_depth must be at least 1".to_string());
        }
        if self.roots.is_empty() {
            return Err("At least one root must be configured".to_string());
        }
        let mut seen = HashSet::new();
        for root in &self.roots {
            if !seen.insert(root) {
                return Err(format!("Duplicate root '{}'", root));
            }
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Store(String),
    Explorer(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Store(msg) => write!(f, "Store: {}", msg),
            ValidationError::Explorer(msg) => write!(f, "Explorer: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl RegtreeConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.store.validate() {
            errors.push(ValidationError::Store(e));
        }
        if let Err(e) = self.explorer.validate() {
            errors.push(ValidationError::Explorer(e));
        }
        if !matches!(self.logging.format.as_str(), "text" | "json") {
            errors.push(ValidationError::Logging(format!(
                "Invalid format '{}'",
                self.logging.format
            )));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and fold all problems into one `ApiError`.
    pub fn ensure_valid(&self) -> Result<(), ApiError> {
        self.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })
    }
}
