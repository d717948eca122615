//! CLI route: single route table and run context. Dispatches to domain services and presentation.

use crate::cli::help::{command_name, is_mutation};
use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_entries_json, format_entries_text, format_tree_json, format_tree_text,
};
use crate::config::{ConfigLoader, RegtreeConfig, StoreBackend, StoreConfig};
use crate::editor::{AlwaysConfirm, Confirm, EditOutcome, Editor};
use crate::error::{ApiError, StoreError};
use crate::export::{export_key, import};
use crate::session::Session;
use crate::store::{HierarchicalStore, MemoryStore, SledStore};
use crate::tree::path::{parse_qualified, qualified};
use crate::tree::{self, KeyPath};
use crate::types::RootKey;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Interactive yes/no prompt on the terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct DialoguerConfirm;

impl Confirm for DialoguerConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        match dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
        {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Failed to get user input: {}", e);
                false
            }
        }
    }
}

/// Runtime context for CLI execution: configuration, the opened store, and
/// the confirmation policy.
pub struct RunContext {
    store: Box<dyn HierarchicalStore>,
    config: RegtreeConfig,
    workspace_root: PathBuf,
    confirm: Box<dyn Confirm>,
    color: bool,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        config.ensure_valid()?;
        let store = open_store(&config.store)?;
        Ok(Self::from_parts(store, config, workspace_root))
    }

    /// Build a context around an already-open store.
    pub fn from_parts(
        store: Box<dyn HierarchicalStore>,
        config: RegtreeConfig,
        workspace_root: PathBuf,
    ) -> Self {
        Self {
            store,
            config,
            workspace_root,
            confirm: Box::new(DialoguerConfirm),
            color: false,
        }
    }

    /// `--yes`: approve every prompt without asking.
    pub fn with_assume_yes(mut self, yes: bool) -> Self {
        if yes {
            self.confirm = Box::new(AlwaysConfirm);
        }
        self
    }

    /// Replace the confirmation policy.
    pub fn with_confirm(mut self, confirm: Box<dyn Confirm>) -> Self {
        self.confirm = confirm;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn store(&self) -> &dyn HierarchicalStore {
        self.store.as_ref()
    }

    pub fn config(&self) -> &RegtreeConfig {
        &self.config
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let started = Instant::now();
        let name = command_name(command);
        debug!(command = name, "Executing command");

        let result = self.execute_inner(command).and_then(|output| {
            if is_mutation(command) {
                self.store.flush()?;
            }
            Ok(output)
        });

        info!(
            command = name,
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis(),
            "Command finished"
        );
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<String, ApiError> {
        let store = self.store.as_ref();
        let editor = Editor::new(store);
        match command {
            Commands::Tree {
                roots,
                depth,
                format,
            } => {
                let roots = if roots.is_empty() {
                    self.config.explorer.labelled_roots()
                } else {
                    roots
                        .iter()
                        .map(|r| {
                            r.parse::<RootKey>()
                                .map(|root| (root, root.name().to_string()))
                        })
                        .collect::<Result<Vec<_>, StoreError>>()?
                };
                let depth = depth.unwrap_or(self.config.explorer.max_depth);
                let tree = tree::populate(store, &roots, depth)?;
                match output_format(format)? {
                    OutputFormat::Json => format_tree_json(&tree),
                    OutputFormat::Text => Ok(format_tree_text(&tree, self.color)),
                }
            }
            Commands::Expand { key } => {
                let (root, path) = parse_qualified(key)?;
                let mut session = Session::with_roots(
                    store,
                    vec![(root, root.name().to_string())],
                    self.config.explorer.max_depth,
                )?;
                let id = session.select_path(root, &path)?;
                session.expand(id)?;
                let tree = session.tree();
                let mut lines = vec![qualified(root, &path)];
                let children = tree.children(id);
                if children.is_empty() {
                    lines.push("  (no subkeys)".to_string());
                }
                for child in children {
                    if let Some(node) = tree.get(*child) {
                        lines.push(format!("  {}", node.label));
                    }
                }
                Ok(lines.join("\n"))
            }
            Commands::Values { key, format } => {
                let (root, path) = parse_qualified(key)?;
                let entries = editor.list_entries(root, &path)?;
                let key = qualified(root, &path);
                match output_format(format)? {
                    OutputFormat::Json => format_entries_json(&key, &entries),
                    OutputFormat::Text => Ok(format_entries_text(&key, &entries)),
                }
            }
            Commands::Exists { key, value } => {
                let (root, path) = parse_qualified(key)?;
                let exists = match value {
                    Some(name) => editor.entry_exists(root, &path, name),
                    None => editor.key_exists(root, &path),
                };
                Ok(if exists { "EXISTS" } else { "DOES NOT EXIST" }.to_string())
            }
            Commands::CreateKey { key } => {
                let (root, path) = parse_qualified(key)?;
                let outcome = editor.create_or_update_key(root, &path, self.confirm.as_ref())?;
                Ok(describe_key_outcome(outcome, root, &path))
            }
            Commands::SetValue { key, name, data } => {
                let (root, path) = parse_qualified(key)?;
                editor.set_entry(root, &path, name, data)?;
                Ok(format!("Set {} in {}", name, qualified(root, &path)))
            }
            Commands::DeleteKey { key } => {
                let (root, path) = parse_qualified(key)?;
                let outcome = editor.delete_key(root, &path, self.confirm.as_ref())?;
                Ok(describe_key_outcome(outcome, root, &path))
            }
            Commands::DeleteValue { key, name } => {
                let (root, path) = parse_qualified(key)?;
                let outcome = editor.delete_entry(root, &path, name, self.confirm.as_ref())?;
                Ok(match outcome {
                    EditOutcome::Aborted => format!("Cancelled; {} unchanged", name),
                    _ => format!("Deleted value {} from {}", name, qualified(root, &path)),
                })
            }
            Commands::Export {
                key,
                output,
                recursive,
            } => {
                let (root, path) = parse_qualified(key)?;
                let text = export_key(store, root, &path, *recursive)?;
                match output {
                    Some(file) => {
                        std::fs::write(file, &text).map_err(StoreError::from)?;
                        Ok(format!(
                            "Exported {} to {}",
                            qualified(root, &path),
                            file.display()
                        ))
                    }
                    None => Ok(text.trim_end().to_string()),
                }
            }
            Commands::Import { file } => {
                let text = std::fs::read_to_string(file).map_err(StoreError::from)?;
                let summary = import(store, &text)?;
                Ok(format!(
                    "Imported {}: {} keys created, {} keys updated, {} keys deleted, {} values set, {} values deleted",
                    file.display(),
                    summary.keys_created,
                    summary.keys_opened,
                    summary.keys_deleted,
                    summary.values_set,
                    summary.values_deleted
                ))
            }
        }
    }
}

/// Open the configured backend.
pub fn open_store(config: &StoreConfig) -> Result<Box<dyn HierarchicalStore>, ApiError> {
    match config.backend {
        StoreBackend::Memory => {
            info!(seeded = config.seed, "Using in-memory store");
            if config.seed {
                Ok(Box::new(MemoryStore::seeded()))
            } else {
                Ok(Box::new(MemoryStore::new()))
            }
        }
        StoreBackend::Sled => {
            let path = config.resolve_path()?;
            std::fs::create_dir_all(&path).map_err(StoreError::from)?;
            info!(path = %path.display(), "Opening sled store");
            Ok(Box::new(SledStore::new(&path)?))
        }
    }
}

enum OutputFormat {
    Text,
    Json,
}

fn output_format(format: &str) -> Result<OutputFormat, ApiError> {
    match format {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        other => Err(ApiError::OutputError(format!(
            "Invalid format '{}' (must be 'text' or 'json')",
            other
        ))),
    }
}

fn describe_key_outcome(outcome: EditOutcome, root: RootKey, path: &KeyPath) -> String {
    let key = qualified(root, path);
    match outcome {
        EditOutcome::Created => format!("Created key {}", key),
        EditOutcome::OpenedExisting => format!("Opened existing key {}", key),
        EditOutcome::Deleted => format!("Deleted key {}", key),
        EditOutcome::Written => format!("Updated {}", key),
        EditOutcome::Aborted => format!("Cancelled; {} unchanged", key),
    }
}
