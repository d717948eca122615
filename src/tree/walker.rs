//! Depth-bounded key walker

use crate::error::StoreError;
use crate::store::{AccessMode, HierarchicalStore};
use crate::tree::node::{TreeNodeId, TreeView};
use crate::tree::path::{qualified, KeyPath};
use crate::types::RootKey;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default eager population depth
pub const DEFAULT_MAX_DEPTH: usize = 2;

/// Walker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkerConfig {
    /// Deepest level materialized during eager population (root is depth 0)
    pub max_depth: usize,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Walks the store below tree nodes, materializing children into a [`TreeView`]
pub struct Walker<'a, S: HierarchicalStore + ?Sized> {
    store: &'a S,
    config: WalkerConfig,
}

impl<'a, S: HierarchicalStore + ?Sized> Walker<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            config: WalkerConfig::default(),
        }
    }

    pub fn with_config(store: &'a S, config: WalkerConfig) -> Self {
        Self { store, config }
    }

    /// Subkey names of one key, opening and releasing its handle.
    pub fn child_names(&self, root: RootKey, path: &KeyPath) -> Result<Vec<String>, StoreError> {
        let handle = self.store.open_node(root, path, AccessMode::Read)?;
        let names = self.store.child_names(&handle)?;
        debug!(key = %qualified(root, path), children = names.len(), "Enumerated subkeys");
        Ok(names)
    }

    /// Attach already-enumerated `names` under `parent`, then recurse while
    /// the children are above the depth bound.
    ///
    /// Returns the ids of the attached children.
    pub fn attach(
        &self,
        tree: &mut TreeView,
        parent: TreeNodeId,
        names: Vec<String>,
    ) -> Vec<TreeNodeId> {
        let (root, parent_path) = match tree.get(parent) {
            Some(node) => (node.node.root, node.node.path.clone()),
            None => return Vec::new(),
        };
        tree.set_expanded(parent, true);

        let mut attached = Vec::with_capacity(names.len());
        for name in names {
            let path = match parent_path.join(&name) {
                Ok(path) => path,
                Err(e) => {
                    warn!(key = %qualified(root, &parent_path), name = %name, "Skipping unaddressable subkey: {}", e);
                    tree.record_skip(root, parent_path.clone(), e.to_string());
                    continue;
                }
            };
            if let Some(id) = tree.add_child(parent, name, path) {
                attached.push(id);
            }
        }

        for id in &attached {
            self.descend(tree, *id);
        }
        attached
    }

    /// Eagerly populate below `id` until the depth bound.
    ///
    /// A key that cannot be enumerated leaves its node childless; the
    /// failure is logged and recorded on the tree.
    fn descend(&self, tree: &mut TreeView, id: TreeNodeId) {
        let (root, path) = match tree.get(id) {
            Some(node) => (node.node.root, node.node.path.clone()),
            None => return,
        };
        if path.len() >= self.config.max_depth {
            return;
        }
        match self.child_names(root, &path) {
            Ok(names) => {
                self.attach(tree, id, names);
            }
            Err(e) => {
                warn!(key = %qualified(root, &path), "Skipping subtree: {}", e);
                tree.record_skip(root, path, e.to_string());
            }
        }
    }
}
