//! Tree builder: eager bounded population and on-demand expansion

use crate::error::StoreError;
use crate::store::HierarchicalStore;
use crate::tree::node::{TreeNodeId, TreeView};
use crate::tree::path::qualified;
use crate::tree::walker::{Walker, WalkerConfig};
use crate::types::RootKey;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// Builds [`TreeView`]s from a store
pub struct TreeBuilder<'a, S: HierarchicalStore + ?Sized> {
    store: &'a S,
    walker_config: WalkerConfig,
}

impl<'a, S: HierarchicalStore + ?Sized> TreeBuilder<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            walker_config: WalkerConfig::default(),
        }
    }

    /// Set walker config (depth bound).
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    fn walker(&self) -> Walker<'a, S> {
        Walker::with_config(self.store, self.walker_config.clone())
    }

    /// Build a fresh tree for `roots`, in the given order.
    ///
    /// A root that cannot be enumerated is left out of the tree and recorded
    /// as skipped. Fails with `StoreUnavailable` only when no root could be
    /// enumerated at all.
    #[instrument(skip(self, roots), fields(roots = roots.len(), max_depth = self.walker_config.max_depth))]
    pub fn build(&self, roots: &[(RootKey, String)]) -> Result<TreeView, StoreError> {
        let start = Instant::now();
        let walker = self.walker();
        let mut tree = TreeView::new(self.walker_config.max_depth);
        let mut failures = Vec::new();

        for (root, label) in roots {
            let names = match walker.child_names(*root, &Default::default()) {
                Ok(names) => names,
                Err(e) => {
                    warn!(root = %root, "Root could not be enumerated: {}", e);
                    tree.record_skip(*root, Default::default(), e.to_string());
                    failures.push(format!("{}: {}", root, e));
                    continue;
                }
            };
            let id = tree.add_root(*root, label.clone());
            if self.walker_config.max_depth == 0 {
                continue;
            }
            walker.attach(&mut tree, id, names);
        }

        if !roots.is_empty() && failures.len() == roots.len() {
            error!("No root could be enumerated");
            return Err(StoreError::StoreUnavailable(failures.join("; ")));
        }

        info!(
            node_count = tree.len(),
            skipped = tree.skipped().len(),
            duration_ms = start.elapsed().as_millis(),
            "Tree build completed"
        );
        Ok(tree)
    }

    /// Enumerate exactly one level below `node_id`, ignoring the depth bound.
    ///
    /// Any children materialized earlier are replaced. Returns the number of
    /// children now attached.
    #[instrument(skip(self, tree))]
    pub fn expand(&self, tree: &mut TreeView, node_id: TreeNodeId) -> Result<usize, StoreError> {
        let (root, path) = match tree.get(node_id) {
            Some(node) => (node.node.root, node.node.path.clone()),
            None => {
                return Err(StoreError::NotFound(format!(
                    "tree node {} is not materialized",
                    node_id
                )))
            }
        };

        let names = self.walker().child_names(root, &path)?;
        tree.clear_children(node_id);

        // One level only: the walker recurses while depth < max_depth, so a
        // zero bound keeps it from descending further.
        let one_level = Walker::with_config(self.store, WalkerConfig { max_depth: 0 });
        let attached = one_level.attach(tree, node_id, names);
        debug!(key = %qualified(root, &path), children = attached.len(), "Expanded key");
        Ok(attached.len())
    }
}
