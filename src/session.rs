//! Browsing session: the current tree, the current selection, and the
//! refresh-after-mutation policy.

use crate::editor::{Confirm, EditOutcome, Editor};
use crate::error::StoreError;
use crate::store::HierarchicalStore;
use crate::tree::path::qualified;
use crate::tree::{self, resolve_path, KeyPath, TreeNodeId, TreeView, DEFAULT_MAX_DEPTH};
use crate::types::{RootKey, StoreEntry};
use tracing::{debug, info};

/// Explicit state for one browsing session over a store
pub struct Session<S: HierarchicalStore> {
    store: S,
    roots: Vec<(RootKey, String)>,
    max_depth: usize,
    tree: TreeView,
    selection: Option<TreeNodeId>,
}

impl<S: HierarchicalStore> Session<S> {
    /// Open a session over every root with the default depth bound.
    pub fn new(store: S) -> Result<Self, StoreError> {
        Self::with_roots(store, RootKey::default_roots(), DEFAULT_MAX_DEPTH)
    }

    /// Open a session and populate the tree.
    pub fn with_roots(
        store: S,
        roots: Vec<(RootKey, String)>,
        max_depth: usize,
    ) -> Result<Self, StoreError> {
        let tree = tree::populate(&store, &roots, max_depth)?;
        Ok(Self {
            store,
            roots,
            max_depth,
            tree,
            selection: None,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn tree(&self) -> &TreeView {
        &self.tree
    }

    pub fn editor(&self) -> Editor<'_, S> {
        Editor::new(&self.store)
    }

    pub fn selection(&self) -> Option<TreeNodeId> {
        self.selection
    }

    /// Rebuild the tree from scratch.
    ///
    /// The selection is resolved again by path, expanding below the depth
    /// bound as needed; it is cleared only when its key no longer resolves.
    pub fn refresh(&mut self) -> Result<(), StoreError> {
        let selected = self.selection_path();
        self.tree = tree::populate(&self.store, &self.roots, self.max_depth)?;
        self.selection = None;
        if let Some((root, path)) = selected {
            match self.select_path(root, &path) {
                Ok(_) => {}
                Err(StoreError::NotFound(_)) | Err(StoreError::AccessDenied(_)) => {
                    debug!(key = %qualified(root, &path), "Selection no longer resolves");
                }
                Err(e) => return Err(e),
            }
        }
        debug!(nodes = self.tree.len(), "Session tree refreshed");
        Ok(())
    }

    /// Select a materialized node.
    pub fn select(&mut self, node_id: TreeNodeId) -> Result<(), StoreError> {
        if self.tree.get(node_id).is_none() {
            return Err(StoreError::NotFound(format!(
                "tree node {} is not materialized",
                node_id
            )));
        }
        self.selection = Some(node_id);
        Ok(())
    }

    /// Select the node for `(root, path)`, expanding keys below the depth
    /// bound as needed.
    pub fn select_path(&mut self, root: RootKey, path: &KeyPath) -> Result<TreeNodeId, StoreError> {
        let mut current = self
            .tree
            .find(root, &KeyPath::root())
            .ok_or_else(|| StoreError::NotFound(root.name().to_string()))?;
        let mut walked = KeyPath::root();
        for segment in path.segments() {
            walked = walked.join(segment)?;
            if !self.tree.get(current).map(|n| n.expanded).unwrap_or(false) {
                self.expand(current)?;
            }
            current = self
                .tree
                .find(root, &walked)
                .ok_or_else(|| StoreError::NotFound(qualified(root, &walked)))?;
        }
        self.selection = Some(current);
        Ok(current)
    }

    /// Expand one level below a node.
    pub fn expand(&mut self, node_id: TreeNodeId) -> Result<usize, StoreError> {
        tree::expand_node(&self.store, &mut self.tree, node_id)
    }

    /// Store address of the current selection.
    pub fn selection_path(&self) -> Option<(RootKey, KeyPath)> {
        self.selection
            .and_then(|id| resolve_path(&self.tree, id))
    }

    /// Values of the selected key.
    pub fn selected_entries(&self) -> Result<Vec<StoreEntry>, StoreError> {
        let (root, path) = self
            .selection_path()
            .ok_or_else(|| StoreError::InvalidArgument("No key selected".to_string()))?;
        self.editor().list_entries(root, &path)
    }

    pub fn create_key(
        &mut self,
        root: RootKey,
        path: &KeyPath,
        confirm: &dyn Confirm,
    ) -> Result<EditOutcome, StoreError> {
        let outcome = self.editor().create_or_update_key(root, path, confirm)?;
        self.after_mutation(outcome)
    }

    /// Set a text value; the tree shape does not change, so no rebuild.
    pub fn set_entry(
        &mut self,
        root: RootKey,
        path: &KeyPath,
        name: &str,
        text: &str,
    ) -> Result<EditOutcome, StoreError> {
        self.editor().set_entry(root, path, name, text)
    }

    pub fn delete_key(
        &mut self,
        root: RootKey,
        path: &KeyPath,
        confirm: &dyn Confirm,
    ) -> Result<EditOutcome, StoreError> {
        let outcome = self.editor().delete_key(root, path, confirm)?;
        self.after_mutation(outcome)
    }

    pub fn delete_entry(
        &mut self,
        root: RootKey,
        path: &KeyPath,
        name: &str,
        confirm: &dyn Confirm,
    ) -> Result<EditOutcome, StoreError> {
        self.editor().delete_entry(root, path, name, confirm)
    }

    fn after_mutation(&mut self, outcome: EditOutcome) -> Result<EditOutcome, StoreError> {
        if outcome != EditOutcome::Aborted {
            info!(?outcome, "Refreshing tree after mutation");
            self.refresh()?;
        }
        Ok(outcome)
    }

    /// Give the store back, ending the session.
    pub fn into_store(self) -> S {
        self.store
    }
}
