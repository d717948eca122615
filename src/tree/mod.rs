//! Bounded Tree Explorer
//!
//! Mirrors a depth-bounded part of the hierarchical store into an in-memory
//! tree for browsing, and maps tree nodes back to store addresses.

pub mod builder;
pub mod node;
pub mod path;
pub mod walker;

pub use builder::TreeBuilder;
pub use node::{SkippedSubtree, StoreNode, TreeNode, TreeNodeId, TreeView};
pub use path::{resolve_path, KeyPath};
pub use walker::{WalkerConfig, DEFAULT_MAX_DEPTH};

use crate::error::StoreError;
use crate::store::HierarchicalStore;
use crate::types::RootKey;

/// Build a fresh tree for `roots`, materializing keys down to `max_depth`.
pub fn populate<S: HierarchicalStore + ?Sized>(
    store: &S,
    roots: &[(RootKey, String)],
    max_depth: usize,
) -> Result<TreeView, StoreError> {
    TreeBuilder::new(store)
        .with_walker_config(WalkerConfig { max_depth })
        .build(roots)
}

/// Enumerate one more level below `node_id`, regardless of the depth bound.
pub fn expand_node<S: HierarchicalStore + ?Sized>(
    store: &S,
    tree: &mut TreeView,
    node_id: TreeNodeId,
) -> Result<usize, StoreError> {
    TreeBuilder::new(store).expand(tree, node_id)
}
