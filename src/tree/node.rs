//! In-memory mirror of a bounded part of the store

use crate::tree::path::KeyPath;
use crate::types::RootKey;
use serde::Serialize;

/// Index of a node inside a [`TreeView`]
pub type TreeNodeId = usize;

/// One addressable location in the store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct StoreNode {
    pub root: RootKey,
    pub path: KeyPath,
}

impl StoreNode {
    pub fn new(root: RootKey, path: KeyPath) -> Self {
        Self { root, path }
    }

    /// Depth below the root (0 for the root itself)
    pub fn depth(&self) -> usize {
        self.path.len()
    }
}

/// A materialized tree node
#[derive(Debug, Clone, Serialize)]
pub struct TreeNode {
    pub id: TreeNodeId,
    pub parent: Option<TreeNodeId>,
    /// Display label: the root's label for depth 0, the key name otherwise
    pub label: String,
    pub node: StoreNode,
    pub children: Vec<TreeNodeId>,
    /// Whether this node's children have been enumerated
    pub expanded: bool,
}

impl TreeNode {
    pub fn depth(&self) -> usize {
        self.node.depth()
    }
}

/// A subtree the explorer could not enumerate
#[derive(Debug, Clone, Serialize)]
pub struct SkippedSubtree {
    pub root: RootKey,
    pub path: KeyPath,
    pub reason: String,
}

/// Depth-bounded mirror of the store
///
/// Nodes live in an arena; ids stay valid until the subtree containing them
/// is replaced by a re-expansion.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TreeView {
    nodes: Vec<Option<TreeNode>>,
    roots: Vec<TreeNodeId>,
    max_depth: usize,
    skipped: Vec<SkippedSubtree>,
}

impl TreeView {
    pub fn new(max_depth: usize) -> Self {
        Self {
            nodes: Vec::new(),
            roots: Vec::new(),
            max_depth,
            skipped: Vec::new(),
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Root node ids in population order
    pub fn roots(&self) -> &[TreeNodeId] {
        &self.roots
    }

    pub fn get(&self, id: TreeNodeId) -> Option<&TreeNode> {
        self.nodes.get(id).and_then(Option::as_ref)
    }

    pub fn children(&self, id: TreeNodeId) -> &[TreeNodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(&self, id: TreeNodeId) -> Option<TreeNodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Subtrees skipped during population or expansion
    pub fn skipped(&self) -> &[SkippedSubtree] {
        &self.skipped
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Iterate over live nodes in arena order.
    pub fn iter(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter().filter_map(Option::as_ref)
    }

    /// Find the materialized node addressing `(root, path)`.
    pub fn find(&self, root: RootKey, path: &KeyPath) -> Option<TreeNodeId> {
        let mut current = *self
            .roots
            .iter()
            .find(|id| self.get(**id).map(|n| n.node.root) == Some(root))?;
        for segment in path.segments() {
            current = *self
                .children(current)
                .iter()
                .find(|id| self.get(**id).map(|n| n.label.as_str()) == Some(segment.as_str()))?;
        }
        Some(current)
    }

    /// Greatest depth among live nodes
    pub fn deepest(&self) -> usize {
        self.iter().map(TreeNode::depth).max().unwrap_or(0)
    }

    pub(crate) fn add_root(&mut self, root: RootKey, label: String) -> TreeNodeId {
        let id = self.nodes.len();
        self.nodes.push(Some(TreeNode {
            id,
            parent: None,
            label,
            node: StoreNode::new(root, KeyPath::root()),
            children: Vec::new(),
            expanded: false,
        }));
        self.roots.push(id);
        id
    }

    pub(crate) fn add_child(
        &mut self,
        parent: TreeNodeId,
        label: String,
        path: KeyPath,
    ) -> Option<TreeNodeId> {
        let root = self.get(parent)?.node.root;
        let id = self.nodes.len();
        self.nodes.push(Some(TreeNode {
            id,
            parent: Some(parent),
            label,
            node: StoreNode::new(root, path),
            children: Vec::new(),
            expanded: false,
        }));
        if let Some(Some(p)) = self.nodes.get_mut(parent) {
            p.children.push(id);
        }
        Some(id)
    }

    pub(crate) fn set_expanded(&mut self, id: TreeNodeId, expanded: bool) {
        if let Some(Some(node)) = self.nodes.get_mut(id) {
            node.expanded = expanded;
        }
    }

    /// Drop every descendant of `id`, leaving it childless and collapsed.
    pub(crate) fn clear_children(&mut self, id: TreeNodeId) {
        let mut stack: Vec<TreeNodeId> = match self.nodes.get_mut(id) {
            Some(Some(node)) => {
                node.expanded = false;
                std::mem::take(&mut node.children)
            }
            _ => return,
        };
        while let Some(child) = stack.pop() {
            if let Some(slot) = self.nodes.get_mut(child) {
                if let Some(node) = slot.take() {
                    stack.extend(node.children);
                }
            }
        }
    }

    pub(crate) fn record_skip(&mut self, root: RootKey, path: KeyPath, reason: String) {
        self.skipped.push(SkippedSubtree { root, path, reason });
    }
}
