//! Hierarchical Store
//!
//! Abstraction over a registry-like configuration store: roots hold keys,
//! keys hold subkeys and named typed values. Every handle is scoped to the
//! operation that opened it and released on drop.

pub mod memory;
pub mod persistence;

pub use memory::MemoryStore;
pub use persistence::SledStore;

use crate::error::StoreError;
use crate::tree::path::{qualified, KeyPath};
use crate::types::{EntryType, RootKey, StoreEntry};
use tracing::trace;

/// Intent a key is opened with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
}

/// What `create_node` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    CreatedNew,
    OpenedExisting,
}

/// An open key
///
/// Holds the address and access mode only; backends re-resolve the key on
/// every call, so a key deleted behind an open handle reports `NotFound`.
#[derive(Debug)]
pub struct NodeHandle {
    root: RootKey,
    path: KeyPath,
    access: AccessMode,
}

impl NodeHandle {
    pub(crate) fn new(root: RootKey, path: KeyPath, access: AccessMode) -> Self {
        trace!(key = %qualified(root, &path), ?access, "Opened key");
        Self { root, path, access }
    }

    pub fn root(&self) -> RootKey {
        self.root
    }

    pub fn path(&self) -> &KeyPath {
        &self.path
    }

    pub fn access(&self) -> AccessMode {
        self.access
    }

    /// `ROOT\path` of the key
    pub fn qualified(&self) -> String {
        qualified(self.root, &self.path)
    }

    pub(crate) fn require_write(&self) -> Result<(), StoreError> {
        if self.access != AccessMode::Write {
            return Err(StoreError::AccessDenied(format!(
                "{} was opened read-only",
                self.qualified()
            )));
        }
        Ok(())
    }
}

impl Drop for NodeHandle {
    fn drop(&mut self) {
        trace!(key = %qualified(self.root, &self.path), "Closed key");
    }
}

/// Hierarchical store interface
pub trait HierarchicalStore: Send + Sync {
    /// Open an existing key.
    fn open_node(
        &self,
        root: RootKey,
        path: &KeyPath,
        access: AccessMode,
    ) -> Result<NodeHandle, StoreError>;

    /// Name of the `index`-th subkey, or `None` past the last one.
    fn enumerate_children(
        &self,
        handle: &NodeHandle,
        index: usize,
    ) -> Result<Option<String>, StoreError>;

    /// The `index`-th value, or `None` past the last one.
    fn enumerate_entries(
        &self,
        handle: &NodeHandle,
        index: usize,
    ) -> Result<Option<StoreEntry>, StoreError>;

    /// Create a key (and any missing ancestors) or open it if it exists.
    fn create_node(
        &self,
        root: RootKey,
        path: &KeyPath,
    ) -> Result<(NodeHandle, Disposition), StoreError>;

    /// Delete a key that has no subkeys.
    fn delete_node(&self, root: RootKey, path: &KeyPath) -> Result<(), StoreError>;

    /// Create or replace a value on a key opened for writing.
    fn set_entry(
        &self,
        handle: &NodeHandle,
        name: &str,
        entry_type: EntryType,
        data: &[u8],
    ) -> Result<(), StoreError>;

    /// Remove a value from a key opened for writing.
    fn delete_entry(&self, handle: &NodeHandle, name: &str) -> Result<(), StoreError>;

    /// All subkey names in store order.
    fn child_names(&self, handle: &NodeHandle) -> Result<Vec<String>, StoreError> {
        let mut names = Vec::new();
        while let Some(name) = self.enumerate_children(handle, names.len())? {
            names.push(name);
        }
        Ok(names)
    }

    /// All values in store order.
    fn entries(&self, handle: &NodeHandle) -> Result<Vec<StoreEntry>, StoreError> {
        let mut entries = Vec::new();
        while let Some(entry) = self.enumerate_entries(handle, entries.len())? {
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Persist pending writes. A no-op for in-memory backends.
    fn flush(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

impl<S: HierarchicalStore + ?Sized> HierarchicalStore for Box<S> {
    fn open_node(
        &self,
        root: RootKey,
        path: &KeyPath,
        access: AccessMode,
    ) -> Result<NodeHandle, StoreError> {
        (**self).open_node(root, path, access)
    }

    fn enumerate_children(
        &self,
        handle: &NodeHandle,
        index: usize,
    ) -> Result<Option<String>, StoreError> {
        (**self).enumerate_children(handle, index)
    }

    fn enumerate_entries(
        &self,
        handle: &NodeHandle,
        index: usize,
    ) -> Result<Option<StoreEntry>, StoreError> {
        (**self).enumerate_entries(handle, index)
    }

    fn create_node(
        &self,
        root: RootKey,
        path: &KeyPath,
    ) -> Result<(NodeHandle, Disposition), StoreError> {
        (**self).create_node(root, path)
    }

    fn delete_node(&self, root: RootKey, path: &KeyPath) -> Result<(), StoreError> {
        (**self).delete_node(root, path)
    }

    fn set_entry(
        &self,
        handle: &NodeHandle,
        name: &str,
        entry_type: EntryType,
        data: &[u8],
    ) -> Result<(), StoreError> {
        (**self).set_entry(handle, name, entry_type, data)
    }

    fn delete_entry(&self, handle: &NodeHandle, name: &str) -> Result<(), StoreError> {
        (**self).delete_entry(handle, name)
    }

    fn child_names(&self, handle: &NodeHandle) -> Result<Vec<String>, StoreError> {
        (**self).child_names(handle)
    }

    fn entries(&self, handle: &NodeHandle) -> Result<Vec<StoreEntry>, StoreError> {
        (**self).entries(handle)
    }

    fn flush(&self) -> Result<(), StoreError> {
        (**self).flush()
    }
}

impl<S: HierarchicalStore + ?Sized> HierarchicalStore for &S {
    fn open_node(
        &self,
        root: RootKey,
        path: &KeyPath,
        access: AccessMode,
    ) -> Result<NodeHandle, StoreError> {
        (**self).open_node(root, path, access)
    }

    fn enumerate_children(
        &self,
        handle: &NodeHandle,
        index: usize,
    ) -> Result<Option<String>, StoreError> {
        (**self).enumerate_children(handle, index)
    }

    fn enumerate_entries(
        &self,
        handle: &NodeHandle,
        index: usize,
    ) -> Result<Option<StoreEntry>, StoreError> {
        (**self).enumerate_entries(handle, index)
    }

    fn create_node(
        &self,
        root: RootKey,
        path: &KeyPath,
    ) -> Result<(NodeHandle, Disposition), StoreError> {
        (**self).create_node(root, path)
    }

    fn delete_node(&self, root: RootKey, path: &KeyPath) -> Result<(), StoreError> {
        (**self).delete_node(root, path)
    }

    fn set_entry(
        &self,
        handle: &NodeHandle,
        name: &str,
        entry_type: EntryType,
        data: &[u8],
    ) -> Result<(), StoreError> {
        (**self).set_entry(handle, name, entry_type, data)
    }

    fn delete_entry(&self, handle: &NodeHandle, name: &str) -> Result<(), StoreError> {
        (**self).delete_entry(handle, name)
    }

    fn child_names(&self, handle: &NodeHandle) -> Result<Vec<String>, StoreError> {
        (**self).child_names(handle)
    }

    fn entries(&self, handle: &NodeHandle) -> Result<Vec<StoreEntry>, StoreError> {
        (**self).entries(handle)
    }

    fn flush(&self) -> Result<(), StoreError> {
        (**self).flush()
    }
}

/// Reject value names a backend cannot address.
pub(crate) fn validate_entry_name(name: &str) -> Result<(), StoreError> {
    if name.contains('\0') {
        return Err(StoreError::InvalidArgument(format!(
            "Value name cannot contain NUL: {:?}",
            name
        )));
    }
    Ok(())
}
