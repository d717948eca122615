//! Persistence layer for the hierarchical store

use crate::error::StoreError;
use crate::store::{validate_entry_name, AccessMode, Disposition, HierarchicalStore, NodeHandle};
use crate::tree::path::{qualified, KeyPath, SEPARATOR};
use crate::types::{EntryType, RootKey, StoreEntry};
use bincode;
use serde::{Deserialize, Serialize};
use sled;
use std::path::Path;

const KEY_PREFIX: u8 = b'k';
const VALUE_PREFIX: u8 = b'v';

/// Value payload as stored in sled
#[derive(Debug, Serialize, Deserialize)]
struct StoredValue {
    entry_type: EntryType,
    data: Vec<u8>,
}

/// Sled-based implementation of HierarchicalStore
///
/// Layout:
/// - `k <root-tag> <path>` marks an existing key (roots always exist)
/// - `v <root-tag> <path> NUL <name>` holds one bincode-encoded value
///
/// Subkeys and values enumerate in sled's lexicographic byte order.
pub struct SledStore {
    db: sled::Db,
}

impl SledStore {
    /// Create a new SledStore at the given path
    ///
    /// The path can be a directory (sled will create a database there) or
    /// a file path (sled will use it as the database file).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path).map_err(|e| {
            StoreError::StoreUnavailable(format!("Failed to open sled database: {}", e))
        })?;
        Ok(Self { db })
    }

    /// Wrap an already-open database
    pub fn from_db(db: sled::Db) -> Self {
        Self { db }
    }

    /// Get the underlying sled database (for advanced operations)
    pub fn db(&self) -> &sled::Db {
        &self.db
    }

    fn key_exists(&self, root: RootKey, path: &KeyPath) -> Result<bool, StoreError> {
        if path.is_empty() {
            return Ok(true);
        }
        Ok(self.db.contains_key(marker_key(root, path))?)
    }

    fn require_key(&self, handle: &NodeHandle) -> Result<(), StoreError> {
        if !self.key_exists(handle.root(), handle.path())? {
            return Err(StoreError::NotFound(handle.qualified()));
        }
        Ok(())
    }

    /// Direct subkey names of `(root, path)` in byte order
    fn scan_children(&self, root: RootKey, path: &KeyPath) -> Result<Vec<String>, StoreError> {
        let prefix = children_prefix(root, path);
        let mut names = Vec::new();
        for item in self.db.scan_prefix(&prefix) {
            let (key, _) = item?;
            let rest = String::from_utf8_lossy(&key[prefix.len()..]).into_owned();
            if !rest.is_empty() && !rest.contains(SEPARATOR) {
                names.push(rest);
            }
        }
        Ok(names)
    }

    fn scan_values(&self, root: RootKey, path: &KeyPath) -> Result<Vec<StoreEntry>, StoreError> {
        let prefix = values_prefix(root, path);
        let mut entries = Vec::new();
        for item in self.db.scan_prefix(&prefix) {
            let (key, value) = item?;
            let name = String::from_utf8_lossy(&key[prefix.len()..]).into_owned();
            let stored: StoredValue = bincode::deserialize(&value).map_err(|e| {
                StoreError::Backend(format!("Failed to deserialize value '{}': {}", name, e))
            })?;
            entries.push(StoreEntry::new(name, stored.entry_type, stored.data));
        }
        Ok(entries)
    }
}

fn path_bytes(root: RootKey, path: &KeyPath, prefix: u8) -> Vec<u8> {
    let mut key = vec![prefix, root.tag()];
    key.extend_from_slice(path.to_string().as_bytes());
    key
}

fn marker_key(root: RootKey, path: &KeyPath) -> Vec<u8> {
    path_bytes(root, path, KEY_PREFIX)
}

fn children_prefix(root: RootKey, path: &KeyPath) -> Vec<u8> {
    let mut prefix = path_bytes(root, path, KEY_PREFIX);
    if !path.is_empty() {
        prefix.push(SEPARATOR as u8);
    }
    prefix
}

fn values_prefix(root: RootKey, path: &KeyPath) -> Vec<u8> {
    let mut prefix = path_bytes(root, path, VALUE_PREFIX);
    prefix.push(0);
    prefix
}

fn value_key(root: RootKey, path: &KeyPath, name: &str) -> Vec<u8> {
    let mut key = values_prefix(root, path);
    key.extend_from_slice(name.as_bytes());
    key
}

impl HierarchicalStore for SledStore {
    fn open_node(
        &self,
        root: RootKey,
        path: &KeyPath,
        access: AccessMode,
    ) -> Result<NodeHandle, StoreError> {
        if !self.key_exists(root, path)? {
            return Err(StoreError::NotFound(qualified(root, path)));
        }
        Ok(NodeHandle::new(root, path.clone(), access))
    }

    fn enumerate_children(
        &self,
        handle: &NodeHandle,
        index: usize,
    ) -> Result<Option<String>, StoreError> {
        self.require_key(handle)?;
        Ok(self
            .scan_children(handle.root(), handle.path())?
            .into_iter()
            .nth(index))
    }

    fn enumerate_entries(
        &self,
        handle: &NodeHandle,
        index: usize,
    ) -> Result<Option<StoreEntry>, StoreError> {
        self.require_key(handle)?;
        Ok(self
            .scan_values(handle.root(), handle.path())?
            .into_iter()
            .nth(index))
    }

    fn create_node(
        &self,
        root: RootKey,
        path: &KeyPath,
    ) -> Result<(NodeHandle, Disposition), StoreError> {
        let existed = self.key_exists(root, path)?;
        let mut batch = sled::Batch::default();
        let mut current = KeyPath::root();
        for segment in path.segments() {
            current = current.join(segment)?;
            batch.insert(marker_key(root, &current), Vec::<u8>::new());
        }
        self.db.apply_batch(batch)?;
        let disposition = if existed {
            Disposition::OpenedExisting
        } else {
            Disposition::CreatedNew
        };
        Ok((
            NodeHandle::new(root, path.clone(), AccessMode::Write),
            disposition,
        ))
    }

    fn delete_node(&self, root: RootKey, path: &KeyPath) -> Result<(), StoreError> {
        if path.is_empty() {
            return Err(StoreError::InvalidArgument(format!(
                "Cannot delete root key {}",
                root
            )));
        }
        if !self.key_exists(root, path)? {
            return Err(StoreError::NotFound(qualified(root, path)));
        }
        if self
            .db
            .scan_prefix(children_prefix(root, path))
            .next()
            .transpose()?
            .is_some()
        {
            return Err(StoreError::NotEmpty(qualified(root, path)));
        }

        let mut batch = sled::Batch::default();
        batch.remove(marker_key(root, path));
        for item in self.db.scan_prefix(values_prefix(root, path)) {
            let (key, _) = item?;
            batch.remove(key);
        }
        self.db.apply_batch(batch)?;
        Ok(())
    }

    fn set_entry(
        &self,
        handle: &NodeHandle,
        name: &str,
        entry_type: EntryType,
        data: &[u8],
    ) -> Result<(), StoreError> {
        handle.require_write()?;
        validate_entry_name(name)?;
        self.require_key(handle)?;
        let value = bincode::serialize(&StoredValue {
            entry_type,
            data: data.to_vec(),
        })
        .map_err(|e| StoreError::Backend(format!("Failed to serialize value '{}': {}", name, e)))?;
        self.db
            .insert(value_key(handle.root(), handle.path(), name), value)?;
        Ok(())
    }

    fn delete_entry(&self, handle: &NodeHandle, name: &str) -> Result<(), StoreError> {
        handle.require_write()?;
        self.require_key(handle)?;
        let removed = self
            .db
            .remove(value_key(handle.root(), handle.path(), name))?;
        if removed.is_none() {
            return Err(StoreError::NotFound(format!(
                "value '{}' under {}",
                name,
                handle.qualified()
            )));
        }
        Ok(())
    }

    fn child_names(&self, handle: &NodeHandle) -> Result<Vec<String>, StoreError> {
        self.require_key(handle)?;
        self.scan_children(handle.root(), handle.path())
    }

    fn entries(&self, handle: &NodeHandle) -> Result<Vec<StoreEntry>, StoreError> {
        self.require_key(handle)?;
        self.scan_values(handle.root(), handle.path())
    }

    fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }
}
