//! In-memory store backend

use crate::error::StoreError;
use crate::store::{validate_entry_name, AccessMode, Disposition, HierarchicalStore, NodeHandle};
use crate::tree::path::{qualified, KeyPath};
use crate::types::{EntryType, RootKey, StoreEntry};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default, Clone)]
struct KeyData {
    /// Subkeys in insertion order
    subkeys: Vec<(String, KeyData)>,
    /// Values in insertion order
    values: Vec<StoreEntry>,
}

impl KeyData {
    fn child(&self, name: &str) -> Option<&KeyData> {
        self.subkeys.iter().find(|(n, _)| n == name).map(|(_, k)| k)
    }

    fn child_mut(&mut self, name: &str) -> Option<&mut KeyData> {
        self.subkeys
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, k)| k)
    }

    fn descend(&self, path: &KeyPath) -> Option<&KeyData> {
        path.segments()
            .iter()
            .try_fold(self, |key, segment| key.child(segment))
    }

    fn descend_mut(&mut self, path: &KeyPath) -> Option<&mut KeyData> {
        let mut key = self;
        for segment in path.segments() {
            key = key.child_mut(segment)?;
        }
        Some(key)
    }
}

/// Volatile store kept entirely in memory
///
/// Preserves insertion order of subkeys and values. Individual keys can be
/// marked access-denied to exercise failure paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    roots: RwLock<HashMap<RootKey, KeyData>>,
    denied: RwLock<HashSet<(RootKey, KeyPath)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A small demonstration hierarchy under every root.
    pub fn seeded() -> Self {
        let store = Self::new();
        let seed: &[(RootKey, &str)] = &[
            (RootKey::CurrentUser, "Software\\Regtree\\Settings"),
            (RootKey::CurrentUser, "Software\\Vendor"),
            (RootKey::CurrentUser, "Environment"),
            (RootKey::CurrentUser, "Control Panel\\Desktop"),
            (RootKey::LocalMachine, "SOFTWARE\\Microsoft\\Windows"),
            (RootKey::LocalMachine, "SYSTEM\\CurrentControlSet\\Services"),
            (RootKey::ClassesRoot, ".txt"),
            (RootKey::ClassesRoot, "txtfile\\shell\\open"),
            (RootKey::Users, ".DEFAULT\\Software"),
            (RootKey::CurrentConfig, "System\\CurrentControlSet"),
        ];
        {
            let mut roots = store.roots.write();
            for (root, path) in seed {
                ensure_path(roots.entry(*root).or_default(), &KeyPath::parse(path));
            }
            let current_user = roots.entry(RootKey::CurrentUser).or_default();
            if let Some(settings) =
                current_user.descend_mut(&KeyPath::parse("Software\\Regtree\\Settings"))
            {
                settings.values.push(StoreEntry::text("Theme", "dark"));
                settings.values.push(StoreEntry::dword("MaxDepth", 2));
            }
            if let Some(env) = current_user.descend_mut(&KeyPath::parse("Environment")) {
                env.values.push(StoreEntry::new(
                    "Path",
                    EntryType::ExpandableText,
                    crate::types::encode_text("%USERPROFILE%\\bin"),
                ));
            }
        }
        store
    }

    /// Make `(root, path)` fail every open with `AccessDenied`.
    pub fn deny(&self, root: RootKey, path: &KeyPath) {
        self.denied.write().insert((root, path.clone()));
    }

    /// Lift a previous [`MemoryStore::deny`].
    pub fn allow(&self, root: RootKey, path: &KeyPath) {
        self.denied.write().remove(&(root, path.clone()));
    }

    fn check_access(&self, root: RootKey, path: &KeyPath) -> Result<(), StoreError> {
        if self.denied.read().contains(&(root, path.clone())) {
            return Err(StoreError::AccessDenied(qualified(root, path)));
        }
        Ok(())
    }

    fn with_key<T>(
        &self,
        handle: &NodeHandle,
        f: impl FnOnce(&KeyData) -> T,
    ) -> Result<T, StoreError> {
        let roots = self.roots.read();
        let empty = KeyData::default();
        let root = roots.get(&handle.root()).unwrap_or(&empty);
        root.descend(handle.path())
            .map(f)
            .ok_or_else(|| StoreError::NotFound(handle.qualified()))
    }

    fn with_key_mut<T>(
        &self,
        handle: &NodeHandle,
        f: impl FnOnce(&mut KeyData) -> T,
    ) -> Result<T, StoreError> {
        let mut roots = self.roots.write();
        roots
            .entry(handle.root())
            .or_default()
            .descend_mut(handle.path())
            .map(f)
            .ok_or_else(|| StoreError::NotFound(handle.qualified()))
    }
}

/// Walk `path`, creating missing keys. Returns the leaf and whether it was new.
fn ensure_path<'a>(root: &'a mut KeyData, path: &KeyPath) -> (&'a mut KeyData, bool) {
    let mut key = root;
    let mut created = false;
    for segment in path.segments() {
        let idx = match key.subkeys.iter().position(|(n, _)| n == segment) {
            Some(idx) => {
                created = false;
                idx
            }
            None => {
                key.subkeys.push((segment.clone(), KeyData::default()));
                created = true;
                key.subkeys.len() - 1
            }
        };
        key = &mut key.subkeys[idx].1;
    }
    (key, created)
}

impl HierarchicalStore for MemoryStore {
    fn open_node(
        &self,
        root: RootKey,
        path: &KeyPath,
        access: AccessMode,
    ) -> Result<NodeHandle, StoreError> {
        self.check_access(root, path)?;
        let roots = self.roots.read();
        let exists = match roots.get(&root) {
            Some(key) => key.descend(path).is_some(),
            None => path.is_empty(),
        };
        if !exists {
            return Err(StoreError::NotFound(qualified(root, path)));
        }
        Ok(NodeHandle::new(root, path.clone(), access))
    }

    fn enumerate_children(
        &self,
        handle: &NodeHandle,
        index: usize,
    ) -> Result<Option<String>, StoreError> {
        self.with_key(handle, |key| key.subkeys.get(index).map(|(n, _)| n.clone()))
    }

    fn enumerate_entries(
        &self,
        handle: &NodeHandle,
        index: usize,
    ) -> Result<Option<StoreEntry>, StoreError> {
        self.with_key(handle, |key| key.values.get(index).cloned())
    }

    fn create_node(
        &self,
        root: RootKey,
        path: &KeyPath,
    ) -> Result<(NodeHandle, Disposition), StoreError> {
        self.check_access(root, path)?;
        let mut roots = self.roots.write();
        let (_, created) = ensure_path(roots.entry(root).or_default(), path);
        let disposition = if created {
            Disposition::CreatedNew
        } else {
            Disposition::OpenedExisting
        };
        Ok((
            NodeHandle::new(root, path.clone(), AccessMode::Write),
            disposition,
        ))
    }

    fn delete_node(&self, root: RootKey, path: &KeyPath) -> Result<(), StoreError> {
        let (parent_path, name) = match (path.parent(), path.last()) {
            (Some(parent), Some(name)) => (parent, name.to_string()),
            _ => {
                return Err(StoreError::InvalidArgument(format!(
                    "Cannot delete root key {}",
                    root
                )))
            }
        };
        self.check_access(root, path)?;
        let mut roots = self.roots.write();
        let parent = roots
            .entry(root)
            .or_default()
            .descend_mut(&parent_path)
            .ok_or_else(|| StoreError::NotFound(qualified(root, path)))?;
        let idx = parent
            .subkeys
            .iter()
            .position(|(n, _)| *n == name)
            .ok_or_else(|| StoreError::NotFound(qualified(root, path)))?;
        if !parent.subkeys[idx].1.subkeys.is_empty() {
            return Err(StoreError::NotEmpty(qualified(root, path)));
        }
        parent.subkeys.remove(idx);
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
        let entry = StoreEntry::new(name, entry_type, data.to_vec());
        self.with_key_mut(handle, |key| {
            match key.values.iter_mut().find(|v| v.name == name) {
                Some(existing) => *existing = entry,
                None => key.values.push(entry),
            }
        })
    }

    fn delete_entry(&self, handle: &NodeHandle, name: &str) -> Result<(), StoreError> {
        handle.require_write()?;
        let removed = self.with_key_mut(handle, |key| {
            let before = key.values.len();
            key.values.retain(|v| v.name != name);
            before != key.values.len()
        })?;
        if !removed {
            return Err(StoreError::NotFound(format!(
                "value '{}' under {}",
                name,
                handle.qualified()
            )));
        }
        Ok(())
    }
}
