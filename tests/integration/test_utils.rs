//! Shared test utilities for integration tests
//!
//! Provides an isolated environment for config loading and a store wrapper
//! that counts backend calls.

use regtree::store::{AccessMode, Disposition, HierarchicalStore, MemoryStore, NodeHandle};
use regtree::{EntryType, KeyPath, RootKey, StoreEntry, StoreError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tempfile::TempDir;

/// Serializes HOME / XDG_* access across tests
static XDG_ENV_MUTEX: Mutex<()> = Mutex::new(());

const ISOLATED_VARS: [&str; 3] = ["HOME", "XDG_CONFIG_HOME", "XDG_DATA_HOME"];

/// Run `f` with HOME and XDG directories pointing into a fresh temp dir.
pub fn with_xdg_env<F, R>(f: F) -> R
where
    F: FnOnce(&TempDir) -> R,
{
    let _guard = XDG_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let saved: Vec<(&str, Option<String>)> = ISOLATED_VARS
        .iter()
        .map(|key| (*key, std::env::var(key).ok()))
        .collect();

    let temp = TempDir::new().unwrap();
    std::env::set_var("HOME", temp.path());
    std::env::set_var("XDG_CONFIG_HOME", temp.path().join("config"));
    std::env::set_var("XDG_DATA_HOME", temp.path().join("data"));

    let result = f(&temp);

    for (key, value) in saved {
        match value {
            Some(v) => std::env::set_var(key, v),
            None => std::env::remove_var(key),
        }
    }
    result
}

/// Store wrapper that counts every backend call
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    calls: AtomicUsize,
}

impl CountingStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl HierarchicalStore for CountingStore {
    fn open_node(
        &self,
        root: RootKey,
        path: &KeyPath,
        access: AccessMode,
    ) -> Result<NodeHandle, StoreError> {
        self.tick();
        self.inner.open_node(root, path, access)
    }

    fn enumerate_children(
        &self,
        handle: &NodeHandle,
        index: usize,
    ) -> Result<Option<String>, StoreError> {
        self.tick();
        self.inner.enumerate_children(handle, index)
    }

    fn enumerate_entries(
        &self,
        handle: &NodeHandle,
        index: usize,
    ) -> Result<Option<StoreEntry>, StoreError> {
        self.tick();
        self.inner.enumerate_entries(handle, index)
    }

    fn create_node(
        &self,
        root: RootKey,
        path: &KeyPath,
    ) -> Result<(NodeHandle, Disposition), StoreError> {
        self.tick();
        self.inner.create_node(root, path)
    }

    fn delete_node(&self, root: RootKey, path: &KeyPath) -> Result<(), StoreError> {
        self.tick();
        self.inner.delete_node(root, path)
    }

    fn set_entry(
        &self,
        handle: &NodeHandle,
        name: &str,
        entry_type: EntryType,
        data: &[u8],
    ) -> Result<(), StoreError> {
        self.tick();
        self.inner.set_entry(handle, name, entry_type, data)
    }

    fn delete_entry(&self, handle: &NodeHandle, name: &str) -> Result<(), StoreError> {
        self.tick();
        self.inner.delete_entry(handle, name)
    }
}

/// Create every path under `root`.
pub fn create_all<S: HierarchicalStore + ?Sized>(store: &S, root: RootKey, paths: &[&str]) {
    for path in paths {
        store.create_node(root, &KeyPath::parse(path)).unwrap();
    }
}
