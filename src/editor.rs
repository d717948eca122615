//! Editor facade: existence probes and guarded mutations over a store.
//!
//! Every call opens its own handle and releases it before returning. The
//! editor holds no state beyond a borrowed store.

use crate::error::StoreError;
use crate::store::{AccessMode, Disposition, HierarchicalStore};
use crate::tree::path::{qualified, KeyPath};
use crate::types::{encode_text, EntryType, RootKey, StoreEntry};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// Synchronous yes/no decision requested before overwriting or deleting
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Confirmation policy that approves everything (`--yes`)
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Result of a mutation request that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditOutcome {
    /// A new key was created
    Created,
    /// An existing key was opened for update
    OpenedExisting,
    /// A value was written
    Written,
    /// A key or value was deleted
    Deleted,
    /// Confirmation was declined; nothing was changed
    Aborted,
}

impl EditOutcome {
    /// Whether the store was modified
    pub fn mutated(&self) -> bool {
        !matches!(self, EditOutcome::Aborted | EditOutcome::OpenedExisting)
    }
}

/// Path-addressed editor over a hierarchical store
pub struct Editor<'a, S: HierarchicalStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: HierarchicalStore + ?Sized> Editor<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Whether the key can be opened for reading. Errors count as absent.
    pub fn key_exists(&self, root: RootKey, path: &KeyPath) -> bool {
        self.store.open_node(root, path, AccessMode::Read).is_ok()
    }

    /// Whether the key has a value named `name`. Errors count as absent.
    pub fn entry_exists(&self, root: RootKey, path: &KeyPath, name: &str) -> bool {
        self.store
            .open_node(root, path, AccessMode::Read)
            .and_then(|handle| self.store.entries(&handle))
            .map(|entries| entries.iter().any(|e| e.name == name))
            .unwrap_or(false)
    }

    /// All values of a key, in store order.
    pub fn list_entries(
        &self,
        root: RootKey,
        path: &KeyPath,
    ) -> Result<Vec<StoreEntry>, StoreError> {
        let handle = self.store.open_node(root, path, AccessMode::Read)?;
        let entries = self.store.entries(&handle)?;
        debug!(key = %qualified(root, path), entries = entries.len(), "Listed values");
        Ok(entries)
    }

    /// Create a key, or open an existing one for update after confirmation.
    #[instrument(skip(self, confirm), fields(key = %qualified(root, path)))]
    pub fn create_or_update_key(
        &self,
        root: RootKey,
        path: &KeyPath,
        confirm: &dyn Confirm,
    ) -> Result<EditOutcome, StoreError> {
        require_path(path)?;
        if self.key_exists(root, path) {
            let prompt = format!(
                "Key {} already exists. Do you want to update it?",
                qualified(root, path)
            );
            if !confirm.confirm(&prompt) {
                info!("Update declined");
                return Ok(EditOutcome::Aborted);
            }
        }

        let (_handle, disposition) = self.store.create_node(root, path).map_err(|e| {
            warn!("Failed to create key: {}", e);
            e
        })?;
        let outcome = match disposition {
            Disposition::CreatedNew => EditOutcome::Created,
            Disposition::OpenedExisting => EditOutcome::OpenedExisting,
        };
        info!(?outcome, "Key created or opened");
        Ok(outcome)
    }

    /// Write `text` as a text value.
    ///
    /// Values written through the editor are always text; other value types
    /// only enter the store through import or direct store access.
    #[instrument(skip(self, text), fields(key = %qualified(root, path)))]
    pub fn set_entry(
        &self,
        root: RootKey,
        path: &KeyPath,
        name: &str,
        text: &str,
    ) -> Result<EditOutcome, StoreError> {
        require_path(path)?;
        require_name(name)?;
        let handle = self.store.open_node(root, path, AccessMode::Write)?;
        self.store
            .set_entry(&handle, name, EntryType::Text, &encode_text(text))?;
        info!(name, "Value set");
        Ok(EditOutcome::Written)
    }

    /// Delete a key without subkeys after confirmation.
    #[instrument(skip(self, confirm), fields(key = %qualified(root, path)))]
    pub fn delete_key(
        &self,
        root: RootKey,
        path: &KeyPath,
        confirm: &dyn Confirm,
    ) -> Result<EditOutcome, StoreError> {
        require_path(path)?;
        let prompt = format!(
            "Are you sure you want to delete the key: {}?",
            qualified(root, path)
        );
        if !confirm.confirm(&prompt) {
            info!("Delete declined");
            return Ok(EditOutcome::Aborted);
        }
        self.store.delete_node(root, path)?;
        info!("Key deleted");
        Ok(EditOutcome::Deleted)
    }

    /// Delete one value after confirmation.
    #[instrument(skip(self, confirm), fields(key = %qualified(root, path)))]
    pub fn delete_entry(
        &self,
        root: RootKey,
        path: &KeyPath,
        name: &str,
        confirm: &dyn Confirm,
    ) -> Result<EditOutcome, StoreError> {
        require_path(path)?;
        require_name(name)?;
        let prompt = format!("Are you sure you want to delete the value: {}?", name);
        if !confirm.confirm(&prompt) {
            info!("Delete declined");
            return Ok(EditOutcome::Aborted);
        }
        let handle = self.store.open_node(root, path, AccessMode::Write)?;
        self.store.delete_entry(&handle, name)?;
        info!(name, "Value deleted");
        Ok(EditOutcome::Deleted)
    }
}

fn require_path(path: &KeyPath) -> Result<(), StoreError> {
    if path.is_empty() {
        return Err(StoreError::InvalidArgument(
            "Key path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn require_name(name: &str) -> Result<(), StoreError> {
    if name.is_empty() {
        return Err(StoreError::InvalidArgument(
            "Value name cannot be empty".to_string(),
        ));
    }
    Ok(())
}
