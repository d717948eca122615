//! regtree: browse and edit a registry-style hierarchical key/value store
//!
//! A depth-bounded tree explorer over a pluggable store, a path-addressed
//! editor with confirmation guards, and `.reg` text export/import.

pub mod cli;
pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod logging;
pub mod session;
pub mod store;
pub mod tree;
pub mod types;

pub use editor::{AlwaysConfirm, Confirm, EditOutcome, Editor};
pub use error::{ApiError, StoreError};
pub use session::Session;
pub use store::{AccessMode, Disposition, HierarchicalStore, MemoryStore, NodeHandle, SledStore};
pub use tree::{KeyPath, TreeView};
pub use types::{EntryType, RootKey, StoreEntry};
