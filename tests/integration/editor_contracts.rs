//! Editor guarantees: confirmation, argument checks, visibility after mutation

use super::test_utils::{create_all, CountingStore};
use regtree::store::{AccessMode, HierarchicalStore, MemoryStore};
use regtree::tree::populate;
use regtree::{AlwaysConfirm, EditOutcome, Editor, KeyPath, RootKey, StoreError};
use std::cell::RefCell;

#[test]
fn test_empty_arguments_never_reach_the_store() {
    let store = CountingStore::new(MemoryStore::seeded());
    let editor = Editor::new(&store);
    let key = KeyPath::parse("Software\\Vendor");

    let err = editor
        .set_entry(RootKey::CurrentUser, &key, "", "data")
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidArgument(_)));

    let err = editor
        .set_entry(RootKey::CurrentUser, &KeyPath::root(), "Name", "data")
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidArgument(_)));

    let err = editor
        .create_or_update_key(RootKey::CurrentUser, &KeyPath::root(), &AlwaysConfirm)
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidArgument(_)));

    let err = editor
        .delete_entry(RootKey::CurrentUser, &key, "", &AlwaysConfirm)
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidArgument(_)));

    assert_eq!(store.calls(), 0);
}

#[test]
fn test_existing_key_prompts_with_its_path() {
    let store = MemoryStore::seeded();
    let editor = Editor::new(&store);
    let prompts = RefCell::new(Vec::new());
    let decline = |prompt: &str| {
        prompts.borrow_mut().push(prompt.to_string());
        false
    };

    let outcome = editor
        .create_or_update_key(
            RootKey::CurrentUser,
            &KeyPath::parse("Software\\Vendor"),
            &decline,
        )
        .unwrap();
    assert_eq!(outcome, EditOutcome::Aborted);
    let prompts = prompts.into_inner();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("HKEY_CURRENT_USER\\Software\\Vendor"));
}

#[test]
fn test_declined_delete_leaves_key_in_place() {
    let store = MemoryStore::seeded();
    let editor = Editor::new(&store);
    let key = KeyPath::parse("Software\\Vendor");
    let outcome = editor
        .delete_key(RootKey::CurrentUser, &key, &|_: &str| false)
        .unwrap();
    assert_eq!(outcome, EditOutcome::Aborted);
    assert!(editor.key_exists(RootKey::CurrentUser, &key));
}

#[test]
fn test_delete_key_with_subkeys_is_rejected() {
    let store = MemoryStore::new();
    create_all(&store, RootKey::Users, &["Parent\\Child"]);
    let editor = Editor::new(&store);

    let err = editor
        .delete_key(RootKey::Users, &KeyPath::parse("Parent"), &AlwaysConfirm)
        .unwrap_err();
    assert!(matches!(err, StoreError::NotEmpty(_)));
    assert!(editor.key_exists(RootKey::Users, &KeyPath::parse("Parent")));
    assert!(editor.key_exists(RootKey::Users, &KeyPath::parse("Parent\\Child")));

    editor
        .delete_key(RootKey::Users, &KeyPath::parse("Parent\\Child"), &AlwaysConfirm)
        .unwrap();
    editor
        .delete_key(RootKey::Users, &KeyPath::parse("Parent"), &AlwaysConfirm)
        .unwrap();
    assert!(!editor.key_exists(RootKey::Users, &KeyPath::parse("Parent")));
}

#[test]
fn test_existence_probes_are_idempotent() {
    let store = MemoryStore::seeded();
    let editor = Editor::new(&store);
    let key = KeyPath::parse("Software\\Regtree\\Settings");

    for _ in 0..3 {
        assert!(editor.key_exists(RootKey::CurrentUser, &key));
        assert!(editor.entry_exists(RootKey::CurrentUser, &key, "Theme"));
        assert!(!editor.entry_exists(RootKey::CurrentUser, &key, "Missing"));
    }
    assert_eq!(editor.list_entries(RootKey::CurrentUser, &key).unwrap().len(), 2);
}

#[test]
fn test_denied_key_counts_as_absent() {
    let store = MemoryStore::seeded();
    let key = KeyPath::parse("Environment");
    store.deny(RootKey::CurrentUser, &key);
    let editor = Editor::new(&store);
    assert!(!editor.key_exists(RootKey::CurrentUser, &key));
    assert!(!editor.entry_exists(RootKey::CurrentUser, &key, "Path"));

    store.allow(RootKey::CurrentUser, &key);
    assert!(editor.key_exists(RootKey::CurrentUser, &key));
}

#[test]
fn test_mutations_are_visible_to_fresh_populate() {
    let store = MemoryStore::seeded();
    let editor = Editor::new(&store);
    let key = KeyPath::parse("Software\\Fresh");

    let outcome = editor
        .create_or_update_key(RootKey::CurrentUser, &key, &AlwaysConfirm)
        .unwrap();
    assert_eq!(outcome, EditOutcome::Created);
    editor
        .set_entry(RootKey::CurrentUser, &key, "Greeting", "hello")
        .unwrap();

    let tree = populate(&store, &RootKey::default_roots(), 2).unwrap();
    assert!(tree.find(RootKey::CurrentUser, &key).is_some());
    let entries = editor.list_entries(RootKey::CurrentUser, &key).unwrap();
    assert_eq!(entries[0].as_text().as_deref(), Some("hello"));

    editor
        .delete_key(RootKey::CurrentUser, &key, &AlwaysConfirm)
        .unwrap();
    let tree = populate(&store, &RootKey::default_roots(), 2).unwrap();
    assert!(tree.find(RootKey::CurrentUser, &key).is_none());
}

#[test]
fn test_read_handle_cannot_write() {
    let store = MemoryStore::seeded();
    let handle = store
        .open_node(
            RootKey::CurrentUser,
            &KeyPath::parse("Environment"),
            AccessMode::Read,
        )
        .unwrap();
    let err = store.delete_entry(&handle, "Path").unwrap_err();
    assert!(matches!(err, StoreError::AccessDenied(_)));
}
