//! Session and editor behavior over the persistent backend

use regtree::store::SledStore;
use regtree::{AlwaysConfirm, EditOutcome, KeyPath, RootKey, Session, StoreError};
use tempfile::TempDir;

fn sled_session(dir: &TempDir) -> Session<SledStore> {
    let store = SledStore::new(dir.path()).unwrap();
    Session::with_roots(store, RootKey::default_roots(), 2).unwrap()
}

#[test]
fn test_empty_store_shows_bare_roots() {
    let dir = TempDir::new().unwrap();
    let session = sled_session(&dir);
    assert_eq!(session.tree().roots().len(), 5);
    assert_eq!(session.tree().len(), 5);
    assert!(session.tree().skipped().is_empty());
}

#[test]
fn test_create_edit_delete_cycle() {
    let dir = TempDir::new().unwrap();
    let mut session = sled_session(&dir);
    let key = KeyPath::parse("Software\\Demo");

    let outcome = session
        .create_key(RootKey::CurrentUser, &key, &AlwaysConfirm)
        .unwrap();
    assert_eq!(outcome, EditOutcome::Created);
    assert!(session.tree().find(RootKey::CurrentUser, &key).is_some());

    session
        .set_entry(RootKey::CurrentUser, &key, "Name", "value")
        .unwrap();
    session.select_path(RootKey::CurrentUser, &key).unwrap();
    let entries = session.selected_entries().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].as_text().as_deref(), Some("value"));

    let err = session
        .delete_key(RootKey::CurrentUser, &KeyPath::parse("Software"), &AlwaysConfirm)
        .unwrap_err();
    assert!(matches!(err, StoreError::NotEmpty(_)));

    session
        .delete_key(RootKey::CurrentUser, &key, &AlwaysConfirm)
        .unwrap();
    assert!(session.tree().find(RootKey::CurrentUser, &key).is_none());
    assert!(session.selection().is_none());
}

#[test]
fn test_children_enumerate_in_byte_order() {
    let dir = TempDir::new().unwrap();
    let mut session = sled_session(&dir);
    for name in ["b", "C", "a"] {
        session
            .create_key(RootKey::Users, &KeyPath::parse(name), &AlwaysConfirm)
            .unwrap();
    }
    let tree = session.tree();
    let root = tree.find(RootKey::Users, &KeyPath::root()).unwrap();
    let labels: Vec<&str> = tree
        .children(root)
        .iter()
        .map(|id| tree.get(*id).unwrap().label.as_str())
        .collect();
    assert_eq!(labels, vec!["C", "a", "b"]);
}
