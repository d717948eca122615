//! .reg export and import across backends

use super::test_utils::create_all;
use regtree::export::{export_key, import, HEADER};
use regtree::store::{AccessMode, HierarchicalStore, MemoryStore, SledStore};
use regtree::{EntryType, KeyPath, RootKey, StoreEntry, StoreError};
use tempfile::TempDir;

fn typed_store() -> MemoryStore {
    let store = MemoryStore::new();
    create_all(&store, RootKey::CurrentUser, &["Software\\Demo\\Nested"]);
    let handle = store
        .open_node(
            RootKey::CurrentUser,
            &KeyPath::parse("Software\\Demo"),
            AccessMode::Write,
        )
        .unwrap();
    let entries = [
        StoreEntry::text("Quoted", "a \"quoted\" C:\\path"),
        StoreEntry::dword("Count", 0xdead_beef),
        StoreEntry::new("Blob", EntryType::Binary, vec![0, 1, 0xfe, 0xff]),
        StoreEntry::multi_text("List", &["one", "two"]),
    ];
    for entry in &entries {
        store
            .set_entry(&handle, &entry.name, entry.entry_type, &entry.data)
            .unwrap();
    }
    store
}

fn entries_of<S: HierarchicalStore>(store: &S, path: &str) -> Vec<StoreEntry> {
    let handle = store
        .open_node(RootKey::CurrentUser, &KeyPath::parse(path), AccessMode::Read)
        .unwrap();
    store.entries(&handle).unwrap()
}

#[test]
fn test_export_format_is_stable() {
    let text = export_key(
        &typed_store(),
        RootKey::CurrentUser,
        &KeyPath::parse("Software\\Demo"),
        false,
    )
    .unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], HEADER);
    assert_eq!(lines[2], "[HKEY_CURRENT_USER\\Software\\Demo]");
    assert_eq!(lines[3], "\"Quoted\"=\"a \\\"quoted\\\" C:\\\\path\"");
    assert_eq!(lines[4], "\"Count\"=dword:deadbeef");
    assert_eq!(lines[5], "\"Blob\"=hex:00,01,fe,ff");
    assert!(lines[6].starts_with("\"List\"=hex(7):6f,6e,65,00"));
    assert!(!text.contains("Nested"));
}

#[test]
fn test_memory_to_sled_round_trip_keeps_types() {
    let source = typed_store();
    let text = export_key(
        &source,
        RootKey::CurrentUser,
        &KeyPath::parse("Software"),
        true,
    )
    .unwrap();

    let dir = TempDir::new().unwrap();
    let target = SledStore::new(dir.path()).unwrap();
    let summary = import(&target, &text).unwrap();
    assert_eq!(summary.keys_created, 3);
    assert_eq!(summary.values_set, 4);

    let mut expected = entries_of(&source, "Software\\Demo");
    let mut actual = entries_of(&target, "Software\\Demo");
    expected.sort_by(|a, b| a.name.cmp(&b.name));
    actual.sort_by(|a, b| a.name.cmp(&b.name));
    assert_eq!(actual, expected);
    assert!(entries_of(&target, "Software\\Demo\\Nested").is_empty());
}

#[test]
fn test_import_deletions() {
    let store = typed_store();
    let text = format!(
        "{}\n\n[HKEY_CURRENT_USER\\Software\\Demo]\n\"Count\"=-\n\n[-HKEY_CURRENT_USER\\Software\\Demo\\Nested]\n",
        HEADER
    );
    let summary = import(&store, &text).unwrap();
    assert_eq!(summary.keys_opened, 1);
    assert_eq!(summary.values_deleted, 1);
    assert_eq!(summary.keys_deleted, 1);

    let names: Vec<String> = entries_of(&store, "Software\\Demo")
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert!(!names.contains(&"Count".to_string()));
    assert!(store
        .open_node(
            RootKey::CurrentUser,
            &KeyPath::parse("Software\\Demo\\Nested"),
            AccessMode::Read
        )
        .is_err());
}

#[test]
fn test_import_reports_bad_line_number() {
    let store = MemoryStore::new();
    let text = format!("{}\n\n[HKEY_USERS\\X]\n\"v\"=dword:zz\n", HEADER);
    match import(&store, &text) {
        Err(StoreError::InvalidArgument(msg)) => assert!(msg.starts_with("line 4")),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_export_missing_key_fails() {
    let store = MemoryStore::new();
    assert!(matches!(
        export_key(&store, RootKey::Users, &KeyPath::parse("Nope"), false),
        Err(StoreError::NotFound(_))
    ));
}
