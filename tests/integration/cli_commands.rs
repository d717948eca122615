//! CLI route table over an in-memory store

use super::test_utils::with_xdg_env;
use regtree::cli::{map_error, Commands, RunContext};
use regtree::config::{RegtreeConfig, StoreBackend};
use regtree::{ApiError, MemoryStore, StoreError};
use tempfile::TempDir;

fn context(dir: &TempDir) -> RunContext {
    let mut config = RegtreeConfig::default();
    config.store.backend = StoreBackend::Memory;
    RunContext::from_parts(
        Box::new(MemoryStore::seeded()),
        config,
        dir.path().to_path_buf(),
    )
    .with_assume_yes(true)
}

fn key(k: &str) -> String {
    k.to_string()
}

#[test]
fn test_tree_lists_configured_roots() {
    let dir = TempDir::new().unwrap();
    let out = context(&dir)
        .execute(&Commands::Tree {
            roots: vec![],
            depth: None,
            format: "text".into(),
        })
        .unwrap();
    for root in [
        "HKEY_CURRENT_USER",
        "HKEY_LOCAL_MACHINE",
        "HKEY_CLASSES_ROOT",
        "HKEY_USERS",
        "HKEY_CURRENT_CONFIG",
    ] {
        assert!(out.contains(root), "missing {} in:\n{}", root, out);
    }
    assert!(out.contains("Regtree"));
    assert!(!out.contains("Settings"));
}

#[test]
fn test_tree_with_explicit_root_and_depth() {
    let dir = TempDir::new().unwrap();
    let out = context(&dir)
        .execute(&Commands::Tree {
            roots: vec!["hkcr".into()],
            depth: Some(1),
            format: "text".into(),
        })
        .unwrap();
    assert_eq!(out, "HKEY_CLASSES_ROOT\n├── .txt\n└── txtfile");
}

#[test]
fn test_tree_rejects_unknown_root() {
    let dir = TempDir::new().unwrap();
    let err = context(&dir)
        .execute(&Commands::Tree {
            roots: vec!["HKEY_NOWHERE".into()],
            depth: None,
            format: "text".into(),
        })
        .unwrap_err();
    assert!(matches!(
        err,
        ApiError::StoreError(StoreError::InvalidArgument(_))
    ));
}

#[test]
fn test_expand_goes_below_configured_depth() {
    let dir = TempDir::new().unwrap();
    let out = context(&dir)
        .execute(&Commands::Expand {
            key: key("HKCU\\Software\\Regtree"),
        })
        .unwrap();
    assert_eq!(out, "HKEY_CURRENT_USER\\Software\\Regtree\n  Settings");
}

#[test]
fn test_exists_reports_keys_and_values() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir);
    let run = |k: &str, value: Option<&str>| {
        ctx.execute(&Commands::Exists {
            key: key(k),
            value: value.map(str::to_string),
        })
        .unwrap()
    };
    assert_eq!(run("HKCU\\Environment", None), "EXISTS");
    assert_eq!(run("HKCU\\Environment", Some("Path")), "EXISTS");
    assert_eq!(run("HKCU\\Environment", Some("Nope")), "DOES NOT EXIST");
    assert_eq!(run("HKCU\\Nope", None), "DOES NOT EXIST");
}

#[test]
fn test_create_set_and_list_values() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir);
    let out = ctx
        .execute(&Commands::CreateKey {
            key: key("HKCU\\Software\\Cli"),
        })
        .unwrap();
    assert_eq!(out, "Created key HKEY_CURRENT_USER\\Software\\Cli");

    ctx.execute(&Commands::SetValue {
        key: key("HKCU\\Software\\Cli"),
        name: "Greeting".into(),
        data: "hi there".into(),
    })
    .unwrap();

    let json = ctx
        .execute(&Commands::Values {
            key: key("HKCU\\Software\\Cli"),
            format: "json".into(),
        })
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["values"][0]["name"], "Greeting");
    assert_eq!(value["values"][0]["type"], "REG_SZ");
    assert_eq!(value["values"][0]["data"], "hi there");
}

#[test]
fn test_declined_confirmation_is_reported() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir).with_confirm(Box::new(|_: &str| false));
    let out = ctx
        .execute(&Commands::DeleteKey {
            key: key("HKCU\\Software\\Vendor"),
        })
        .unwrap();
    assert_eq!(out, "Cancelled; HKEY_CURRENT_USER\\Software\\Vendor unchanged");
    let exists = ctx
        .execute(&Commands::Exists {
            key: key("HKCU\\Software\\Vendor"),
            value: None,
        })
        .unwrap();
    assert_eq!(exists, "EXISTS");
}

#[test]
fn test_delete_non_empty_key_maps_to_readable_error() {
    let dir = TempDir::new().unwrap();
    let err = context(&dir)
        .execute(&Commands::DeleteKey {
            key: key("HKCU\\Software"),
        })
        .unwrap_err();
    assert_eq!(
        map_error(&err),
        "Error: HKEY_CURRENT_USER\\Software has subkeys; delete them first"
    );
}

#[test]
fn test_export_to_file_then_import_elsewhere() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("settings.reg");
    let out = context(&dir)
        .execute(&Commands::Export {
            key: key("HKCU\\Software\\Regtree\\Settings"),
            output: Some(file.clone()),
            recursive: false,
        })
        .unwrap();
    assert!(out.starts_with("Exported HKEY_CURRENT_USER\\Software\\Regtree\\Settings"));

    let mut config = RegtreeConfig::default();
    config.store.backend = StoreBackend::Memory;
    let fresh = RunContext::from_parts(
        Box::new(MemoryStore::new()),
        config,
        dir.path().to_path_buf(),
    );
    let out = fresh.execute(&Commands::Import { file }).unwrap();
    assert!(out.contains("1 keys created"));
    assert!(out.contains("2 values set"));
    let theme = fresh
        .execute(&Commands::Exists {
            key: key("HKCU\\Software\\Regtree\\Settings"),
            value: Some("Theme".into()),
        })
        .unwrap();
    assert_eq!(theme, "EXISTS");
}

#[test]
fn test_invalid_output_format() {
    let dir = TempDir::new().unwrap();
    let err = context(&dir)
        .execute(&Commands::Values {
            key: key("HKCU\\Environment"),
            format: "yaml".into(),
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::OutputError(_)));
}

#[test]
fn test_run_context_from_workspace_config() {
    with_xdg_env(|temp| {
        let workspace = temp.path().join("ws");
        std::fs::create_dir_all(workspace.join("config")).unwrap();
        std::fs::write(
            workspace.join("config").join("config.toml"),
            "[store]\nbackend = \"memory\"\n\n[explorer]\nmax_depth = 1\nroots = [\"HKU\"]\n",
        )
        .unwrap();

        let ctx = RunContext::new(workspace, None).unwrap();
        assert_eq!(ctx.config().explorer.max_depth, 1);
        let out = ctx
            .execute(&Commands::Tree {
                roots: vec![],
                depth: None,
                format: "text".into(),
            })
            .unwrap();
        assert_eq!(out, "HKEY_USERS\n└── .DEFAULT");
    });
}

#[test]
fn test_run_context_rejects_invalid_config() {
    with_xdg_env(|temp| {
        let file = temp.path().join("bad.toml");
        std::fs::write(&file, "[explorer]\nmax_depth = 0\n").unwrap();
        let err = RunContext::new(temp.path().to_path_buf(), Some(file))
            .err()
            .unwrap();
        assert!(matches!(err, ApiError::ConfigError(_)));
    });
}
