//! End-to-end runs of the regtree binary.

use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn memory_workspace(temp: &TempDir) -> std::path::PathBuf {
    let workspace = temp.path().join("ws");
    fs::create_dir_all(workspace.join("config")).unwrap();
    fs::write(
        workspace.join("config").join("config.toml"),
        "[store]\nbackend = \"memory\"\n",
    )
    .unwrap();
    workspace
}

fn regtree(temp: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_regtree"));
    cmd.env("HOME", temp.path().join("home"))
        .env("XDG_CONFIG_HOME", temp.path().join("config"))
        .env("XDG_DATA_HOME", temp.path().join("data"))
        .env_remove("REGTREE_LOG")
        .env_remove("REGTREE_LOG_OUTPUT")
        .env_remove("REGTREE_LOG_FORMAT");
    cmd
}

#[test]
fn test_tree_writes_log_file() {
    let temp = TempDir::new().unwrap();
    let workspace = memory_workspace(&temp);
    let log_file = temp.path().join("logs").join("regtree.log");

    let output = regtree(&temp)
        .arg("--workspace")
        .arg(&workspace)
        .args(["--log-level", "info", "--log-output", "file", "--log-file"])
        .arg(&log_file)
        .arg("tree")
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("HKEY_CURRENT_USER"));

    let log = fs::read_to_string(&log_file).unwrap();
    assert!(log.contains("Tree build completed"), "log was:\n{}", log);
}

#[test]
fn test_failed_command_exits_non_zero() {
    let temp = TempDir::new().unwrap();
    let workspace = memory_workspace(&temp);

    let output = regtree(&temp)
        .arg("--workspace")
        .arg(&workspace)
        .args(["--quiet", "--yes", "delete-key", "HKCU\\Software"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("has subkeys"), "stderr: {}", stderr);
}
