use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;

/// Run the binary with an empty config file so the user's own config never leaks in.
fn namesmith(cfg_dir: &Path, args: &[&str]) -> Output {
    let cfg = cfg_dir.join("config.xml");
    if !cfg.exists() {
        fs::write(&cfg, "").unwrap();
    }
    let me = assert_cmd::cargo::cargo_bin!("namesmith");
    Command::new(me)
        .env("NAMESMITH_CONFIG", &cfg)
        .args(args)
        .output()
        .expect("spawn binary")
}

#[test]
fn binary_print_config_succeeds() {
    let td = tempfile::tempdir().unwrap();
    let out = namesmith(td.path(), &["--print-config"]);
    assert!(out.status.success(), "binary should succeed with --print-config");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("NAMESMITH_CONFIG"), "stdout: {stdout}");
}

#[test]
fn add_prefix_with_json_report() {
    let cfg = tempfile::tempdir().unwrap();
    let root = tempfile::tempdir().unwrap();
    fs::write(root.path().join("a.txt"), b"a").unwrap();
    fs::write(root.path().join("new_b.txt"), b"b").unwrap();
    let root_str = root.path().to_str().unwrap();

    let out = namesmith(cfg.path(), &["add-prefix", root_str, "new_", "--json-report", "--log-level", "quiet"]);

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let resp: Value = serde_json::from_slice(&out.stdout).expect("stdout is one JSON document");
    assert_eq!(resp["status"], "success");
    assert_eq!(resp["details"]["applied"], 1);
    assert_eq!(resp["details"]["skipped"], 1);
    assert_eq!(resp["details"]["moved_files_details"][0]["moved_to_file"], "new_a.txt");
    assert_eq!(resp["details"]["skipped_files_details"][0]["reason"], "already prefixed");
    assert!(root.path().join("new_a.txt").exists());
}

#[test]
fn missing_root_exits_with_request_error() {
    let cfg = tempfile::tempdir().unwrap();
    let gone = cfg.path().join("gone");
    let out = namesmith(cfg.path(), &["flatten", gone.to_str().unwrap(), "--json-report"]);

    assert_eq!(out.status.code(), Some(1));
    let resp: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(resp["status"], "error");
    assert_eq!(resp["error_kind"], "root_not_found");
}

#[test]
fn invalid_pattern_touches_nothing() {
    let cfg = tempfile::tempdir().unwrap();
    let root = tempfile::tempdir().unwrap();
    fs::write(root.path().join("[x]a.txt"), b"a").unwrap();

    let out = namesmith(cfg.path(), &["delete-matches", root.path().to_str().unwrap(), "(["]);

    assert_eq!(out.status.code(), Some(1));
    assert!(root.path().join("[x]a.txt").exists());
}

#[test]
fn dry_run_flatten_with_lock_leaves_tree_alone() {
    let cfg = tempfile::tempdir().unwrap();
    let root = tempfile::tempdir().unwrap();
    fs::create_dir(root.path().join("sub")).unwrap();
    fs::write(root.path().join("sub/a.txt"), b"a").unwrap();

    let out = namesmith(
        cfg.path(),
        &["flatten", root.path().to_str().unwrap(), "--dry-run", "--lock"],
    );

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(root.path().join("sub/a.txt").exists());
    assert!(!root.path().join("a.txt").exists());
    assert!(!root.path().join(namesmith::fs_ops::LOCK_FILE_NAME).exists());
}
