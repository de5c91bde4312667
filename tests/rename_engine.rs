use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use assert_fs::prelude::*;

use namesmith::fs_ops::{
    ExecuteOptions, FsMover, Mover, ScanOptions, ensure_root, execute, plan_transform, scan_root,
};
use namesmith::{
    BatchReport, CancelToken, Config, EntryKind, Job, Scope, SkipReason, TransformOutcome,
    TransformParams, run, run_with,
};

fn job(root: &Path, params: TransformParams) -> Job {
    Job {
        root: root.to_path_buf(),
        scope: Scope::Both,
        params,
    }
}

fn names_in(dir: &Path) -> BTreeSet<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

fn all_sources(report: &BatchReport) -> BTreeSet<PathBuf> {
    report
        .applied
        .iter()
        .map(|m| m.source.clone())
        .chain(report.skipped.iter().map(|s| s.source.clone()))
        .chain(report.failed.iter().map(|f| f.source.clone()))
        .collect()
}

#[test]
fn two_names_mapping_to_one_get_numbered() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("a.txt").write_str("a").unwrap();
    td.child("b.txt").write_str("b").unwrap();
    let root = ensure_root(td.path()).unwrap();

    let scan = scan_root(&root, Scope::Files, &ScanOptions::default()).unwrap();
    let to_x = |_: &str, _: EntryKind, _: usize| TransformOutcome::Rename("x.txt".into());
    let mut plan = plan_transform(&root, &scan, &to_x);
    let report = execute(&mut plan, &ExecuteOptions::default());

    assert_eq!(report.applied.len(), 2);
    assert_eq!(names_in(&root), BTreeSet::from(["x.txt".into(), "x(1).txt".into()]));
    assert_eq!(fs::read_to_string(root.join("x.txt")).unwrap(), "a");
    assert_eq!(fs::read_to_string(root.join("x(1).txt")).unwrap(), "b");
}

#[cfg(unix)]
#[test]
fn hard_linked_destination_is_occupied() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("a.txt").write_str("a").unwrap();
    fs::hard_link(td.path().join("a.txt"), td.path().join("x.txt")).unwrap();
    let root = ensure_root(td.path()).unwrap();

    let scan = scan_root(&root, Scope::Files, &ScanOptions::default()).unwrap();
    let a_to_x = |name: &str, _: EntryKind, _: usize| match name {
        "a.txt" => TransformOutcome::Rename("x.txt".into()),
        _ => TransformOutcome::Unchanged(SkipReason::NoMatch),
    };
    let mut plan = plan_transform(&root, &scan, &a_to_x);
    let report = execute(&mut plan, &ExecuteOptions::default());

    assert!(report.failed.is_empty(), "{:?}", report.failed);
    assert_eq!(report.applied.len(), 1);
    assert_eq!(report.applied[0].destination, root.join("x(1).txt"));
    assert!(!root.join("a.txt").exists());
    assert_eq!(names_in(&root), BTreeSet::from(["x.txt".into(), "x(1).txt".into()]));
    for m in &report.applied {
        assert!(!m.source.exists() && m.destination.exists());
    }
}

#[test]
fn rename_chain_never_overwrites_a_pending_source() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("a.txt").write_str("a").unwrap();
    td.child("b.txt").write_str("b").unwrap();
    let root = ensure_root(td.path()).unwrap();

    let scan = scan_root(&root, Scope::Files, &ScanOptions::default()).unwrap();
    let shift = |name: &str, _: EntryKind, _: usize| match name {
        "a.txt" => TransformOutcome::Rename("b.txt".into()),
        "b.txt" => TransformOutcome::Rename("c.txt".into()),
        _ => TransformOutcome::Unchanged(SkipReason::NoMatch),
    };
    let mut plan = plan_transform(&root, &scan, &shift);
    let report = execute(&mut plan, &ExecuteOptions::default());

    assert!(report.failed.is_empty(), "{:?}", report.failed);
    assert_eq!(fs::read_to_string(root.join("b(1).txt")).unwrap(), "a");
    assert_eq!(fs::read_to_string(root.join("c.txt")).unwrap(), "b");
    assert!(!root.join("a.txt").exists());
    assert!(!root.join("b.txt").exists());
}

#[test]
fn add_prefix_twice_is_a_no_op() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("one.pdf").touch().unwrap();
    td.child("two.pdf").touch().unwrap();
    td.child("folder").create_dir_all().unwrap();
    let cfg = Config::default();
    let params = TransformParams::AddPrefix { prefix: "2024_".into() };

    let first = run(&job(td.path(), params.clone()), &cfg, &CancelToken::new()).unwrap();
    assert_eq!(first.applied.len(), 3);

    let second = run(&job(td.path(), params), &cfg, &CancelToken::new()).unwrap();
    assert!(second.applied.is_empty());
    assert_eq!(second.skipped.len(), 3);
    assert!(second.skipped.iter().all(|s| s.reason == SkipReason::AlreadyPrefixed));
}

#[test]
fn delete_matches_scenario() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("[draft]_report.pdf").touch().unwrap();
    td.child("plain.pdf").touch().unwrap();
    let params = TransformParams::DeleteMatches {
        pattern: r"\[.*?\]".into(),
    };

    let report = run(&job(td.path(), params), &Config::default(), &CancelToken::new()).unwrap();

    assert_eq!(report.applied.len(), 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].reason, SkipReason::NoMatch);
    assert!(td.child("_report.pdf").path().exists());
    assert!(td.child("plain.pdf").path().exists());
}

#[test]
fn scope_limits_entry_kinds() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("doc.txt").touch().unwrap();
    td.child("dir").create_dir_all().unwrap();
    let mut j = job(td.path(), TransformParams::AddSuffix { suffix: "_v2".into() });
    j.scope = Scope::Folders;

    let report = run(&j, &Config::default(), &CancelToken::new()).unwrap();

    assert_eq!(report.applied.len(), 1);
    assert!(td.child("dir_v2").path().is_dir());
    assert!(td.child("doc.txt").path().exists());
}

#[test]
fn filtered_and_hidden_entries() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("keep.pdf").touch().unwrap();
    td.child("skip.txt").touch().unwrap();
    td.child("Thumbs.db").touch().unwrap();
    td.child(".hidden.pdf").touch().unwrap();
    let cfg = Config {
        extensions: vec!["pdf".into()],
        exclude_names: vec!["Thumbs.db".into()],
        ..Default::default()
    };

    let report = run(
        &job(td.path(), TransformParams::AddPrefix { prefix: "p_".into() }),
        &cfg,
        &CancelToken::new(),
    )
    .unwrap();

    assert_eq!(report.applied.len(), 1);
    assert!(td.child("p_keep.pdf").path().exists());
    assert!(td.child(".hidden.pdf").path().exists());
    let filtered: Vec<_> = report
        .skipped
        .iter()
        .filter(|s| s.reason == SkipReason::Filtered)
        .collect();
    assert_eq!(filtered.len(), 2);
}

#[cfg(unix)]
#[test]
fn symlinks_are_reported_not_followed() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("target.txt").touch().unwrap();
    std::os::unix::fs::symlink(td.child("target.txt").path(), td.child("link.txt").path()).unwrap();

    let report = run(
        &job(td.path(), TransformParams::AddPrefix { prefix: "p_".into() }),
        &Config::default(),
        &CancelToken::new(),
    )
    .unwrap();

    assert!(report.skipped.iter().any(|s| s.reason == SkipReason::Symlink));
    assert!(fs::symlink_metadata(td.child("link.txt").path()).is_ok());
    assert!(td.child("p_target.txt").path().exists());
}

/// Fails every move whose source is named `b.txt`.
struct FailOnB;

impl Mover for FailOnB {
    fn move_entry(&self, src: &Path, dst: &Path, kind: EntryKind) -> Result<()> {
        if src.file_name().is_some_and(|n| n == "b.txt") {
            bail!("rename '{}': Permission denied (os error 13)", src.display());
        }
        FsMover.move_entry(src, dst, kind)
    }
}

#[test]
fn one_failure_does_not_stop_the_batch() {
    let td = assert_fs::TempDir::new().unwrap();
    for n in ["a.txt", "b.txt", "c.txt"] {
        td.child(n).touch().unwrap();
    }
    let root = ensure_root(td.path()).unwrap();

    let report = run_with(
        &job(&root, TransformParams::AddPrefix { prefix: "x_".into() }),
        &Config::default(),
        &CancelToken::new(),
        &FailOnB,
    )
    .unwrap();

    assert_eq!(report.applied.len(), 2);
    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].error.contains("Permission denied"));
    assert!(root.join("b.txt").exists());
    assert!(root.join("x_a.txt").exists());
    assert!(root.join("x_c.txt").exists());
    assert!(!report.is_clean());
}

#[test]
fn every_scanned_entry_lands_in_exactly_one_list() {
    let td = assert_fs::TempDir::new().unwrap();
    for n in ["12 song.mp3", "b-side.mp3", "no digits.txt", "A-1.txt"] {
        td.child(n).touch().unwrap();
    }
    td.child("folder 7").create_dir_all().unwrap();
    let root = ensure_root(td.path()).unwrap();
    let scanned: BTreeSet<PathBuf> = names_in(&root).into_iter().map(|n| root.join(n)).collect();

    let report = run(
        &job(&root, TransformParams::ExtractNumeric),
        &Config::default(),
        &CancelToken::new(),
    )
    .unwrap();

    let n = report.applied.len() + report.skipped.len() + report.failed.len();
    assert_eq!(n, scanned.len());
    assert_eq!(all_sources(&report), scanned);

    let dests: BTreeSet<_> = report.applied.iter().map(|m| &m.destination).collect();
    assert_eq!(dests.len(), report.applied.len());
}

#[test]
fn initial_prefix_then_strip_round_trips() {
    let td = assert_fs::TempDir::new().unwrap();
    for n in ["apple.txt", "Éclair.txt", "北京.txt"] {
        td.child(n).touch().unwrap();
    }
    let before = names_in(td.path());
    let cfg = Config::default();

    let tagged = run(&job(td.path(), TransformParams::InitialPrefix), &cfg, &CancelToken::new()).unwrap();
    assert_eq!(tagged.applied.len(), 3);
    assert!(td.child("A-apple.txt").path().exists());
    assert!(td.child("B-北京.txt").path().exists());

    let again = run(&job(td.path(), TransformParams::InitialPrefix), &cfg, &CancelToken::new()).unwrap();
    assert!(again.applied.is_empty());

    run(&job(td.path(), TransformParams::StripPrefix), &cfg, &CancelToken::new()).unwrap();
    assert_eq!(names_in(td.path()), before);
}

#[test]
fn dry_run_moves_nothing() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("a.txt").touch().unwrap();
    let cfg = Config {
        dry_run: true,
        ..Default::default()
    };

    let report = run(
        &job(td.path(), TransformParams::AddSuffix { suffix: "_old".into() }),
        &cfg,
        &CancelToken::new(),
    )
    .unwrap();

    assert!(report.applied.is_empty());
    assert_eq!(report.previewed.len(), 1);
    assert!(report.messages.iter().any(|m| m.starts_with("[INFO] Would rename")));
    assert!(td.child("a.txt").path().exists());
    assert!(!td.child("a_old.txt").path().exists());
}
