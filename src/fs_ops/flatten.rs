//! Flatten: pull every file below the root up into the root, then prune the
//! directories that were left empty.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::collision::{ClaimSet, resolve};
use super::helpers::describe_io_error;
use super::plan::{MoveStatus, Plan, PlannedMove};
use super::scan::{EntryKind, ScanResult};
use crate::report::{BatchReport, SkipReason};

/// Plan moves of every scanned file to `root/<name>`.
///
/// Files already directly in the root stay put, and their names are claimed
/// up front so no descending file can take them.
pub fn plan_flatten(root: &Path, scan: &ScanResult) -> Plan {
    let mut claims = ClaimSet::new();
    claims.extend(
        scan.entries
            .iter()
            .filter(|e| e.path.parent() == Some(root))
            .map(|e| e.path.clone()),
    );

    let mut plan = Plan {
        root: root.to_path_buf(),
        ..Default::default()
    };
    for entry in &scan.entries {
        if entry.path.parent() == Some(root) {
            plan.moves.push(PlannedMove {
                source: entry.path.clone(),
                destination: entry.path.clone(),
                kind: EntryKind::File,
                status: MoveStatus::Skipped(SkipReason::NoChange),
            });
            continue;
        }
        // Keep the on-disk spelling; the normalized name is only for transforms.
        let raw_name = entry
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(entry.name.as_str());
        let destination = resolve(root, raw_name, EntryKind::File, &entry.path, &mut claims);
        debug!(src = %entry.path.display(), dest = %destination.display(), "Plan: flatten");
        plan.moves.push(PlannedMove {
            source: entry.path.clone(),
            destination,
            kind: EntryKind::File,
            status: MoveStatus::Planned,
        });
    }
    plan.push_excluded(scan);
    plan.prune = deepest_first(&scan.subdirs);

    info!(
        root = %root.display(),
        planned = plan.planned_count(),
        dirs = plan.prune.len(),
        "Flatten plan ready"
    );
    plan
}

/// Post-order removal of empty directories. Best-effort: anything that
/// cannot be removed is recorded in the report and left in place.
pub fn prune_empty_dirs(dirs: &[PathBuf], report: &mut BatchReport) {
    for dir in dirs {
        let is_empty = match fs::read_dir(dir) {
            Ok(mut it) => it.next().is_none(),
            Err(e) => {
                report.record_prune_skip(dir, describe_io_error("read folder", dir, &e));
                continue;
            }
        };
        if !is_empty {
            debug!(dir = %dir.display(), "Prune: not empty");
            report.record_prune_skip(dir, "not empty".to_string());
            continue;
        }
        match fs::remove_dir(dir) {
            Ok(()) => {
                debug!(dir = %dir.display(), "Pruned empty folder");
                report.record_pruned(dir);
            }
            Err(e) => report.record_prune_skip(dir, describe_io_error("remove folder", dir, &e)),
        }
    }
    info!(
        pruned = report.pruned.len(),
        kept = report.prune_skipped.len(),
        "Pruning finished"
    );
}

fn deepest_first(dirs: &[PathBuf]) -> Vec<PathBuf> {
    let mut out = dirs.to_vec();
    out.sort_by(|a, b| {
        b.components()
            .count()
            .cmp(&a.components().count())
            .then_with(|| b.cmp(a))
    });
    out
}
