//! Planning: turn a scan plus a name transform into an ordered list of moves
//! without touching the filesystem beyond existence probes.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::collision::{ClaimSet, resolve};
use super::scan::{EntryKind, ScanResult};
use crate::report::SkipReason;
use crate::transform::{NameTransform, TransformOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveStatus {
    Planned,
    Skipped(SkipReason),
    Applied,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct PlannedMove {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub kind: EntryKind,
    pub status: MoveStatus,
}

impl PlannedMove {
    fn planned(source: PathBuf, destination: PathBuf, kind: EntryKind) -> Self {
        Self {
            source,
            destination,
            kind,
            status: MoveStatus::Planned,
        }
    }

    fn skipped(source: PathBuf, kind: EntryKind, reason: SkipReason) -> Self {
        Self {
            destination: source.clone(),
            source,
            kind,
            status: MoveStatus::Skipped(reason),
        }
    }
}

/// A fully computed batch. Nothing on disk has changed yet.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    pub root: PathBuf,
    pub moves: Vec<PlannedMove>,
    /// Directories to prune after execution, deepest first (flatten only).
    pub prune: Vec<PathBuf>,
}

impl Plan {
    pub fn planned_count(&self) -> usize {
        self.moves
            .iter()
            .filter(|m| m.status == MoveStatus::Planned)
            .count()
    }

    pub(crate) fn push_excluded(&mut self, scan: &ScanResult) {
        for x in &scan.excluded {
            self.moves
                .push(PlannedMove::skipped(x.path.clone(), EntryKind::File, x.reason));
        }
    }
}

/// Compose scan + transform + collision resolution into a plan.
///
/// Entries are visited in scan order; the index passed to the transform is the
/// entry's position in that order. Excluded entries are appended as skipped.
pub fn plan_transform(root: &Path, scan: &ScanResult, transform: &dyn NameTransform) -> Plan {
    let mut claims = ClaimSet::new();
    let mut plan = Plan {
        root: root.to_path_buf(),
        ..Default::default()
    };

    for (index, entry) in scan.entries.iter().enumerate() {
        let candidate = match transform.transform(&entry.name, entry.kind, index) {
            TransformOutcome::Unchanged(reason) => Err(reason),
            TransformOutcome::Rename(candidate) => check_candidate(&entry.name, &candidate).map(|_| candidate),
        };
        let candidate = match candidate {
            Ok(c) => c,
            Err(reason) => {
                debug!(src = %entry.path.display(), %reason, "Plan: skip");
                plan.moves
                    .push(PlannedMove::skipped(entry.path.clone(), entry.kind, reason));
                continue;
            }
        };

        let dir = entry.path.parent().unwrap_or(root);
        let destination = resolve(dir, &candidate, entry.kind, &entry.path, &mut claims);
        debug!(
            src = %entry.path.display(),
            dest = %destination.display(),
            "Plan: move"
        );
        plan.moves
            .push(PlannedMove::planned(entry.path.clone(), destination, entry.kind));
    }
    plan.push_excluded(scan);

    info!(
        root = %root.display(),
        planned = plan.planned_count(),
        total = plan.moves.len(),
        "Plan ready"
    );
    plan
}

/// Reject candidates that cannot be a single path component, or that change nothing.
pub(crate) fn check_candidate(original: &str, candidate: &str) -> Result<(), SkipReason> {
    if candidate.is_empty() {
        return Err(SkipReason::EmptyResult);
    }
    if candidate == "."
        || candidate == ".."
        || candidate.contains('\0')
        || candidate.chars().any(std::path::is_separator)
    {
        return Err(SkipReason::InvalidName);
    }
    if candidate == original {
        return Err(SkipReason::NoChange);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs_ops::scan::{ScanOptions, Scope, scan_root};
    use crate::transform::Transform;
    use assert_fs::prelude::*;

    #[test]
    fn two_items_mapping_to_one_name_are_disambiguated() {
        let td = assert_fs::TempDir::new().unwrap();
        td.child("a.txt").touch().unwrap();
        td.child("b.txt").touch().unwrap();
        let scan = scan_root(td.path(), Scope::Files, &ScanOptions::default()).unwrap();
        let to_x = |_: &str, _: EntryKind, _: usize| TransformOutcome::Rename("x.txt".into());
        let plan = plan_transform(td.path(), &scan, &to_x);

        let dests: Vec<_> = plan.moves.iter().map(|m| m.destination.clone()).collect();
        assert_eq!(dests, [td.path().join("x.txt"), td.path().join("x(1).txt")]);
        assert_eq!(plan.planned_count(), 2);
        // Planning alone never touches disk.
        assert!(td.child("a.txt").path().exists());
    }

    #[test]
    fn chained_names_never_target_another_source() {
        // a -> b while b -> c: b is still on disk at plan time, so a gets b(1).
        let td = assert_fs::TempDir::new().unwrap();
        td.child("a").touch().unwrap();
        td.child("b").touch().unwrap();
        let scan = scan_root(td.path(), Scope::Files, &ScanOptions::default()).unwrap();
        let next = |name: &str, _: EntryKind, _: usize| {
            let c = (name.as_bytes()[0] + 1) as char;
            TransformOutcome::Rename(c.to_string())
        };
        let plan = plan_transform(td.path(), &scan, &next);
        assert_eq!(plan.moves[0].destination, td.path().join("b(1)"));
        assert_eq!(plan.moves[1].destination, td.path().join("c"));
    }

    #[test]
    fn bad_candidates_become_skips() {
        assert_eq!(check_candidate("a", ""), Err(SkipReason::EmptyResult));
        assert_eq!(check_candidate("a", ".."), Err(SkipReason::InvalidName));
        assert_eq!(check_candidate("a", "x/y"), Err(SkipReason::InvalidName));
        assert_eq!(check_candidate("a", "a"), Err(SkipReason::NoChange));
        assert_eq!(check_candidate("a", "b"), Ok(()));
    }

    #[test]
    fn unchanged_items_carry_their_reason() {
        let td = assert_fs::TempDir::new().unwrap();
        td.child("x_a.txt").touch().unwrap();
        let scan = scan_root(td.path(), Scope::Files, &ScanOptions::default()).unwrap();
        let plan = plan_transform(td.path(), &scan, &Transform::AddPrefix("x_".into()));
        assert_eq!(
            plan.moves[0].status,
            MoveStatus::Skipped(SkipReason::AlreadyPrefixed)
        );
        assert_eq!(plan.planned_count(), 0);
    }
}
