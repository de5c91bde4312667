//! Plan execution.
//!
//! Applies planned moves in order, one at a time. A failed item is recorded
//! and the batch continues. Cancellation is honoured between items only, so
//! every item is either fully moved or not attempted.

use std::path::Path;

use anyhow::Result;
use tracing::{info, warn};

use super::atomic::move_no_clobber;
use super::collision::{is_same_entry, occupied};
use super::copy::copy_then_remove;
use super::helpers::io_error_with_help;
use super::plan::{MoveStatus, Plan};
use super::scan::EntryKind;
use super::util::is_cross_device;
use crate::cancel::CancelToken;
use crate::report::{BatchReport, SkipReason};

#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    pub dry_run: bool,
    pub cancel: CancelToken,
}

/// The one filesystem mutation the executor performs per item.
pub trait Mover {
    fn move_entry(&self, src: &Path, dst: &Path, kind: EntryKind) -> Result<()>;
}

/// Rename without replacing; regular files fall back to copy + remove across devices.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsMover;

impl Mover for FsMover {
    fn move_entry(&self, src: &Path, dst: &Path, kind: EntryKind) -> Result<()> {
        match move_no_clobber(src, dst) {
            Ok(()) => Ok(()),
            Err(e) if kind == EntryKind::File && is_cross_device(&e) => {
                warn!(src = %src.display(), dest = %dst.display(), "Rename crosses devices; copying instead");
                copy_then_remove(src, dst)
            }
            Err(e) => Err(io_error_with_help("rename", src)(e)),
        }
    }
}

pub fn execute(plan: &mut Plan, opts: &ExecuteOptions) -> BatchReport {
    execute_with(plan, opts, &FsMover)
}

/// Execute with a caller-supplied mover.
pub fn execute_with(plan: &mut Plan, opts: &ExecuteOptions, mover: &dyn Mover) -> BatchReport {
    let mut report = BatchReport::new(&plan.root, opts.dry_run);
    report.planned = plan.planned_count();

    for item in plan.moves.iter_mut() {
        match &item.status {
            MoveStatus::Skipped(reason) => {
                report.record_skipped(&item.source, *reason);
                continue;
            }
            MoveStatus::Planned => {}
            MoveStatus::Applied | MoveStatus::Failed(_) => continue,
        }

        if opts.cancel.is_cancelled() {
            if !report.cancelled {
                warn!("Cancellation requested; remaining items will not be attempted");
                report.cancelled = true;
            }
            item.status = MoveStatus::Skipped(SkipReason::Cancelled);
            report.record_skipped(&item.source, SkipReason::Cancelled);
            continue;
        }

        if opts.dry_run {
            info!(src = %item.source.display(), dest = %item.destination.display(), "Dry run: would rename");
            report.record_previewed(&item.source, &item.destination);
            continue;
        }

        // Something may have appeared at the destination since planning.
        if occupied(&item.destination) && !is_same_entry(&item.destination, &item.source) {
            let error = format!(
                "destination appeared since planning: {}",
                item.destination.display()
            );
            warn!(src = %item.source.display(), dest = %item.destination.display(), "Destination appeared; not overwriting");
            item.status = MoveStatus::Failed(error.clone());
            report.record_failed(&item.source, &item.destination, error);
            continue;
        }

        match mover.move_entry(&item.source, &item.destination, item.kind) {
            Ok(()) => {
                info!(src = %item.source.display(), dest = %item.destination.display(), "Renamed");
                item.status = MoveStatus::Applied;
                report.record_applied(&item.source, &item.destination);
            }
            Err(e) => {
                let error = format!("{e:#}");
                warn!(src = %item.source.display(), dest = %item.destination.display(), error = %error, "Rename failed");
                item.status = MoveStatus::Failed(error.clone());
                report.record_failed(&item.source, &item.destination, error);
            }
        }
    }

    if report.cancelled {
        report.warn("Cancelled; remaining items were not attempted");
    }
    let c = report.counts();
    info!(
        planned = c.planned,
        applied = c.applied,
        skipped = c.skipped,
        failed = c.failed,
        dry_run = opts.dry_run,
        "Batch finished"
    );
    report
}
