//! Filesystem side of the engine: scan, plan, resolve, execute, prune.

mod atomic;
mod collision;
mod copy;
mod execute;
mod flatten;
mod helpers;
mod lock;
mod plan;
mod scan;
mod util;

pub use atomic::move_no_clobber;
pub use collision::{ClaimSet, fold_name, is_same_entry, occupied, resolve};
pub use execute::{ExecuteOptions, FsMover, Mover, execute, execute_with};
pub use flatten::{plan_flatten, prune_empty_dirs};
pub use helpers::{describe_io_error, io_error_with_help};
pub use lock::{RootLock, try_acquire_root_lock};
pub use plan::{MoveStatus, Plan, PlannedMove, plan_transform};
pub use scan::{
    Entry, EntryKind, Excluded, LOCK_FILE_NAME, ScanOptions, ScanResult, Scope, ensure_root,
    scan_root, scan_tree,
};
