//! No-clobber rename.
//! - Uses the platform's "fail if destination exists" rename where available.
//! - A case-only (or normalization-only) rename of the same entry falls
//!   through to a plain rename. Hard links under other names are refused.
//! - On Unix, best-effort fsync of the destination directory afterwards.

use std::fs;
use std::io;
use std::path::Path;

use super::collision::is_same_entry;
use crate::platform;

pub fn move_no_clobber(src: &Path, dst: &Path) -> io::Result<()> {
    if dst != src && is_same_entry(dst, src) {
        fs::rename(src, dst)?;
    } else {
        platform::rename_no_replace(src, dst)?;
    }

    #[cfg(unix)]
    if let Some(parent) = dst.parent() {
        // A failed fsync must not turn a completed rename into a failure.
        let _ = super::util::fsync_dir(parent);
    }

    Ok(())
}
