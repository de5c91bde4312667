//! Cross-device fallback for regular files:
//! - Copies into a hidden temp file next to the destination (create_new, never clobbers)
//! - Restores the source's modification time
//! - Renames temp -> destination without replacing anything
//! - Removes the source only once the destination is in place

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use filetime::FileTime;
use tracing::{debug, warn};

use super::atomic::move_no_clobber;
use super::helpers::io_error_with_help;
use super::util;

const BUF_SIZE: usize = 1024 * 1024;

pub fn copy_then_remove(src: &Path, dest: &Path) -> Result<()> {
    let dest_dir = dest
        .parent()
        .ok_or_else(|| anyhow!("destination has no parent: {}", dest.display()))?;
    let src_meta = fs::metadata(src).map_err(io_error_with_help("stat source", src))?;

    let tmp_path = util::unique_temp_path(dest_dir);
    let bytes = copy_streaming(src, &tmp_path)
        .map_err(io_error_with_help("copy to temporary file", &tmp_path));
    let bytes = match bytes {
        Ok(b) => b,
        Err(e) => {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }
    };

    if let Ok(mtime) = src_meta.modified()
        && let Err(e) = filetime::set_file_mtime(&tmp_path, FileTime::from_system_time(mtime))
    {
        warn!(path = %tmp_path.display(), error = %e, "failed to restore mtime on copy");
    }
    #[cfg(unix)]
    {
        let _ = fs::set_permissions(&tmp_path, src_meta.permissions());
    }

    if let Err(e) = move_no_clobber(&tmp_path, dest) {
        let _ = fs::remove_file(&tmp_path);
        return Err(io_error_with_help("place copied file", dest)(e));
    }

    fs::remove_file(src)
        .map_err(io_error_with_help("remove source after copy", src))
        .with_context(|| format!("copy is complete at {}", dest.display()))?;

    debug!(src = %src.display(), dest = %dest.display(), bytes, "Moved via copy fallback");
    Ok(())
}

/// Buffered copy into a new file, fsynced before returning.
fn copy_streaming(src: &Path, dst: &Path) -> io::Result<u64> {
    let reader = File::open(src)?;
    let out = OpenOptions::new().write(true).create_new(true).open(dst)?;
    let mut reader = BufReader::with_capacity(BUF_SIZE, reader);
    let mut writer = BufWriter::with_capacity(BUF_SIZE, out);
    let bytes = io::copy(&mut reader, &mut writer)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(bytes)
}
