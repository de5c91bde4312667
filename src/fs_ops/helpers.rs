//! I/O error enrichment.
//!
//! Per-item failures end up as plain strings in the batch report, so the
//! string has to carry the operation, the path and a hint the user can act on.
//!
//! Usage:
//!   fs::remove_file(p).map_err(io_error_with_help("remove source", p))?;

use std::io;
use std::path::Path;

use anyhow::anyhow;

/// "op 'path': error; hint [os code: N]"
pub fn describe_io_error(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);
    match e.raw_os_error() {
        Some(code) => {
            if let Some(hint) = hint_for_code(code) {
                msg.push_str("; ");
                msg.push_str(hint);
            }
            msg.push_str(&format!(" [os code: {code}]"));
        }
        None => {
            if let Some(hint) = hint_for_kind(e.kind()) {
                msg.push_str("; ");
                msg.push_str(hint);
            }
        }
    }
    msg
}

/// Adapter for `.map_err(...)` in anyhow code paths.
pub fn io_error_with_help<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> anyhow::Error + 'a {
    move |e: io::Error| anyhow!(describe_io_error(op, path, &e))
}

#[cfg(unix)]
fn hint_for_code(code: i32) -> Option<&'static str> {
    let hint = match code {
        libc::EACCES | libc::EPERM => "permission denied; check ownership and write permissions",
        libc::EXDEV => "cross-filesystem; rename not possible without copying",
        libc::EBUSY | libc::ETXTBSY => "resource busy; another process is using it",
        libc::ENOENT => "path not found; it may have been moved or deleted during the run",
        libc::EEXIST | libc::ENOTEMPTY => "destination already exists; nothing was overwritten",
        libc::ENOSPC => "insufficient space on device",
        libc::EROFS => "read-only filesystem; cannot rename here",
        libc::ELOOP => "too many symbolic link levels; possible symlink cycle",
        libc::ENAMETOOLONG => "file name or path too long; shorten the name",
        libc::EMFILE | libc::ENFILE => "too many open files; close files or raise limits",
        _ => return None,
    };
    Some(hint)
}

#[cfg(windows)]
fn hint_for_code(code: i32) -> Option<&'static str> {
    let hint = match code {
        5 => "access denied; check permissions",
        17 => "not same device; cross-filesystem move",
        32 | 33 => "file is in use by another process",
        2 | 3 => "path not found; it may have been moved or deleted during the run",
        80 | 183 => "destination already exists; nothing was overwritten",
        112 => "insufficient disk space",
        19 => "write protected media",
        206 => "file name or path too long",
        _ => return None,
    };
    Some(hint)
}

#[cfg(not(any(unix, windows)))]
fn hint_for_code(_code: i32) -> Option<&'static str> {
    None
}

fn hint_for_kind(kind: io::ErrorKind) -> Option<&'static str> {
    match kind {
        io::ErrorKind::PermissionDenied => Some("permission denied; check ownership and write permissions"),
        io::ErrorKind::NotFound => Some("path not found; it may have been moved or deleted during the run"),
        io::ErrorKind::AlreadyExists => Some("destination already exists; nothing was overwritten"),
        _ => None,
    }
}
