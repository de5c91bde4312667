//! Advisory root lock.
//!
//! A front end may hold `.namesmith.lock` inside the root for the duration of
//! a run so two invocations never work on the same tree at once. The engine
//! itself never locks.
//!
//! - Unix: flock(LOCK_EX | LOCK_NB) on the lock file descriptor.
//! - Windows: open the lock file with no sharing (exclusive).
//!
//! The lock is released, and the file removed, when the guard is dropped.

use std::io;
use std::path::{Path, PathBuf};

use tracing::trace;

#[cfg(unix)]
use std::fs::{File, OpenOptions};
#[cfg(unix)]
use std::os::fd::AsRawFd;
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

#[cfg(windows)]
use windows_sys::Win32::{
    Foundation::{CloseHandle, INVALID_HANDLE_VALUE},
    Storage::FileSystem::{
        CreateFileW, FILE_ATTRIBUTE_HIDDEN, FILE_ATTRIBUTE_NORMAL, OPEN_ALWAYS, SetFileAttributesW,
    },
};

#[cfg(windows)]
const GENERIC_READ: u32 = 0x8000_0000;
#[cfg(windows)]
const GENERIC_WRITE: u32 = 0x4000_0000;

use super::scan::LOCK_FILE_NAME;

/// RAII guard for the root lock.
pub struct RootLock {
    #[cfg(unix)]
    file: File,
    #[cfg(windows)]
    handle: isize,
    path: PathBuf,
}

impl RootLock {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for RootLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RootLock").field("path", &self.path).finish()
    }
}

impl Drop for RootLock {
    fn drop(&mut self) {
        #[cfg(unix)]
        {
            let _ = unsafe { libc::flock(self.file.as_raw_fd(), libc::LOCK_UN) };
        }
        #[cfg(windows)]
        unsafe {
            if self.handle != 0 {
                let _ = CloseHandle(self.handle as _);
            }
        }
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Try to lock `root` without blocking. `Ok(None)` means another run holds it.
pub fn try_acquire_root_lock(root: &Path) -> io::Result<Option<RootLock>> {
    let lock_path = root.join(LOCK_FILE_NAME);

    #[cfg(unix)]
    {
        let f = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .custom_flags(libc::O_CLOEXEC | libc::O_NOFOLLOW)
            .mode(0o600)
            .open(&lock_path)?;

        let rc = unsafe { libc::flock(f.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
        if rc == 0 {
            trace!(path = %lock_path.display(), "root lock acquired");
            return Ok(Some(RootLock { file: f, path: lock_path }));
        }
        let err = io::Error::last_os_error();
        if let Some(code) = err.raw_os_error()
            && code == libc::EWOULDBLOCK
        {
            trace!(path = %lock_path.display(), "root lock held elsewhere");
            return Ok(None);
        }
        Err(err)
    }

    #[cfg(windows)]
    {
        use std::iter::once;
        use std::os::windows::ffi::OsStrExt;

        let wide: Vec<u16> = lock_path.as_os_str().encode_wide().chain(once(0)).collect();
        let handle = unsafe {
            CreateFileW(
                wide.as_ptr(),
                GENERIC_READ | GENERIC_WRITE,
                0,
                std::ptr::null_mut(),
                OPEN_ALWAYS,
                FILE_ATTRIBUTE_NORMAL,
                std::ptr::null_mut(),
            )
        };
        if handle != INVALID_HANDLE_VALUE {
            let _ = unsafe { SetFileAttributesW(wide.as_ptr(), FILE_ATTRIBUTE_NORMAL | FILE_ATTRIBUTE_HIDDEN) };
            trace!(path = %lock_path.display(), "root lock acquired");
            return Ok(Some(RootLock {
                handle: handle as isize,
                path: lock_path,
            }));
        }
        let err = io::Error::last_os_error();
        // ERROR_SHARING_VIOLATION: someone else has it open.
        if err.raw_os_error() == Some(32) {
            trace!(path = %lock_path.display(), "root lock held elsewhere");
            return Ok(None);
        }
        Err(err)
    }
}
