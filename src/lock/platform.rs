//! Platform-specific advisory locks
//!
//! - Unix: `flock(LOCK_EX | LOCK_NB)`, owned by the open file description,
//!   so a second open of the same file conflicts even inside one process
//! - Windows: `LockFileEx` with `LOCKFILE_FAIL_IMMEDIATELY`
//! - Other: no OS lock is available; acquisition always succeeds

use std::fs::File;
use std::io;

/// Try to take an exclusive lock without blocking.
///
/// Returns `Ok(false)` when another holder owns the lock.
pub(crate) fn try_lock_exclusive(file: &File) -> io::Result<bool> {
    #[cfg(unix)]
    {
        use std::os::unix::io::AsRawFd;
        let fd = file.as_raw_fd();
        // SAFETY: flock operates on a descriptor borrowed from a live File.
        let result = unsafe { libc::flock(fd, libc::LOCK_EX | libc::LOCK_NB) };
        if result == 0 {
            return Ok(true);
        }
        let err = io::Error::last_os_error();
        if err.kind() == io::ErrorKind::WouldBlock {
            Ok(false)
        } else {
            Err(err)
        }
    }

    #[cfg(windows)]
    {
        use std::os::windows::io::AsRawHandle;
        use winapi::shared::winerror::ERROR_LOCK_VIOLATION;
        use winapi::um::fileapi::LockFileEx;
        use winapi::um::minwinbase::{LOCKFILE_EXCLUSIVE_LOCK, LOCKFILE_FAIL_IMMEDIATELY, OVERLAPPED};

        let handle = file.as_raw_handle();
        // SAFETY: OVERLAPPED is plain data; all-zero means offset 0.
        let mut overlapped: OVERLAPPED = unsafe { std::mem::zeroed() };
        // SAFETY: the handle is borrowed from a live File and the OVERLAPPED
        // outlives the synchronous call.
        let result = unsafe {
            LockFileEx(
                handle as *mut _,
                LOCKFILE_EXCLUSIVE_LOCK | LOCKFILE_FAIL_IMMEDIATELY,
                0,
                u32::MAX,
                u32::MAX,
                &mut overlapped,
            )
        };
        if result != 0 {
            return Ok(true);
        }
        let err = io::Error::last_os_error();
        if err.raw_os_error() == Some(ERROR_LOCK_VIOLATION as i32) {
            Ok(false)
        } else {
            Err(err)
        }
    }

    #[cfg(not(any(unix, windows)))]
    {
        let _ = file;
        tracing::warn!("advisory file locks are not supported on this platform");
        Ok(true)
    }
}

/// Release a lock taken by `try_lock_exclusive`.
pub(crate) fn unlock(file: &File) -> io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::io::AsRawFd;
        let fd = file.as_raw_fd();
        // SAFETY: flock operates on a descriptor borrowed from a live File.
        let result = unsafe { libc::flock(fd, libc::LOCK_UN) };
        if result == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }

    #[cfg(windows)]
    {
        use std::os::windows::io::AsRawHandle;
        use winapi::um::fileapi::UnlockFile;

        let handle = file.as_raw_handle();
        // SAFETY: the handle is borrowed from a live File.
        let result = unsafe { UnlockFile(handle as *mut _, 0, 0, u32::MAX, u32::MAX) };
        if result != 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }

    #[cfg(not(any(unix, windows)))]
    {
        let _ = file;
        Ok(())
    }
}
