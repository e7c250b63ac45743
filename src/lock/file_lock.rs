//! Database lock file
//!
//! Holds the open `LOCK` file and the OS lock taken on it.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::{KvError, Result};

use super::platform;

/// Exclusive advisory lock on a database root
///
/// Acquisition never waits: if the file is already locked the call fails
/// with `KvError::LockUnavailable`. Dropping the lock closes the file,
/// which releases the OS lock as well.
pub struct DbLock {
    /// Path of the lock file
    path: PathBuf,

    /// Open handle the OS lock is attached to
    file: File,
}

impl DbLock {
    /// Open (creating if needed) and lock the given file
    pub fn acquire(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        // On error the File is dropped here, closing the handle
        if !platform::try_lock_exclusive(&file)? {
            return Err(KvError::LockUnavailable {
                path: path.to_path_buf(),
            });
        }

        tracing::debug!(path = %path.display(), "database lock acquired");

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Release the OS lock and close the handle
    ///
    /// The handle is closed even when unlocking reports an error.
    pub fn release(self) -> Result<()> {
        let result = platform::unlock(&self.file);
        tracing::debug!(path = %self.path.display(), "database lock released");
        drop(self.file);
        result.map_err(KvError::from)
    }

    /// Path of the lock file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Debug for DbLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbLock").field("path", &self.path).finish()
    }
}
