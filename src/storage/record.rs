//! Record files
//!
//! Raw file I/O for single-value records. No locking happens here; the
//! engine holds the record's stripe around every call.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::util;

/// Replace the content of a record file.
///
/// Creates missing parent directories, truncates, writes and flushes.
/// With `sync` the data is also flushed to the device. On error the file
/// may be left truncated or partially written; the caller removes it.
pub fn write_record(path: &Path, text: &str, sync: bool) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)?;

    file.set_len(0)?;
    file.write_all(text.as_bytes())?;
    file.flush()?;

    if sync {
        file.sync_data()?;
    }

    Ok(())
}

/// Read the whole record as UTF-8 text.
///
/// Invalid UTF-8 surfaces as `ErrorKind::InvalidData`.
pub fn read_record(path: &Path) -> io::Result<String> {
    let file = File::open(path)?;
    util::read_fully(file)
}

/// Remove a record file. Returns whether a file was actually removed.
pub fn remove_record(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Move a record to `dest`, replacing anything already there.
pub fn move_record(path: &Path, dest: &Path) -> io::Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::rename(path, dest)
}

/// Every regular file below `dir`, recursively.
///
/// A missing `dir` yields an empty list. Directories that cannot be read
/// are logged and skipped. Order follows the filesystem.
pub fn collect_records(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    match fs::metadata(dir) {
        Ok(meta) if meta.is_file() => files.push(dir.to_path_buf()),
        Ok(meta) if meta.is_dir() => walk(dir, &mut files),
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %dir.display(), error = %e, "cannot stat directory"),
    }
    files
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        // Removed between listing the parent and descending into it
        Err(e) if e.kind() == io::ErrorKind::NotFound => return,
        Err(e) => {
            tracing::warn!(path = %dir.display(), error = %e, "skipping unreadable directory");
            return;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(path = %dir.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        match entry.file_type() {
            Ok(ft) if ft.is_dir() => walk(&entry.path(), files),
            Ok(ft) if ft.is_file() => files.push(entry.path()),
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(path = %entry.path().display(), error = %e, "skipping entry");
            }
        }
    }
}
