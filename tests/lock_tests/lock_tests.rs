//! Tests for DbLock
//!
//! These tests verify:
//! - Acquire creates the lock file
//! - A second holder fails immediately with LockUnavailable
//! - release() and drop both free the lock

use std::time::{Duration, Instant};

use shardkv::lock::DbLock;
use shardkv::KvError;
use tempfile::TempDir;

#[test]
fn test_acquire_creates_lock_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("LOCK");

    let lock = DbLock::acquire(&path).unwrap();

    assert!(path.is_file());
    assert_eq!(lock.path(), path.as_path());
}

#[test]
fn test_acquire_existing_file_keeps_content() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("LOCK");
    std::fs::write(&path, "owner info").unwrap();

    let _lock = DbLock::acquire(&path).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "owner info");
}

#[test]
fn test_second_acquire_fails_fast() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("LOCK");
    let _held = DbLock::acquire(&path).unwrap();

    let start = Instant::now();
    let result = DbLock::acquire(&path);

    match result {
        Err(KvError::LockUnavailable { path: reported }) => assert_eq!(reported, path),
        other => panic!("expected LockUnavailable, got {:?}", other),
    }
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[test]
fn test_release_allows_reacquire() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("LOCK");

    let lock = DbLock::acquire(&path).unwrap();
    lock.release().unwrap();

    let again = DbLock::acquire(&path).unwrap();
    again.release().unwrap();
}

#[test]
fn test_drop_allows_reacquire() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("LOCK");

    drop(DbLock::acquire(&path).unwrap());

    assert!(DbLock::acquire(&path).is_ok());
}

#[test]
fn test_acquire_in_missing_directory_is_io_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("missing").join("LOCK");

    assert!(matches!(DbLock::acquire(&path), Err(KvError::Io(_))));
}
