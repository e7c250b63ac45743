//! Lock Module
//!
//! Single-process ownership of a database directory.
//!
//! ## Responsibilities
//! - Create/open the `LOCK` file in the database root
//! - Take a non-blocking, exclusive, advisory OS lock on it
//! - Release the lock and close the handle on `release()` or drop
//!
//! The lock is cooperative: a process that does not take it can still
//! read and write the record files directly.

mod file_lock;
mod platform;

pub use file_lock::DbLock;
