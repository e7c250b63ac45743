//! Engine Module
//!
//! The store that ties the lock, the shard layout, record I/O and codecs
//! together.
//!
//! ## Responsibilities
//! - Own the database root and its exclusive `LOCK`
//! - Validate identifiers before touching disk
//! - Serialize access to each record through a lock stripe
//! - Apply the configured recovery policy to corrupt records

use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, MutexGuard};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec::{Codec, Json, Text};
use crate::config::{Config, RecoveryPolicy};
use crate::error::{KvError, Result};
use crate::lock::DbLock;
use crate::storage::{
    collect_records, move_record, read_record, remove_record, validate_group, validate_key,
    write_record, ShardLayout,
};

/// An open database
///
/// ## Concurrency Model: Striped Record Locks
///
/// - Every record maps to one of `lock_stripes` mutexes by its file name
/// - put/get/delete hold that stripe for the whole file operation, so a
///   record never has two writers and is never read mid-write
/// - Records on different stripes proceed in parallel
/// - `list` enumerates the group tree without any stripe held, then reads
///   each record under its own stripe; records created after the
///   enumeration may be missed
/// - `lock_stripes = 1` gives one store-wide mutex
///
/// Across processes only the advisory `LOCK` file applies.
pub struct Store {
    /// Store configuration
    config: Config,

    /// Path resolution for this root
    layout: ShardLayout,

    /// OS lock on `<root>/LOCK`; `None` once released
    lock: Mutex<Option<DbLock>>,

    /// Set by `close()`
    closed: AtomicBool,

    /// Record lock stripes
    stripes: Box<[Mutex<()>]>,
}

impl Store {
    /// Open or create a database with the given config
    ///
    /// On startup:
    /// 1. Validate config
    /// 2. Create the root directory if missing
    /// 3. Take the exclusive lock on `<root>/LOCK` (fails fast if held)
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        fs::create_dir_all(&config.data_dir)?;

        let layout = ShardLayout::new(&config.data_dir);
        let lock = DbLock::acquire(&layout.lock_file())?;

        let stripes = (0..config.lock_stripes)
            .map(|_| Mutex::new(()))
            .collect::<Vec<_>>()
            .into_boxed_slice();

        tracing::debug!(
            root = %layout.root().display(),
            stripes = config.lock_stripes,
            policy = ?config.recovery_policy,
            "store opened"
        );

        Ok(Self {
            config,
            layout,
            lock: Mutex::new(Some(lock)),
            closed: AtomicBool::new(false),
            stripes,
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified root directory
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config::builder().data_dir(path).build();
        Self::open(config)
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Store `value` under (group, key), replacing any previous value
    ///
    /// Returns `Ok(false)` when the record could not be written; the
    /// partially written file is removed in that case. Argument errors
    /// are returned before any disk access.
    pub fn put<C: Codec>(&self, key: &str, group: &str, value: &C::Value, codec: &C) -> Result<bool> {
        validate_key(key)?;
        validate_group(group)?;

        let text = codec.encode(value)?;
        if text.trim().is_empty() {
            return Err(KvError::invalid("value can't be null or empty"));
        }

        let path = self.layout.resolve(group, key);
        let _guard = self.lock_record(&path)?;

        match write_record(&path, &text, self.config.sync_on_write) {
            Ok(()) => {
                tracing::trace!(group, path = %path.display(), bytes = text.len(), "record written");
                Ok(true)
            }
            Err(e) => {
                tracing::error!(group, path = %path.display(), error = %e, "failed to write record");
                if let Err(cleanup) = remove_record(&path) {
                    tracing::warn!(
                        path = %path.display(),
                        error = %cleanup,
                        "failed to remove partially written record"
                    );
                }
                Ok(false)
            }
        }
    }

    /// Read the value stored under (group, key)
    ///
    /// Returns `Ok(None)` for a missing key. A record that cannot be read
    /// or decoded is handed to the recovery policy and, unless the policy
    /// is `Fail`, also reported as `None`.
    pub fn get<C: Codec>(&self, key: &str, group: &str, codec: &C) -> Result<Option<C::Value>> {
        validate_key(key)?;
        validate_group(group)?;

        let path = self.layout.resolve(group, key);
        let _guard = self.lock_record(&path)?;

        self.load(group, &path, codec)
    }

    /// Decode every record in a group
    ///
    /// A blank group yields an empty list. Order follows the filesystem.
    /// Corrupt records are handled by the recovery policy and skipped.
    pub fn list<C: Codec>(&self, group: &str, codec: &C) -> Result<Vec<C::Value>> {
        self.ensure_open()?;
        if group.trim().is_empty() {
            return Ok(Vec::new());
        }
        validate_group(group)?;

        let group_root = self.layout.resolve_group_root(group);

        // Snapshot of the tree, taken without any stripe held
        let files = collect_records(&group_root);

        let mut values = Vec::with_capacity(files.len());
        for path in files {
            let _guard = self.lock_record(&path)?;
            if let Some(value) = self.load(group, &path, codec)? {
                values.push(value);
            }
        }

        tracing::trace!(group, count = values.len(), "group listed");
        Ok(values)
    }

    /// Remove the record for (group, key)
    ///
    /// Returns whether a file was actually removed.
    pub fn delete(&self, key: &str, group: &str) -> Result<bool> {
        validate_key(key)?;
        validate_group(group)?;

        let path = self.layout.resolve(group, key);
        let _guard = self.lock_record(&path)?;

        let removed = remove_record(&path)?;
        tracing::trace!(group, path = %path.display(), removed, "record deleted");
        Ok(removed)
    }

    /// Release the database lock
    ///
    /// Waits for in-flight record operations. Idempotent; operations
    /// issued afterwards fail with `KvError::Closed`.
    pub fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        // Drain in-flight operations
        let _drained: Vec<MutexGuard<'_, ()>> = self.stripes.iter().map(|s| s.lock()).collect();

        let released = match self.lock.lock().take() {
            Some(lock) => lock.release(),
            None => Ok(()),
        };

        tracing::debug!(root = %self.layout.root().display(), "store closed");
        released
    }

    // =========================================================================
    // Convenience wrappers
    // =========================================================================

    /// `put` with the [`Text`] codec
    pub fn put_text(&self, key: &str, group: &str, value: &str) -> Result<bool> {
        self.put(key, group, &value.to_owned(), &Text)
    }

    /// `get` with the [`Text`] codec
    pub fn get_text(&self, key: &str, group: &str) -> Result<Option<String>> {
        self.get(key, group, &Text)
    }

    /// `list` with the [`Text`] codec
    pub fn list_text(&self, group: &str) -> Result<Vec<String>> {
        self.list(group, &Text)
    }

    /// `put` with the [`Json`] codec
    pub fn put_json<T>(&self, key: &str, group: &str, value: &T) -> Result<bool>
    where
        T: Serialize + DeserializeOwned,
    {
        self.put(key, group, value, &Json::<T>::new())
    }

    /// `get` with the [`Json`] codec
    pub fn get_json<T>(&self, key: &str, group: &str) -> Result<Option<T>>
    where
        T: Serialize + DeserializeOwned,
    {
        self.get(key, group, &Json::<T>::new())
    }

    /// `list` with the [`Json`] codec
    pub fn list_json<T>(&self, group: &str) -> Result<Vec<T>>
    where
        T: Serialize + DeserializeOwned,
    {
        self.list(group, &Json::<T>::new())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Database root directory
    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Where (group, key) lives on disk, whether or not it exists
    pub fn record_path(&self, key: &str, group: &str) -> Result<PathBuf> {
        validate_key(key)?;
        validate_group(group)?;
        Ok(self.layout.resolve(group, key))
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(KvError::Closed);
        }
        Ok(())
    }

    /// Lock the stripe owning `path`, then re-check that the store is open
    fn lock_record(&self, path: &Path) -> Result<MutexGuard<'_, ()>> {
        self.ensure_open()?;
        let guard = self.stripes[self.stripe_index(path)].lock();
        self.ensure_open()?;
        Ok(guard)
    }

    /// Stripe of a record, from its file name (the key digest)
    fn stripe_index(&self, path: &Path) -> usize {
        let mut hasher = DefaultHasher::new();
        path.file_name().hash(&mut hasher);
        (hasher.finish() % self.stripes.len() as u64) as usize
    }

    /// Read and decode one record; caller holds its stripe
    fn load<C: Codec>(&self, group: &str, path: &Path, codec: &C) -> Result<Option<C::Value>> {
        let text = match read_record(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                self.recover(group, path, format!("unreadable record: {}", e))?;
                return Ok(None);
            }
        };

        if text.trim().is_empty() {
            self.recover(group, path, "empty record".to_string())?;
            return Ok(None);
        }

        match codec.decode(&text) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                self.recover(group, path, format!("undecodable record: {}", e))?;
                Ok(None)
            }
        }
    }

    /// Apply the recovery policy to a corrupt record; caller holds its stripe
    fn recover(&self, group: &str, path: &Path, reason: String) -> Result<()> {
        match self.config.recovery_policy {
            RecoveryPolicy::Delete => {
                tracing::warn!(group, path = %path.display(), %reason, "deleting corrupt record");
                if let Err(e) = remove_record(path) {
                    tracing::error!(path = %path.display(), error = %e, "failed to delete corrupt record");
                }
                Ok(())
            }
            RecoveryPolicy::Quarantine => {
                let file_name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let dest = self.layout.quarantine_path(group, &file_name);
                tracing::warn!(
                    group,
                    path = %path.display(),
                    dest = %dest.display(),
                    %reason,
                    "quarantining corrupt record"
                );
                if let Err(e) = move_record(path, &dest) {
                    tracing::error!(path = %path.display(), error = %e, "failed to quarantine corrupt record");
                }
                Ok(())
            }
            RecoveryPolicy::Fail => {
                tracing::error!(group, path = %path.display(), %reason, "corrupt record");
                Err(KvError::CorruptRecord {
                    path: path.to_path_buf(),
                    reason,
                })
            }
        }
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        if let Some(lock) = self.lock.get_mut().take() {
            if let Err(e) = lock.release() {
                tracing::warn!(error = %e, "failed to release database lock on drop");
            }
        }
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("root", &self.layout.root())
            .field("closed", &self.is_closed())
            .field("config", &self.config)
            .finish()
    }
}
