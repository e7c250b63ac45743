//! Handle registry
//!
//! Opt-in sharing of one `Store` per database root within a process.
//!
//! A second `Store::open` on a locked root fails with `LockUnavailable`,
//! even inside the same process. Callers that want every part of the
//! program to reach the same database through `open` keep a `Registry`
//! and open through it instead; there is no process-wide instance.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::config::Config;
use crate::engine::Store;
use crate::error::Result;

/// Caches open stores by canonical root path
///
/// The first open for a root wins: later opens return the cached handle
/// and their config is ignored. Handles are held weakly, so a store is
/// closed once every `Arc` is dropped; a closed or dropped entry is
/// replaced by a fresh open.
#[derive(Default)]
pub struct Registry {
    stores: Mutex<HashMap<PathBuf, Weak<Store>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the live store for `config.data_dir`, opening it if needed
    pub fn open(&self, config: Config) -> Result<Arc<Store>> {
        config.validate()?;

        // Canonicalization needs the directory to exist
        fs::create_dir_all(&config.data_dir)?;
        let root = fs::canonicalize(&config.data_dir)?;

        let mut stores = self.stores.lock();

        if let Some(store) = stores.get(&root).and_then(Weak::upgrade) {
            if !store.is_closed() {
                tracing::debug!(root = %root.display(), "reusing open store");
                return Ok(store);
            }
            // Closed handles have already released the OS lock
            tracing::debug!(root = %root.display(), "replacing closed store");
        }

        let store = Arc::new(Store::open(Config {
            data_dir: root.clone(),
            ..config
        })?);
        stores.insert(root, Arc::downgrade(&store));
        stores.retain(|_, weak| weak.strong_count() > 0);

        Ok(store)
    }

    /// Open with default config for `path`
    pub fn open_path(&self, path: impl Into<PathBuf>) -> Result<Arc<Store>> {
        self.open(Config::builder().data_dir(path).build())
    }

    /// Number of stores still alive
    pub fn len(&self) -> usize {
        self.stores
            .lock()
            .values()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
