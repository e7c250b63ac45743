//! Configuration for ShardKV
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{KvError, Result};

/// Main configuration for a ShardKV database
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Database root directory
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── LOCK         (advisory lock file)
    ///     ├── data/        (one sub-directory per group)
    ///     └── quarantine/  (only with RecoveryPolicy::Quarantine)
    pub data_dir: PathBuf,

    /// fsync record data before `put` reports success
    pub sync_on_write: bool,

    // -------------------------------------------------------------------------
    // Read-side Configuration
    // -------------------------------------------------------------------------
    /// What to do with a record that exists but cannot be decoded
    pub recovery_policy: RecoveryPolicy,

    // -------------------------------------------------------------------------
    // Concurrency Configuration
    // -------------------------------------------------------------------------
    /// Number of record lock stripes; 1 serializes every operation
    pub lock_stripes: usize,
}

/// Handling of corrupt records found on read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecoveryPolicy {
    /// Remove the file and treat the key as absent
    #[default]
    Delete,

    /// Move the file under `<root>/quarantine/<group>/` and treat the key as absent
    Quarantine,

    /// Leave the file in place and return `KvError::CorruptRecord`
    Fail,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./shardkv_data"),
            sync_on_write: false,
            recovery_policy: RecoveryPolicy::Delete,
            lock_stripes: 64,
        }
    }
}

impl Config {
    /// Largest accepted stripe count
    pub const MAX_LOCK_STRIPES: usize = 65536;

    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(KvError::Config("data_dir must not be empty".into()));
        }
        if self.lock_stripes == 0 || self.lock_stripes > Self::MAX_LOCK_STRIPES {
            return Err(KvError::Config(format!(
                "lock_stripes must be in [1, {}], got {}",
                Self::MAX_LOCK_STRIPES,
                self.lock_stripes
            )));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the database root directory
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Enable or disable fsync on every put
    pub fn sync_on_write(mut self, sync: bool) -> Self {
        self.config.sync_on_write = sync;
        self
    }

    /// Set the corrupt record policy
    pub fn recovery_policy(mut self, policy: RecoveryPolicy) -> Self {
        self.config.recovery_policy = policy;
        self
    }

    /// Set the number of record lock stripes
    pub fn lock_stripes(mut self, stripes: usize) -> Self {
        self.config.lock_stripes = stripes;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
