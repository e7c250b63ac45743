//! Shard layout
//!
//! Deterministic (group, key) → path resolution.

use std::path::{Path, PathBuf};

use crate::error::{KvError, Result};

/// Sub-directory of the root holding all groups
pub const DATA_DIR: &str = "data";

/// Lock file name inside the root
pub const LOCK_FILENAME: &str = "LOCK";

/// Sub-directory of the root receiving quarantined records
pub const QUARANTINE_DIR: &str = "quarantine";

/// 32-bit string hash: `h = 31 * h + unit` over UTF-16 code units,
/// wrapping on overflow.
///
/// Must stay bit-compatible with existing databases, so it hashes UTF-16
/// code units rather than UTF-8 bytes.
pub fn key_hash(key: &str) -> i32 {
    key.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(unit as i32))
}

/// Shard bucket of a key: (second-lowest byte, lowest byte) of its hash
pub fn key_bucket(key: &str) -> (u8, u8) {
    let hash = key_hash(key);
    (((hash >> 8) & 0xff) as u8, (hash & 0xff) as u8)
}

/// MD5 of the key's UTF-8 bytes as 32 lowercase hex characters
pub fn key_digest(key: &str) -> String {
    format!("{:x}", md5::compute(key.as_bytes()))
}

/// Keys are opaque: anything that is not blank is accepted.
pub fn validate_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(KvError::invalid("key can't be null or empty"));
    }
    Ok(())
}

/// Groups become a single path segment, so they must be safe to join.
pub fn validate_group(group: &str) -> Result<()> {
    if group.trim().is_empty() {
        return Err(KvError::invalid("group can't be null or empty"));
    }
    if group != group.trim() {
        return Err(KvError::invalid(format!(
            "group '{}' has leading or trailing whitespace",
            group
        )));
    }
    if group == "." || group == ".." {
        return Err(KvError::invalid(format!("group '{}' is not a valid name", group)));
    }
    if group.contains(['/', '\\', '\0']) {
        return Err(KvError::invalid(format!(
            "group '{}' contains a path separator or NUL",
            group.escape_default()
        )));
    }
    Ok(())
}

/// Path resolver for one database root
#[derive(Debug, Clone)]
pub struct ShardLayout {
    root: PathBuf,
    data_root: PathBuf,
}

impl ShardLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let data_root = root.join(DATA_DIR);
        Self { root, data_root }
    }

    /// Database root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/data`
    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    /// `<root>/LOCK`
    pub fn lock_file(&self) -> PathBuf {
        self.root.join(LOCK_FILENAME)
    }

    /// `<root>/data/<group>/<hh>/<ll>/<digest>`
    ///
    /// Callers validate `group` and `key` first.
    pub fn resolve(&self, group: &str, key: &str) -> PathBuf {
        let (level0, level1) = key_bucket(key);
        self.resolve_group_root(group)
            .join(format!("{:02x}", level0))
            .join(format!("{:02x}", level1))
            .join(key_digest(key))
    }

    /// `<root>/data/<group>`
    pub fn resolve_group_root(&self, group: &str) -> PathBuf {
        self.data_root.join(group)
    }

    /// `<root>/quarantine/<group>/<file_name>`
    pub fn quarantine_path(&self, group: &str, file_name: &str) -> PathBuf {
        self.root.join(QUARANTINE_DIR).join(group).join(file_name)
    }
}
