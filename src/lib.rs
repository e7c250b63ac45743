//! # ShardKV
//!
//! An embedded, single-process key/value store that keeps every value in
//! its own file:
//! - Values partitioned by a logical group (one directory per group)
//! - Keys hashed onto a 256 × 256 directory tree per group
//! - Exclusive advisory lock on the database root
//! - Striped per-record locking inside the process
//! - Caller-chosen codecs: raw text or JSON
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Registry (optional sharing)                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                         Store                                │
//! │        (DbLock + lock stripes + recovery policy)             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ ShardLayout │          │    Codec    │
//!   │ (path hash) │          │ (Text/Json) │
//!   └──────┬──────┘          └─────────────┘
//!          │
//!          ▼
//!   ┌─────────────┐
//!   │ Record file │
//!   └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use shardkv::Store;
//!
//! let store = Store::open_path("./db".as_ref())?;
//! store.put_text("a", "g", "x")?;
//! assert_eq!(store.get_text("a", "g")?, Some("x".to_string()));
//! store.close()?;
//! # Ok::<(), shardkv::KvError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod lock;
pub mod storage;
pub mod util;
pub mod engine;
pub mod registry;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use codec::{Codec, Json, Text, Timestamp};
pub use config::{Config, RecoveryPolicy};
pub use engine::Store;
pub use error::{KvError, Result};
pub use registry::Registry;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of ShardKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
