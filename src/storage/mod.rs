//! Storage Module
//!
//! On-disk layout and raw record file I/O.
//!
//! ## Responsibilities
//! - Map (group, key) to a record path (hash-sharded tree)
//! - Validate group/key identifiers before any path is built
//! - Write, read, remove and enumerate record files
//!
//! ## Directory Layout
//! ```text
//! <root>/
//! ├── LOCK
//! └── data/
//!     └── <group>/
//!         └── <hh>/            second-lowest byte of the key hash
//!             └── <ll>/        lowest byte of the key hash
//!                 └── <md5>    32 lowercase hex chars, one value
//! ```
//!
//! Each group fans out over at most 256 × 256 leaf directories no matter
//! how many keys it holds. Record content is UTF-8 text.

mod layout;
mod record;

pub use layout::{
    key_bucket, key_digest, key_hash, validate_group, validate_key, ShardLayout, DATA_DIR,
    LOCK_FILENAME, QUARANTINE_DIR,
};
pub use record::{collect_records, move_record, read_record, remove_record, write_record};
