//! Codec Module
//!
//! Value ↔ record text conversion.
//!
//! Every record is UTF-8 text. The caller picks the codec for each call,
//! so the store never guesses a decoding strategy from the value type.
//!
//! - [`Text`]: strings stored verbatim, read back verbatim
//! - [`Json`]: any serde type, stored as JSON
//! - [`Timestamp`] / [`timestamp`]: date-times in the fixed
//!   `yyyy-MM-dd HH:mm:ss.SSS` format (millisecond precision)

mod json;
mod text;
pub mod timestamp;

pub use json::Json;
pub use text::Text;
pub use timestamp::{Timestamp, TIMESTAMP_FORMAT};

use crate::error::Result;

/// Converts values of one type to and from record text
///
/// `decode` failures are reported as `KvError::Serialization`; the store
/// turns them into corrupt-record handling.
pub trait Codec {
    /// The value type this codec handles
    type Value;

    /// Value → record text
    fn encode(&self, value: &Self::Value) -> Result<String>;

    /// Record text → value
    fn decode(&self, text: &str) -> Result<Self::Value>;
}
