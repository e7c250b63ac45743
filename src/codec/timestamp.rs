//! Fixed timestamp format
//!
//! Date-times are stored as local wall-clock text with millisecond
//! precision, e.g. `2014-05-16 21:20:00.123`. Anything finer is dropped
//! on write, so compare against [`Timestamp::truncated`] in round trips.
//!
//! Usable as a serde `with` module:
//!
//! ```
//! use chrono::NaiveDateTime;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Event {
//!     #[serde(with = "shardkv::codec::timestamp")]
//!     at: NaiveDateTime,
//! }
//! ```

use std::fmt;

use chrono::{Local, NaiveDateTime, Timelike};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Output format (chrono syntax for `yyyy-MM-dd HH:mm:ss.SSS`)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Input format; accepts any number of fraction digits, or none
const PARSE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse(&text).map_err(de::Error::custom)
}

/// Parse timestamp text
pub fn parse(text: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(text, PARSE_FORMAT)
}

/// A date-time that serializes in the fixed record format
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub NaiveDateTime);

impl Timestamp {
    /// Current local time, already truncated to milliseconds
    pub fn now() -> Self {
        Self(Local::now().naive_local()).truncated()
    }

    /// Drop precision below one millisecond
    pub fn truncated(self) -> Self {
        let dt = self.0;
        let millis_only = (dt.nanosecond() / 1_000_000) * 1_000_000;
        Self(dt.with_nanosecond(millis_only).unwrap_or(dt))
    }

    pub fn as_naive(&self) -> &NaiveDateTime {
        &self.0
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(dt: NaiveDateTime) -> Self {
        Self(dt)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize(deserializer).map(Timestamp)
    }
}
