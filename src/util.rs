//! Stream helpers
//!
//! Whole-stream text reads and byte copies shared by the store and the CLI.

use std::io::{self, Read, Write};

/// Read everything from `reader` as UTF-8 text.
///
/// Content is returned exactly as stored; invalid UTF-8 is reported as
/// `ErrorKind::InvalidData`.
pub fn read_fully<R: Read>(mut reader: R) -> io::Result<String> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf)?;
    Ok(buf)
}

/// Copy all bytes from `source` into `sink` and flush it.
///
/// Returns the number of bytes copied.
pub fn pipe<R: Read, W: Write>(source: &mut R, sink: &mut W) -> io::Result<u64> {
    let copied = io::copy(source, sink)?;
    sink.flush()?;
    Ok(copied)
}
