//! Fixed-width, null-terminated text fields.
//!
//! A fixed field of `n` characters occupies `n + 1` bytes in a record: up to `n`
//! bytes of text followed by room for the terminator. The text stops at the
//! first null byte, but the whole `n + 1` byte slot is always consumed so the
//! fields after it stay aligned.

use crate::{ArchiveError, DecodeStep, Result};
use std::io::{self, Read};
use tracing::trace;

/// Extended-ASCII degree sign as written by the exporter
const DEGREE_SIGN: u8 = 176;
const DEGREE_TEXT: &str = "deg";

/// Read a fixed field of at most `max_len` characters, consuming `max_len + 1` bytes.
///
/// The degree sign (byte 176) decodes to `"deg"`; every other byte decodes to the
/// character with the same code point. The result is not trimmed.
///
/// Running out of input before `max_len + 1` bytes is a format error.
pub fn read_fixed_field<R: Read>(reader: &mut R, max_len: usize) -> Result<String> {
    let mut slot = vec![0u8; max_len + 1];
    reader.read_exact(&mut slot).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => ArchiveError::format(
            DecodeStep::FixedField,
            format!("source exhausted before {} field bytes", max_len + 1),
        ),
        _ => ArchiveError::from(e),
    })?;

    let text = decode_field(&slot[..max_len]);
    trace!("Decoded fixed field ({} bytes): {:?}", max_len + 1, text);
    Ok(text)
}

/// Decode field bytes up to the first null.
pub(crate) fn decode_field(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let mut text = String::with_capacity(end);
    for &byte in &bytes[..end] {
        match byte {
            DEGREE_SIGN => text.push_str(DEGREE_TEXT),
            other => text.push(char::from(other)),
        }
    }
    text
}
