//! IMP binary file layouts and decoders
//!
//! Decoders for the three binary files of an IMP archive. Several byte ranges
//! in every layout were never identified; they are skipped, not interpreted.
//!
//! ## Header file (`info.dat`)
//!
//! | Offset | Size | Contents |
//! |---|---|---|
//! | 0 | 2 | channel count, `i16` little-endian |
//! | 2 | 34 × count | channel records |
//!
//! Channel record (34 bytes): name field (10), unidentified (6), units field (6),
//! unidentified (12).
//!
//! ## Channel file (`NNN.dat`)
//!
//! | Offset | Size | Contents |
//! |---|---|---|
//! | 0 | 4 | unidentified |
//! | 4 | 4 | raw interval, `u32` little-endian |
//! | 8 | 12 | unidentified |
//! | 20 | 4 × samples | `f32` little-endian samples to end of file |
//!
//! ## Descriptor file (`desc.dat`)
//!
//! | Offset | Size | Contents |
//! |---|---|---|
//! | 0 | 8 | unidentified |
//! | 8 | 12 | track field |
//! | 20 | 12 | driver field |

use super::fixed_field::read_fixed_field;
use crate::{ArchiveError, ChannelInfo, DecodeStep, Result, SampleBlock};
use std::io::{self, Cursor, Read};
use tracing::{debug, trace};

// Header layout
const CHANNEL_COUNT_SIZE: usize = 2;
pub const CHANNEL_RECORD_SIZE: usize = 34;
const NAME_FIELD_LEN: usize = 9;
const NAME_GAP_SIZE: usize = 6;
const UNITS_FIELD_LEN: usize = 5;

// Channel file layout
pub const SAMPLE_HEADER_SIZE: usize = 20;
const INTERVAL_OFFSET: usize = 4;
pub const SAMPLE_SIZE: usize = 4;
/// Divisor applied to the raw interval field. Verified by observation only.
pub const INTERVAL_DIVISOR: u32 = 10;

// Descriptor layout
const DESCRIPTOR_SKIP_SIZE: usize = 8;
const DESCRIPTOR_FIELD_LEN: usize = 11;
pub const DESCRIPTOR_SIZE: usize = DESCRIPTOR_SKIP_SIZE + 2 * (DESCRIPTOR_FIELD_LEN + 1);

/// Decode the channel catalog from a header file.
///
/// Returns one [`ChannelInfo`] per declared record, with `id` equal to the
/// record index. A file that ends before every declared record is complete is
/// a format error; trailing bytes after the last record are ignored.
pub fn decode_header<R: Read>(reader: &mut R) -> Result<Vec<ChannelInfo>> {
    let mut count_bytes = [0u8; CHANNEL_COUNT_SIZE];
    read_exact_or_format(reader, &mut count_bytes, DecodeStep::Header, || {
        "file too short for channel count".to_string()
    })?;

    let declared = i16::from_le_bytes(count_bytes);
    let count = usize::try_from(declared).map_err(|_| {
        ArchiveError::format(DecodeStep::Header, format!("negative channel count {}", declared))
    })?;
    debug!("Header declares {} channels", count);

    let mut channels = Vec::with_capacity(count);
    let mut record = [0u8; CHANNEL_RECORD_SIZE];
    for id in 0..count {
        read_exact_or_format(reader, &mut record, DecodeStep::Header, || {
            format!(
                "declared {} channels but record {} is incomplete ({} bytes per record)",
                count, id, CHANNEL_RECORD_SIZE
            )
        })?;

        let info = parse_channel_record(id, &record)?;
        trace!("Channel {}: name={:?} units={:?}", id, info.name, info.units);
        channels.push(info);
    }

    Ok(channels)
}

fn parse_channel_record(id: usize, record: &[u8; CHANNEL_RECORD_SIZE]) -> Result<ChannelInfo> {
    let mut cursor = Cursor::new(&record[..]);
    let name =
        read_fixed_field(&mut cursor, NAME_FIELD_LEN).map_err(|e| e.within(DecodeStep::Header))?;
    cursor.set_position((NAME_FIELD_LEN + 1 + NAME_GAP_SIZE) as u64);
    let units =
        read_fixed_field(&mut cursor, UNITS_FIELD_LEN).map_err(|e| e.within(DecodeStep::Header))?;

    Ok(ChannelInfo { id, name: trim_ascii(&name), units: trim_ascii(&units) })
}

/// Decode one channel file into its interval and samples.
///
/// The sample count follows from the file size alone. A file shorter than the
/// 20-byte header, or whose sample region is not a whole number of samples, is
/// a format error. An empty sample region is valid.
pub fn decode_samples<R: Read>(reader: &mut R, channel: usize) -> Result<SampleBlock> {
    let step = DecodeStep::Samples { channel };

    let mut header = [0u8; SAMPLE_HEADER_SIZE];
    read_exact_or_format(reader, &mut header, step, || {
        format!("file shorter than the {}-byte sample header", SAMPLE_HEADER_SIZE)
    })?;

    let raw_interval = parse_u32_le(&header, INTERVAL_OFFSET);
    // 1 Hz is stored as 10000; the divisor is kept exactly as observed
    let sample_interval = raw_interval / INTERVAL_DIVISOR;

    let mut body = Vec::new();
    reader.read_to_end(&mut body)?;
    if body.len() % SAMPLE_SIZE != 0 {
        return Err(ArchiveError::format(
            step,
            format!(
                "sample region of {} bytes ends with a partial {}-byte sample",
                body.len(),
                SAMPLE_SIZE
            ),
        ));
    }

    let data: Vec<f32> = body
        .chunks_exact(SAMPLE_SIZE)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();

    debug!(
        "Channel {}: raw interval {} -> {}, {} samples",
        channel,
        raw_interval,
        sample_interval,
        data.len()
    );

    Ok(SampleBlock { sample_interval, data })
}

/// Decode `(track, driver)` from a descriptor file, both trimmed.
pub fn decode_descriptor<R: Read>(reader: &mut R) -> Result<(String, String)> {
    let mut skipped = [0u8; DESCRIPTOR_SKIP_SIZE];
    read_exact_or_format(reader, &mut skipped, DecodeStep::Descriptor, || {
        format!("file shorter than the {}-byte preamble", DESCRIPTOR_SKIP_SIZE)
    })?;

    let track = read_fixed_field(reader, DESCRIPTOR_FIELD_LEN)
        .map_err(|e| e.within(DecodeStep::Descriptor))?;
    let driver = read_fixed_field(reader, DESCRIPTOR_FIELD_LEN)
        .map_err(|e| e.within(DecodeStep::Descriptor))?;

    Ok((trim_ascii(&track), trim_ascii(&driver)))
}

/// Strip ASCII whitespace only; Latin-1 bytes such as 0xA0 survive as text.
fn trim_ascii(field: &str) -> String {
    field.trim_matches(|c: char| c.is_ascii_whitespace()).to_string()
}

/// `read_exact` that reports a short source as a format error for `step`.
fn read_exact_or_format<R, F>(
    reader: &mut R,
    buf: &mut [u8],
    step: DecodeStep,
    details: F,
) -> Result<()>
where
    R: Read,
    F: FnOnce() -> String,
{
    reader.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => ArchiveError::format(step, details()),
        _ => ArchiveError::from(e),
    })
}

/// Callers guarantee `offset + 4 <= data.len()`
fn parse_u32_le(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
}
