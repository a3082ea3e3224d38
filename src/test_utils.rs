//! Test utilities for building synthetic IMP archives
//!
//! Real exports cannot be redistributed, so tests and benchmarks encode their
//! own archives with the same byte layouts the decoders read. Unidentified
//! byte ranges are filled with [`FILLER`] so that a decoder which reads them by
//! mistake produces visibly wrong values.

#![cfg(any(test, feature = "benchmark"))]

use std::io;
use std::path::Path;

/// Byte written into unidentified ranges.
pub const FILLER: u8 = 0xEE;

const NAME_SLOT: usize = 10;
const NAME_GAP: usize = 6;
const UNITS_SLOT: usize = 6;
const UNITS_GAP: usize = 12;
const SAMPLE_PREAMBLE: usize = 4;
const SAMPLE_TRAILER: usize = 12;
const DESCRIPTOR_PREAMBLE: usize = 8;
const DESCRIPTOR_SLOT: usize = 12;

/// One channel of a synthetic archive.
#[derive(Debug, Clone, PartialEq)]
pub struct TestChannel {
    pub name: String,
    pub units: String,
    pub raw_interval: u32,
    pub samples: Vec<f32>,
}

impl TestChannel {
    pub fn new(name: &str, units: &str, raw_interval: u32, samples: Vec<f32>) -> Self {
        Self { name: name.to_string(), units: units.to_string(), raw_interval, samples }
    }
}

/// A complete synthetic archive.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TestArchive {
    pub driver: String,
    pub track: String,
    pub lap_lines: Vec<String>,
    pub channels: Vec<TestChannel>,
}

impl TestArchive {
    /// Write every archive file into `dir` using the default file names.
    pub fn write_to(&self, dir: &Path) -> io::Result<()> {
        std::fs::write(dir.join("info.dat"), encode_header(&self.channels))?;
        for (id, channel) in self.channels.iter().enumerate() {
            std::fs::write(
                dir.join(format!("{:03}.dat", id)),
                encode_samples(channel.raw_interval, &channel.samples),
            )?;
        }
        std::fs::write(dir.join("lap.dat"), encode_laps(&self.lap_lines))?;
        std::fs::write(dir.join("desc.dat"), encode_descriptor(&self.track, &self.driver))?;
        Ok(())
    }
}

/// Text in a null-padded slot, truncated to leave room for the terminator.
pub fn encode_field(text: &str, slot: usize) -> Vec<u8> {
    let mut bytes: Vec<u8> = text.bytes().take(slot.saturating_sub(1)).collect();
    bytes.resize(slot, 0);
    bytes
}

/// Header file: `i16` count then one 34-byte record per channel.
pub fn encode_header(channels: &[TestChannel]) -> Vec<u8> {
    let count = i16::try_from(channels.len()).unwrap_or(i16::MAX);
    let mut bytes = count.to_le_bytes().to_vec();
    for channel in channels {
        bytes.extend(encode_field(&channel.name, NAME_SLOT));
        bytes.extend(std::iter::repeat_n(FILLER, NAME_GAP));
        bytes.extend(encode_field(&channel.units, UNITS_SLOT));
        bytes.extend(std::iter::repeat_n(FILLER, UNITS_GAP));
    }
    bytes
}

/// Channel file: 20-byte header with the raw interval at offset 4, then samples.
pub fn encode_samples(raw_interval: u32, samples: &[f32]) -> Vec<u8> {
    let mut bytes = vec![FILLER; SAMPLE_PREAMBLE];
    bytes.extend(raw_interval.to_le_bytes());
    bytes.extend(std::iter::repeat_n(FILLER, SAMPLE_TRAILER));
    for sample in samples {
        bytes.extend(sample.to_le_bytes());
    }
    bytes
}

/// Descriptor file: 8 unidentified bytes, track field, driver field.
pub fn encode_descriptor(track: &str, driver: &str) -> Vec<u8> {
    let mut bytes = vec![FILLER; DESCRIPTOR_PREAMBLE];
    bytes.extend(encode_field(track, DESCRIPTOR_SLOT));
    bytes.extend(encode_field(driver, DESCRIPTOR_SLOT));
    bytes
}

/// Lap file: one line per entry, newline terminated.
pub fn encode_laps(lines: &[String]) -> Vec<u8> {
    lines.iter().flat_map(|line| format!("{}\n", line).into_bytes()).collect()
}

/// Route `tracing` output to the test harness; honours `RUST_LOG`.
#[cfg(test)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
