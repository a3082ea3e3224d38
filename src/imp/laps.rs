//! Lap time text file (`lap.dat`)
//!
//! One lap per line, written as `M:SS.hh`. Any single character may stand
//! between seconds and fraction. Lines are matched leniently: a line
//! that does not contain a lap time decodes to a zero-length lap instead of
//! failing the archive, so the lap count always equals the line count.

use crate::Result;
use regex::Regex;
use std::io::Read;
use std::sync::LazyLock;
use tracing::{debug, warn};

const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_SECOND: u64 = 1_000;
/// Multiplier for the fractional group. Treats it as hundredths; verified by observation only.
pub const FRACTION_SCALE: u64 = 10;

static LAP_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+):(\d+).(\d+)").expect("lap time pattern is valid")
});

/// Parse one lap time line into milliseconds, or `None` when it does not match.
///
/// ```rust
/// use piexport::imp::laps::parse_lap_time;
///
/// assert_eq!(parse_lap_time("1:23.45"), Some(83_450));
/// assert_eq!(parse_lap_time("garbage"), None);
/// ```
pub fn parse_lap_time(line: &str) -> Option<u64> {
    let captures = LAP_TIME.captures(line)?;
    let group = |i: usize| captures.get(i)?.as_str().parse::<u64>().ok();

    let minutes = group(1)?;
    let seconds = group(2)?;
    let fraction = group(3)?;

    minutes
        .checked_mul(MS_PER_MINUTE)?
        .checked_add(seconds.checked_mul(MS_PER_SECOND)?)?
        .checked_add(fraction.checked_mul(FRACTION_SCALE)?)
}

/// Lap time of one line, with unparsable lines counted as zero.
pub fn decode_lap_time(line: &str) -> u64 {
    parse_lap_time(line).unwrap_or_else(|| {
        warn!("Unparsable lap time {:?}, recording a zero-length lap", line);
        0
    })
}

/// Decode every line of a lap time file, in file order.
///
/// The text is decoded lossily so stray non-UTF-8 bytes only affect their own
/// line. Only I/O failures are errors.
pub fn decode_laps<R: Read>(reader: &mut R) -> Result<Vec<u64>> {
    let mut raw = Vec::new();
    reader.read_to_end(&mut raw)?;
    let text = String::from_utf8_lossy(&raw);

    let laps: Vec<u64> = text.lines().map(|line| decode_lap_time(line.trim())).collect();
    debug!("Decoded {} lap times", laps.len());
    Ok(laps)
}
