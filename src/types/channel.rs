//! Channel types for decoded telemetry streams.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalog entry for one channel, as declared in the archive header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInfo {
    /// Position of the record in the header, also the channel file number
    pub id: usize,
    /// Channel name, trimmed
    pub name: String,
    /// Unit abbreviation, trimmed
    pub units: String,
}

/// Sampling interval and samples decoded from one channel file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleBlock {
    /// Raw interval field divided by ten (observed: 1 Hz stores 10000)
    pub sample_interval: u32,
    /// Samples in acquisition order
    pub data: Vec<f32>,
}

/// One telemetry stream of a decoded session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    id: usize,
    name: String,
    units: String,
    sample_interval: u32,
    data: Vec<f32>,
}

impl Channel {
    /// Join a header catalog entry with the samples read from its channel file.
    pub fn from_parts(info: ChannelInfo, block: SampleBlock) -> Self {
        Self {
            id: info.id,
            name: info.name,
            units: info.units,
            sample_interval: block.sample_interval,
            data: block.data,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    /// Sampling interval as stored by the exporter, after the divide-by-ten.
    ///
    /// The unit is undocumented. Observed values are 1000 for 1 Hz and 100 for
    /// 10 Hz; callers that need a rate must bring their own interpretation.
    pub fn sample_interval(&self) -> u32 {
        self.sample_interval
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn throttle() -> Channel {
        Channel::from_parts(
            ChannelInfo { id: 4, name: "Throttle".to_string(), units: "%".to_string() },
            SampleBlock { sample_interval: 100, data: vec![0.0, 12.5, 99.0] },
        )
    }

    #[test]
    fn from_parts_keeps_header_and_sample_fields() {
        let channel = throttle();
        assert_eq!(channel.id(), 4);
        assert_eq!(channel.name(), "Throttle");
        assert_eq!(channel.units(), "%");
        assert_eq!(channel.sample_interval(), 100);
        assert_eq!(channel.data(), &[0.0, 12.5, 99.0]);
        assert_eq!(channel.len(), 3);
        assert!(!channel.is_empty());
    }

    #[test]
    fn display_shows_name_and_units() {
        assert_eq!(throttle().to_string(), "Throttle (%)");
    }

    #[test]
    fn empty_sample_block_is_valid() {
        let channel = Channel::from_parts(
            ChannelInfo { id: 0, name: "Gear".to_string(), units: String::new() },
            SampleBlock { sample_interval: 0, data: Vec::new() },
        );
        assert!(channel.is_empty());
        assert_eq!(channel.to_string(), "Gear ()");
    }
}
