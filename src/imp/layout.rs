//! Archive file naming.
//!
//! The exporter writes fixed file names; [`ArchiveLayout`] holds them so an
//! archive renamed by other tooling can still be opened. The default matches
//! the exporter.
//!
//! ```rust
//! use piexport::ArchiveLayout;
//!
//! let layout = ArchiveLayout::from_yaml("laps_file: laps.dat\n").unwrap();
//! assert_eq!(layout.laps_file, "laps.dat");
//! assert_eq!(layout.header_file, "info.dat");
//! assert_eq!(layout.channel_file_name(7), "007.dat");
//! ```

use crate::{ArchiveError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// File names of the parts of an IMP archive directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveLayout {
    /// Channel catalog
    pub header_file: String,
    /// Lap time text
    pub laps_file: String,
    /// Track and driver
    pub descriptor_file: String,
    /// Extension of per-channel sample files, without the dot
    pub channel_extension: String,
    /// Zero-padded width of the channel number in sample file names
    pub channel_id_width: usize,
}

impl Default for ArchiveLayout {
    fn default() -> Self {
        Self {
            header_file: "info.dat".to_string(),
            laps_file: "lap.dat".to_string(),
            descriptor_file: "desc.dat".to_string(),
            channel_extension: "dat".to_string(),
            channel_id_width: 3,
        }
    }
}

impl ArchiveLayout {
    /// Parse a layout from YAML; missing keys take their default.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let layout: Self = serde_yaml_ng::from_str(yaml)
            .map_err(|e| ArchiveError::layout(format!("invalid layout YAML: {}", e)))?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("header_file", &self.header_file),
            ("laps_file", &self.laps_file),
            ("descriptor_file", &self.descriptor_file),
        ] {
            if value.trim().is_empty() {
                return Err(ArchiveError::layout(format!("{} must not be empty", key)));
            }
        }

        if self.channel_id_width == 0 {
            return Err(ArchiveError::layout("channel_id_width must be at least 1"));
        }

        let names: HashSet<&str> =
            [self.header_file.as_str(), self.laps_file.as_str(), self.descriptor_file.as_str()]
                .into_iter()
                .collect();
        if names.len() != 3 {
            return Err(ArchiveError::layout("header, laps and descriptor files must differ"));
        }

        Ok(())
    }

    /// Sample file name for a channel id, e.g. `007.dat`.
    pub fn channel_file_name(&self, id: usize) -> String {
        let number = format!("{:0width$}", id, width = self.channel_id_width);
        if self.channel_extension.is_empty() {
            number
        } else {
            format!("{}.{}", number, self.channel_extension)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_exporter_names() {
        let layout = ArchiveLayout::default();
        layout.validate().unwrap();
        assert_eq!(layout.channel_file_name(0), "000.dat");
        assert_eq!(layout.channel_file_name(42), "042.dat");
        assert_eq!(layout.channel_file_name(1234), "1234.dat");
    }

    #[test]
    fn yaml_overrides_selected_fields() {
        let yaml = "channel_extension: bin\nchannel_id_width: 4\n";
        let layout = ArchiveLayout::from_yaml(yaml).unwrap();
        assert_eq!(layout.channel_file_name(5), "0005.bin");
        assert_eq!(layout.descriptor_file, "desc.dat");
    }

    #[test]
    fn extensionless_channel_files() {
        let layout = ArchiveLayout { channel_extension: String::new(), ..Default::default() };
        assert_eq!(layout.channel_file_name(9), "009");
    }

    #[test]
    fn invalid_layouts_are_rejected() {
        for yaml in [
            "header_file: ''\n",
            "channel_id_width: 0\n",
            "laps_file: info.dat\n",
            "channel_id_width: [1, 2]\n",
        ] {
            let err = ArchiveLayout::from_yaml(yaml).unwrap_err();
            assert!(matches!(err, ArchiveError::Layout { .. }), "{yaml:?} gave {err:?}");
        }
    }
}
