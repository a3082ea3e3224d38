//! Error types for archive decoding.
//!
//! Every failure while reading an IMP archive is fatal to the assembly of the
//! session: there is no partial result and no retry. The error always names the
//! file that failed and, for format problems, the decode step that rejected it.
//!
//! ## Error Categories
//!
//! - **File Errors**: an archive file is missing, unreadable or permission-denied
//! - **Format Errors**: the bytes do not match the expected layout (short header,
//!   truncated record, partial sample, exhausted fixed field)
//! - **Missing Channel Files**: the header declares a channel whose sample file is absent
//! - **Layout Errors**: an invalid archive layout configuration
//!
//! Unparsable lap-time lines are not errors; they decode to a zero-length lap.
//!
//! ```rust
//! use piexport::{ArchiveError, DecodeStep};
//! use std::path::Path;
//!
//! let error = ArchiveError::format(DecodeStep::Header, "declared 2 channels, found 1")
//!     .at_path(Path::new("session/info.dat"));
//! assert!(error.is_format_error());
//! assert!(error.to_string().contains("info.dat"));
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for archive operations.
pub type Result<T, E = ArchiveError> = std::result::Result<T, E>;

/// Placeholder path used by decoders that read from an in-memory source.
pub const MEMORY_PATH: &str = "<memory>";

/// The decode step that was running when a format error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStep {
    FixedField,
    Header,
    Samples { channel: usize },
    Laps,
    Descriptor,
}

impl fmt::Display for DecodeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeStep::FixedField => f.write_str("fixed-field decode"),
            DecodeStep::Header => f.write_str("header block decode"),
            DecodeStep::Samples { channel } => write!(f, "sample block decode (channel {channel})"),
            DecodeStep::Laps => f.write_str("lap time decode"),
            DecodeStep::Descriptor => f.write_str("descriptor decode"),
        }
    }
}

/// Main error type for archive decoding.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ArchiveError {
    #[error("Archive file error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Format error in {path} during {step}: {details}")]
    Format { path: PathBuf, step: DecodeStep, details: String },

    #[error("Sample file for declared channel {id} not found: {path}")]
    MissingChannelFile { id: usize, path: PathBuf },

    #[error("Invalid archive layout: {details}")]
    Layout { details: String },

    #[error("Decode worker failed: {details}")]
    Task { details: String },
}

impl ArchiveError {
    /// Helper constructor for file errors with path context.
    pub fn file_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ArchiveError::File { path: path.into(), source }
    }

    /// Helper constructor for format errors raised by in-memory decoders.
    ///
    /// The path is `<memory>` until the assembler attaches the real file with
    /// [`ArchiveError::at_path`].
    pub fn format(step: DecodeStep, details: impl Into<String>) -> Self {
        ArchiveError::Format { path: PathBuf::from(MEMORY_PATH), step, details: details.into() }
    }

    /// Helper constructor for layout configuration errors.
    pub fn layout(details: impl Into<String>) -> Self {
        ArchiveError::Layout { details: details.into() }
    }

    /// Attach the archive file this error came from.
    ///
    /// Only errors that still carry the `<memory>` placeholder are rewritten, so an
    /// error that already names its file keeps it.
    pub fn at_path(self, file: &Path) -> Self {
        let placeholder = Path::new(MEMORY_PATH);
        match self {
            ArchiveError::File { path, source } if path.as_path() == placeholder => {
                ArchiveError::File { path: file.to_path_buf(), source }
            }
            ArchiveError::Format { path, step, details } if path.as_path() == placeholder => {
                ArchiveError::Format { path: file.to_path_buf(), step, details }
            }
            other => other,
        }
    }

    /// Report a fixed-field failure as part of the enclosing decode step.
    pub(crate) fn within(self, enclosing: DecodeStep) -> Self {
        match self {
            ArchiveError::Format { path, step: DecodeStep::FixedField, details } => {
                let details = format!("fixed field: {details}");
                ArchiveError::Format { path, step: enclosing, details }
            }
            other => other,
        }
    }

    /// Returns whether the archive bytes, rather than the filesystem, were at fault.
    pub fn is_format_error(&self) -> bool {
        matches!(self, ArchiveError::Format { .. } | ArchiveError::MissingChannelFile { .. })
    }

    /// The file this error refers to, when there is one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ArchiveError::File { path, .. }
            | ArchiveError::Format { path, .. }
            | ArchiveError::MissingChannelFile { path, .. } => Some(path.as_path()),
            ArchiveError::Layout { .. } | ArchiveError::Task { .. } => None,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            ArchiveError::File { .. } => vec![
                "Check the archive directory exists and is readable",
                "Check file permissions",
                "Verify the export contains info.dat, lap.dat and desc.dat",
            ],
            ArchiveError::Format { .. } => vec![
                "Re-export the session from Pi Analysis",
                "Verify the archive was copied completely",
                "Compare file sizes against the declared channel count",
            ],
            ArchiveError::MissingChannelFile { .. } => vec![
                "Verify every channel file listed in info.dat was exported",
                "Check the channel file naming in the archive layout",
            ],
            ArchiveError::Layout { .. } => vec![
                "Check the layout configuration for empty or duplicate file names",
                "Fall back to the default archive layout",
            ],
            ArchiveError::Task { .. } => vec![
                "Retry with the synchronous loader",
                "Check the runtime was not shut down during decoding",
            ],
        }
    }
}

// Reader errors default to the in-memory placeholder path
impl From<std::io::Error> for ArchiveError {
    fn from(err: std::io::Error) -> Self {
        ArchiveError::File { path: PathBuf::from(MEMORY_PATH), source: err }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
          #[test]
          fn format_messages_carry_their_context(
            details in ".*",
            channel in 0usize..1000usize,
            file in "[a-z]{1,8}\\.dat"
          ) {
            let error = ArchiveError::format(DecodeStep::Samples { channel }, details.clone())
                .at_path(Path::new(&file));
            let message = error.to_string();

            prop_assert!(message.contains(&details));
            prop_assert!(message.contains(&file));
            let needle = format!("channel {channel}");
            prop_assert!(message.contains(&needle));
            prop_assert!(error.is_format_error());
          }

          #[test]
          fn io_conversion_preserves_message(reason in ".*") {
            let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, reason.clone());
            let converted: ArchiveError = io_err.into();
            match converted {
              ArchiveError::File { source, path } => {
                prop_assert_eq!(source.to_string(), reason);
                prop_assert_eq!(path, PathBuf::from(MEMORY_PATH));
              }
              _ => prop_assert!(false, "Expected File error from io::Error conversion"),
            }
          }
        }
    }

    #[test]
    fn at_path_only_replaces_placeholder() {
        let error = ArchiveError::format(DecodeStep::Laps, "bad").at_path(Path::new("lap.dat"));
        assert_eq!(error.path(), Some(Path::new("lap.dat")));

        let error = error.at_path(Path::new("other.dat"));
        assert_eq!(error.path(), Some(Path::new("lap.dat")));
    }

    #[test]
    fn missing_channel_is_a_format_failure() {
        let error = ArchiveError::MissingChannelFile { id: 3, path: PathBuf::from("003.dat") };
        assert!(error.is_format_error());
        assert!(error.to_string().contains("channel 3"));

        let io = ArchiveError::file_error(
            "info.dat",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!io.is_format_error());
    }

    #[test]
    fn error_traits_validation() {
        fn assert_send_sync_static<T: Send + Sync + 'static>() {}
        assert_send_sync_static::<ArchiveError>();

        let error = ArchiveError::layout("empty header file name");
        let _: &dyn std::error::Error = &error;
        assert!(error.path().is_none());
    }

    #[test]
    fn recovery_suggestions_are_descriptive() {
        let errors = [
            ArchiveError::format(DecodeStep::Header, "short"),
            ArchiveError::layout("bad"),
            ArchiveError::Task { details: "panicked".to_string() },
        ];
        for error in &errors {
            let suggestions = error.recovery_suggestions();
            assert!(!suggestions.is_empty());
            for suggestion in suggestions {
                assert!(suggestion.len() > 5);
            }
        }
    }
}
