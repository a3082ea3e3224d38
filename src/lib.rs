//! Decoder for Pi Analysis IMP telemetry exports.
//!
//! Pi Analysis V6 exports a session as a directory of small binary and text
//! files. This crate reads such a directory into a [`Session`]: driver and
//! track names, lap times and every channel with its samples, ready to be
//! re-expressed in an open session format.
//!
//! # Features
//!
//! - **Exact layouts**: fixed byte offsets, null-terminated fixed fields, the
//!   degree-sign remapping and the observed interval scaling
//! - **All or nothing**: any I/O or format failure aborts the whole session and
//!   names the file and decode step that failed
//! - **Parallel channels**: optional tokio-based loader decodes channel files
//!   concurrently with identical results
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use piexport::PiExport;
//!
//! fn main() -> piexport::Result<()> {
//!     let session = PiExport::open("exports/brands-q1")?;
//!     println!("{} at {}", session.driver(), session.track());
//!     for (lap, marker) in session.laps().iter().zip(session.lap_markers()) {
//!         println!("lap {} ms, boundary at {} ms", lap, marker);
//!     }
//!     Ok(())
//! }
//! ```

// Core types and error handling
mod error;
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

// Archive decoding
pub mod imp;

// Core exports
pub use error::*;
pub use types::*;

// Archive exports
pub use imp::{ArchiveLayout, AssemblyStage, SessionAssembler};

use std::path::Path;

/// Entry point for reading IMP archives.
///
/// # Examples
///
/// ## Sequential
/// ```rust,no_run
/// use piexport::PiExport;
///
/// # fn main() -> piexport::Result<()> {
/// let session = PiExport::open("session-folder")?;
/// # Ok(())
/// # }
/// ```
///
/// ## Parallel channel decoding
/// ```rust,no_run
/// use piexport::PiExport;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> piexport::Result<()> {
///     let session = PiExport::open_async("session-folder").await?;
///     println!("{} channels", session.channel_count());
///     Ok(())
/// }
/// ```
pub struct PiExport;

impl PiExport {
    /// Read an archive directory with the default file names.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An archive file is missing or unreadable
    /// - A declared channel has no channel file
    /// - Any file is shorter than its layout requires
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Session> {
        SessionAssembler::new(root, ArchiveLayout::default())?.assemble()
    }

    /// Read an archive directory with custom file names.
    pub fn open_with_layout<P: AsRef<Path>>(root: P, layout: ArchiveLayout) -> Result<Session> {
        SessionAssembler::new(root, layout)?.assemble()
    }

    /// Read an archive directory, decoding channel files in parallel.
    ///
    /// Must be awaited within a tokio runtime.
    pub async fn open_async<P: AsRef<Path>>(root: P) -> Result<Session> {
        SessionAssembler::new(root, ArchiveLayout::default())?.assemble_async().await
    }
}
