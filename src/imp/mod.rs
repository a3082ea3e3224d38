//! IMP archive reading (Pi Analysis V6 export)
//!
//! An IMP archive is a directory of files written by the exporter:
//!
//! 1. **Header** (`info.dat`) - channel count and a 34-byte record per channel
//! 2. **Channel files** (`000.dat`, `001.dat`, ...) - interval and `f32` samples
//! 3. **Lap times** (`lap.dat`) - one `M:SS.hh` line per lap
//! 4. **Descriptor** (`desc.dat`) - track and driver names
//!
//! The format is undocumented. Layouts were recovered from exported files and
//! some byte ranges are still unidentified; they are skipped, never decoded.

pub mod fixed_field;
pub mod format;
pub mod laps;
pub mod layout;
pub mod reader;

pub use layout::ArchiveLayout;
pub use reader::{AssemblyStage, SessionAssembler};
