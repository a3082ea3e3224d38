//! Session assembly from an archive directory
//!
//! [`SessionAssembler`] runs the decoders in a fixed order:
//!
//! ```text
//! Init -> HeaderRead -> ChannelsRead -> LapsRead -> DescRead -> Complete
//! ```
//!
//! Each file is opened, decoded completely and closed before the next step.
//! Any error aborts the whole assembly; there is no partially filled session.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use piexport::{ArchiveLayout, SessionAssembler};
//!
//! fn load() -> piexport::Result<()> {
//!     let session = SessionAssembler::new("exports/brands-q1", ArchiveLayout::default())?
//!         .assemble()?;
//!     for channel in session.channels() {
//!         println!("{}: {} samples", channel, channel.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Parallel channel decoding
//!
//! [`SessionAssembler::assemble_async`] decodes the channel files on tokio's
//! blocking pool. The catalog is read-only while the workers run, each worker
//! owns one channel file, and the first failure fails the assembly. The result
//! is identical to [`SessionAssembler::assemble`].

use super::format::{decode_descriptor, decode_header, decode_samples};
use super::laps::decode_laps;
use crate::{ArchiveError, ArchiveLayout, Channel, ChannelInfo, Result, SampleBlock, Session};
use futures::future::try_join_all;
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Progress of a session assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AssemblyStage {
    Init,
    HeaderRead,
    ChannelsRead,
    LapsRead,
    DescRead,
    Complete,
}

impl fmt::Display for AssemblyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssemblyStage::Init => "init",
            AssemblyStage::HeaderRead => "header read",
            AssemblyStage::ChannelsRead => "channels read",
            AssemblyStage::LapsRead => "laps read",
            AssemblyStage::DescRead => "descriptor read",
            AssemblyStage::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// Builds one [`Session`] from an IMP archive directory.
#[derive(Debug, Clone)]
pub struct SessionAssembler {
    root: PathBuf,
    layout: ArchiveLayout,
    stage: AssemblyStage,
}

impl SessionAssembler {
    /// Prepare an assembly of the archive at `root`.
    ///
    /// Fails only when the layout is invalid; the archive itself is not touched
    /// until [`assemble`](Self::assemble).
    pub fn new<P: AsRef<Path>>(root: P, layout: ArchiveLayout) -> Result<Self> {
        layout.validate()?;
        Ok(Self { root: root.as_ref().to_path_buf(), layout, stage: AssemblyStage::Init })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn layout(&self) -> &ArchiveLayout {
        &self.layout
    }

    pub fn stage(&self) -> AssemblyStage {
        self.stage
    }

    /// Decode the archive sequentially.
    pub fn assemble(mut self) -> Result<Session> {
        info!("Assembling IMP archive: {}", self.root.display());

        let catalog = read_header(&self.header_path())?;
        self.advance(AssemblyStage::HeaderRead);

        let mut channels = Vec::with_capacity(catalog.len());
        for info in catalog {
            let block = read_channel(&self.channel_path(info.id), info.id)?;
            channels.push(Channel::from_parts(info, block));
        }
        self.advance(AssemblyStage::ChannelsRead);

        self.finish(channels)
    }

    /// Decode the archive with the channel files read in parallel.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn assemble_async(mut self) -> Result<Session> {
        info!("Assembling IMP archive (parallel channels): {}", self.root.display());

        let header_path = self.header_path();
        let catalog = blocking(move || read_header(&header_path)).await?;
        self.advance(AssemblyStage::HeaderRead);

        let workers = catalog.iter().map(|info| {
            let path = self.channel_path(info.id);
            let id = info.id;
            blocking(move || read_channel(&path, id))
        });
        let blocks = try_join_all(workers).await?;

        let channels: Vec<Channel> = catalog
            .into_iter()
            .zip(blocks)
            .map(|(info, block)| Channel::from_parts(info, block))
            .collect();
        self.advance(AssemblyStage::ChannelsRead);

        let laps_path = self.root.join(&self.layout.laps_file);
        let laps = blocking(move || read_laps(&laps_path)).await?;
        self.advance(AssemblyStage::LapsRead);

        let descriptor_path = self.root.join(&self.layout.descriptor_file);
        let (track, driver) = blocking(move || read_descriptor(&descriptor_path)).await?;
        self.advance(AssemblyStage::DescRead);

        self.complete(driver, track, laps, channels)
    }

    /// Laps, descriptor and completion, shared by the sequential path.
    fn finish(mut self, channels: Vec<Channel>) -> Result<Session> {
        let laps = read_laps(&self.root.join(&self.layout.laps_file))?;
        self.advance(AssemblyStage::LapsRead);

        let (track, driver) = read_descriptor(&self.root.join(&self.layout.descriptor_file))?;
        self.advance(AssemblyStage::DescRead);

        self.complete(driver, track, laps, channels)
    }

    fn complete(
        mut self,
        driver: String,
        track: String,
        laps: Vec<u64>,
        channels: Vec<Channel>,
    ) -> Result<Session> {
        self.advance(AssemblyStage::Complete);
        info!(
            "Assembled session: driver={:?} track={:?} channels={} laps={}",
            driver,
            track,
            channels.len(),
            laps.len()
        );
        Ok(Session::new(driver, track, laps, channels))
    }

    fn advance(&mut self, next: AssemblyStage) {
        debug_assert!(next > self.stage, "assembly stages only move forward");
        debug!("Assembly stage: {} -> {}", self.stage, next);
        self.stage = next;
    }

    fn header_path(&self) -> PathBuf {
        self.root.join(&self.layout.header_file)
    }

    fn channel_path(&self, id: usize) -> PathBuf {
        self.root.join(self.layout.channel_file_name(id))
    }
}

/// Run a blocking decode step on tokio's blocking pool.
async fn blocking<T, F>(decode: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(decode)
        .await
        .map_err(|e| ArchiveError::Task { details: e.to_string() })?
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|e| ArchiveError::file_error(path, e))?;
    Ok(BufReader::new(file))
}

fn read_header(path: &Path) -> Result<Vec<ChannelInfo>> {
    let mut reader = open(path)?;
    let catalog = decode_header(&mut reader).map_err(|e| e.at_path(path))?;
    debug!("Read {} catalog entries from {}", catalog.len(), path.display());
    Ok(catalog)
}

fn read_channel(path: &Path, id: usize) -> Result<SampleBlock> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => {
            ArchiveError::MissingChannelFile { id, path: path.to_path_buf() }
        }
        _ => ArchiveError::file_error(path, e),
    })?;
    decode_samples(&mut BufReader::new(file), id).map_err(|e| e.at_path(path))
}

fn read_laps(path: &Path) -> Result<Vec<u64>> {
    let mut reader = open(path)?;
    decode_laps(&mut reader).map_err(|e| e.at_path(path))
}

fn read_descriptor(path: &Path) -> Result<(String, String)> {
    let mut reader = open(path)?;
    decode_descriptor(&mut reader).map_err(|e| e.at_path(path))
}
