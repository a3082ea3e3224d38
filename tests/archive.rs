//! End-to-end decoding of archives written byte by byte.

use anyhow::{Context, Result};
use piexport::{ArchiveError, ArchiveLayout, DecodeStep, PiExport, SessionAssembler};
use std::path::Path;
use tempfile::TempDir;

fn field(text: &[u8], slot: usize) -> Vec<u8> {
    let mut bytes = text.to_vec();
    bytes.resize(slot, 0);
    bytes
}

fn record(name: &[u8], units: &[u8]) -> Vec<u8> {
    let mut bytes = field(name, 10);
    bytes.extend([0x11; 6]);
    bytes.extend(field(units, 6));
    bytes.extend([0x22; 12]);
    assert_eq!(bytes.len(), 34);
    bytes
}

fn channel_file(raw_interval: u32, samples: &[f32]) -> Vec<u8> {
    let mut bytes = vec![0x33; 4];
    bytes.extend(raw_interval.to_le_bytes());
    bytes.extend([0x44; 12]);
    for sample in samples {
        bytes.extend(sample.to_le_bytes());
    }
    bytes
}

fn write_archive(dir: &Path, header: &[u8], channels: &[Vec<u8>]) -> Result<()> {
    std::fs::write(dir.join("info.dat"), header)?;
    for (id, bytes) in channels.iter().enumerate() {
        std::fs::write(dir.join(format!("{:03}.dat", id)), bytes)?;
    }
    std::fs::write(dir.join("lap.dat"), "1:23.45\ngarbage\n0:58.07\n")?;

    let mut desc = vec![0x55; 8];
    desc.extend(field(b"Snetterton", 12));
    desc.extend(field(b"  J. Smith ", 12));
    std::fs::write(dir.join("desc.dat"), desc)?;
    Ok(())
}

fn two_channel_archive() -> Result<TempDir> {
    let dir = tempfile::tempdir().context("Creating archive directory")?;

    let mut header = 2i16.to_le_bytes().to_vec();
    header.extend(record(b"Speed", b"km/h"));
    header.extend(record(b"Oil", &[176, b'C']));

    write_archive(
        dir.path(),
        &header,
        &[channel_file(1000, &[10.0, 20.0, 30.0]), channel_file(10000, &[])],
    )?;
    Ok(dir)
}

#[test]
fn decodes_every_part_of_the_archive() -> Result<()> {
    let dir = two_channel_archive()?;
    let session = PiExport::open(dir.path())?;

    assert_eq!(session.track(), "Snetterton");
    assert_eq!(session.driver(), "J. Smith");
    assert_eq!(session.laps(), &[83_450, 0, 58_070]);
    assert_eq!(session.lap_markers(), vec![83_450, 83_450, 141_520]);

    assert_eq!(session.channel_count(), 2);
    let speed = session.channel("Speed").context("Speed channel")?;
    assert_eq!(speed.id(), 0);
    assert_eq!(speed.sample_interval(), 100);
    assert_eq!(speed.data(), &[10.0, 20.0, 30.0]);

    let oil = session.channel_by_id(1).context("channel 1")?;
    assert_eq!(oil.to_string(), "Oil (degC)");
    assert_eq!(oil.sample_interval(), 1000);
    assert!(oil.is_empty());
    Ok(())
}

#[test]
fn header_declaring_more_records_than_present_fails() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let mut header = 2i16.to_le_bytes().to_vec();
    header.extend(record(b"Speed", b"km/h"));
    write_archive(dir.path(), &header, &[channel_file(1000, &[1.0])])?;

    let err = PiExport::open(dir.path()).unwrap_err();
    assert!(matches!(err, ArchiveError::Format { step: DecodeStep::Header, .. }), "{err:?}");
    assert!(err.to_string().contains("info.dat"));
    Ok(())
}

#[test]
fn absent_channel_file_is_fatal() -> Result<()> {
    let dir = two_channel_archive()?;
    std::fs::remove_file(dir.path().join("001.dat"))?;

    let err = PiExport::open(dir.path()).unwrap_err();
    assert!(matches!(err, ArchiveError::MissingChannelFile { id: 1, .. }), "{err:?}");
    Ok(())
}

#[test]
fn missing_directory_is_an_io_error() {
    let err = PiExport::open("/nonexistent/imp/archive").unwrap_err();
    assert!(matches!(err, ArchiveError::File { .. }), "{err:?}");
    assert!(!err.is_format_error());
}

#[test]
fn layout_from_yaml_opens_renamed_archive() -> Result<()> {
    let dir = two_channel_archive()?;
    std::fs::rename(dir.path().join("desc.dat"), dir.path().join("descriptor.bin"))?;

    let layout = ArchiveLayout::from_yaml("descriptor_file: descriptor.bin\n")?;
    let session = PiExport::open_with_layout(dir.path(), layout)?;
    assert_eq!(session.track(), "Snetterton");
    Ok(())
}

#[tokio::test]
async fn async_open_matches_sync_open() -> Result<()> {
    let dir = two_channel_archive()?;
    let sync = PiExport::open(dir.path())?;
    let parallel = PiExport::open_async(dir.path()).await?;
    assert_eq!(sync, parallel);

    let assembled = SessionAssembler::new(dir.path(), ArchiveLayout::default())?
        .assemble_async()
        .await?;
    assert_eq!(assembled, sync);
    Ok(())
}
