use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tar_rs as tar;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

pub type ArchiveReader = tar::Archive<Box<dyn Read>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
}

/// Detects compression from the leading bytes of a stream without consuming them
pub fn detect_compression<R: BufRead>(reader: &mut R) -> Result<Compression> {
    let head = reader
        .fill_buf()
        .context("Failed to read magic bytes from archive")?;

    if head.starts_with(&GZIP_MAGIC) {
        Ok(Compression::Gzip)
    } else {
        Ok(Compression::None)
    }
}

/// Opens a tar archive (plain or gzipped) for sequential reading
pub fn open_archive(archive_path: &Path) -> Result<ArchiveReader> {
    let file = File::open(archive_path)
        .with_context(|| format!("Failed to open archive: {}", archive_path.display()))?;

    let mut reader = BufReader::new(file);
    let compression = detect_compression(&mut reader)?;
    log::debug!(
        "Opening {} as {:?} tar archive",
        archive_path.display(),
        compression
    );

    let stream: Box<dyn Read> = match compression {
        Compression::Gzip => Box::new(GzDecoder::new(reader)),
        Compression::None => Box::new(reader),
    };

    Ok(tar::Archive::new(stream))
}
