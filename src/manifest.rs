//! Structured listing of an archive's entries and the text manifest built from it.
//!
//! [`ArchiveListing`] walks a tar archive lazily and yields one [`ManifestEntry`] per
//! member, in archive order. Formatting lives in the [`std::fmt::Display`] impl of
//! [`ManifestEntry`], one line per entry:
//!
//! ```text
//! drwxr-xr-x root/root          0 2024-01-26 08:30:12 etc/
//! -rw-r--r-- root/root        682 2024-01-26 08:30:12 etc/group
//! lrwxrwxrwx root/root          0 2024-01-26 08:30:12 bin/sh -> /bin/busybox
//! ```
//!
//! [`write_manifest`] ties the two together and writes the manifest file.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tar_rs as tar;

use crate::archive::{self, ArchiveReader};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const UNKNOWN_TIMESTAMP: &str = "????-??-?? ??:??:??";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    HardLink,
    CharDevice,
    BlockDevice,
    Fifo,
    Other,
}

impl EntryKind {
    fn from_entry_type(entry_type: tar::EntryType) -> Self {
        match entry_type {
            tar::EntryType::Regular | tar::EntryType::Continuous => EntryKind::File,
            tar::EntryType::Directory => EntryKind::Directory,
            tar::EntryType::Symlink => EntryKind::Symlink,
            tar::EntryType::Link => EntryKind::HardLink,
            tar::EntryType::Char => EntryKind::CharDevice,
            tar::EntryType::Block => EntryKind::BlockDevice,
            tar::EntryType::Fifo => EntryKind::Fifo,
            _ => EntryKind::Other,
        }
    }

    fn type_char(self) -> char {
        match self {
            EntryKind::File => '-',
            EntryKind::Directory => 'd',
            EntryKind::Symlink => 'l',
            EntryKind::HardLink => 'h',
            EntryKind::CharDevice => 'c',
            EntryKind::BlockDevice => 'b',
            EntryKind::Fifo => 'p',
            EntryKind::Other => '?',
        }
    }
}

/// Metadata of a single archive member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub kind: EntryKind,
    /// Permission bits including setuid/setgid/sticky (`0o7777` mask).
    pub mode: u32,
    pub owner: String,
    pub group: String,
    pub size: u64,
    /// `(major, minor)` for character and block devices.
    pub device: Option<(u32, u32)>,
    pub modified: Option<DateTime<Utc>>,
    /// Member path without a trailing slash.
    pub path: String,
    pub link_target: Option<String>,
}

impl ManifestEntry {
    pub fn from_tar_entry<R: Read>(entry: &tar::Entry<'_, R>) -> Result<Self> {
        let header = entry.header();
        let kind = EntryKind::from_entry_type(header.entry_type());

        let path = entry.path().context("Failed to get entry path")?;
        let path = path.to_string_lossy();
        let path = match path.trim_end_matches('/') {
            "" => path.to_string(),
            trimmed => trimmed.to_string(),
        };

        let mode = header.mode().context("Failed to read entry mode")? & 0o7777;

        let owner = match header.username().ok().flatten() {
            Some(name) if !name.is_empty() => name.to_string(),
            // Unset or garbled numeric ids read as 0
            _ => header.uid().unwrap_or(0).to_string(),
        };
        let group = match header.groupname().ok().flatten() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => header.gid().unwrap_or(0).to_string(),
        };

        let device = match kind {
            EntryKind::CharDevice | EntryKind::BlockDevice => {
                let major = header.device_major().ok().flatten().unwrap_or(0);
                let minor = header.device_minor().ok().flatten().unwrap_or(0);
                Some((major, minor))
            }
            _ => None,
        };

        let modified = header
            .mtime()
            .ok()
            .and_then(|secs| i64::try_from(secs).ok())
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));

        let link_target = entry
            .link_name()
            .context("Failed to get entry link name")?
            .map(|target| target.to_string_lossy().to_string());

        Ok(Self {
            kind,
            mode,
            owner,
            group,
            size: entry.size(),
            device,
            modified,
            path,
            link_target,
        })
    }

    /// `ls -l` style mode column, e.g. `drwxr-xr-x` or `-rwsr-xr-x`.
    pub fn mode_string(&self) -> String {
        let mut out = String::with_capacity(10);
        out.push(self.kind.type_char());

        for (shift, special_bit, special_char) in
            [(6, 0o4000, 's'), (3, 0o2000, 's'), (0, 0o1000, 't')]
        {
            let bits = (self.mode >> shift) & 0o7;
            out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
            out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
            out.push(match (self.mode & special_bit != 0, bits & 0o1 != 0) {
                (true, true) => special_char,
                (true, false) => special_char.to_ascii_uppercase(),
                (false, true) => 'x',
                (false, false) => '-',
            });
        }

        out
    }
}

impl fmt::Display for ManifestEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}/{} ", self.mode_string(), self.owner, self.group)?;

        match self.device {
            Some((major, minor)) => write!(f, "{:>10} ", format!("{},{}", major, minor))?,
            None => write!(f, "{:>10} ", self.size)?,
        }

        match self.modified {
            Some(modified) => write!(f, "{} ", modified.format(TIMESTAMP_FORMAT))?,
            None => write!(f, "{} ", UNKNOWN_TIMESTAMP)?,
        }

        f.write_str(&self.path)?;
        if self.kind == EntryKind::Directory && !self.path.ends_with('/') {
            f.write_str("/")?;
        }

        match (self.kind, &self.link_target) {
            (EntryKind::Symlink, Some(target)) => write!(f, " -> {}", target),
            (EntryKind::HardLink, Some(target)) => write!(f, " link to {}", target),
            _ => Ok(()),
        }
    }
}

/// An archive opened for listing.
pub struct ArchiveListing {
    path: PathBuf,
    archive: ArchiveReader,
}

impl ArchiveListing {
    pub fn open<P: AsRef<Path>>(archive_path: P) -> Result<Self> {
        let path = archive_path.as_ref().to_path_buf();
        let archive = archive::open_archive(&path)?;
        Ok(Self { path, archive })
    }

    /// Lazily yields the archive's entries in archive order.
    ///
    /// Each record is produced from the member's header only; file contents are skipped.
    /// PAX global headers describe the archive rather than a member and are not listed.
    pub fn entries(&mut self) -> Result<impl Iterator<Item = Result<ManifestEntry>> + '_> {
        let path = &self.path;
        let entries = self
            .archive
            .entries()
            .with_context(|| format!("Failed to read entries of {}", path.display()))?;

        Ok(entries.filter_map(move |entry| {
            let entry = match entry
                .with_context(|| format!("Failed to read tar entry from {}", path.display()))
            {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e)),
            };
            if entry.header().entry_type().is_pax_global_extensions() {
                return None;
            }
            Some(ManifestEntry::from_tar_entry(&entry))
        }))
    }
}

/// Writes one formatted line per entry of `listing` to `writer`, returning the entry count
pub fn write_listing<W: Write>(listing: &mut ArchiveListing, writer: &mut W) -> Result<usize> {
    let mut count = 0;
    for entry in listing.entries()? {
        let entry = entry?;
        writeln!(writer, "{}", entry).context("Failed to write manifest line")?;
        count += 1;
    }
    Ok(count)
}

/// Lists `archive_path` into a newly created `manifest_path`.
///
/// The archive is opened before the manifest file is created, so a missing archive
/// leaves no manifest behind. Returns the number of entries written.
pub fn write_manifest(archive_path: &Path, manifest_path: &Path) -> Result<usize> {
    let mut listing = ArchiveListing::open(archive_path)?;

    let file = File::create(manifest_path)
        .with_context(|| format!("Failed to create manifest: {}", manifest_path.display()))?;
    let mut writer = BufWriter::new(file);

    let count = write_listing(&mut listing, &mut writer)
        .with_context(|| format!("Failed to list archive: {}", archive_path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to write manifest: {}", manifest_path.display()))?;

    log::debug!(
        "Wrote {} entries from {} to {}",
        count,
        archive_path.display(),
        manifest_path.display()
    );
    Ok(count)
}
