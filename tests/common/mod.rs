//! Fixture archive shared by the test binaries

use anyhow::Result;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use tar_rs::{Builder, EntryType, Header};

/// 2024-01-26 08:30:12 UTC
pub const FIXTURE_MTIME: u64 = 1_706_257_812;

/// Lines the fixture archive is expected to produce, in archive order.
pub const FIXTURE_MANIFEST: &[&str] = &[
    "drwxr-xr-x root/root          0 2024-01-26 08:30:12 etc/",
    "-rw-r--r-- root/root         12 2024-01-26 08:30:12 etc/hostname",
    "drwxr-xr-x root/root          0 2024-01-26 08:30:12 bin/",
    "-rwxr-xr-x root/root          5 2024-01-26 08:30:12 bin/busybox",
    "lrwxrwxrwx root/root          0 2024-01-26 08:30:12 bin/sh -> /bin/busybox",
    "hrwxr-xr-x root/root          0 2024-01-26 08:30:12 bin/ls link to bin/busybox",
    "crw-rw-rw- root/root        1,3 2024-01-26 08:30:12 dev/null",
    "drwxrwxrwt 0/0          0 2024-01-26 08:30:12 tmp/",
];

fn header(entry_type: EntryType, mode: u32, size: u64) -> Header {
    let mut header = Header::new_gnu();
    header.set_entry_type(entry_type);
    header.set_mode(mode);
    header.set_size(size);
    header.set_uid(0);
    header.set_gid(0);
    header.set_mtime(FIXTURE_MTIME);
    header
}

fn owned_by_root(mut header: Header) -> Result<Header> {
    header.set_username("root")?;
    header.set_groupname("root")?;
    Ok(header)
}

/// Writes the rootfs fixture as a plain tar stream into `writer`.
pub fn write_fixture<W: Write>(writer: W) -> Result<W> {
    let mut builder = Builder::new(writer);

    let mut etc = owned_by_root(header(EntryType::Directory, 0o755, 0))?;
    builder.append_data(&mut etc, "etc/", io::empty())?;

    let hostname = b"alpine-host\n";
    let mut file = owned_by_root(header(EntryType::Regular, 0o644, hostname.len() as u64))?;
    builder.append_data(&mut file, "etc/hostname", &hostname[..])?;

    let mut bin = owned_by_root(header(EntryType::Directory, 0o755, 0))?;
    builder.append_data(&mut bin, "bin/", io::empty())?;

    let busybox = b"#!bb\n";
    let mut exe = owned_by_root(header(EntryType::Regular, 0o755, busybox.len() as u64))?;
    builder.append_data(&mut exe, "bin/busybox", &busybox[..])?;

    let mut symlink = owned_by_root(header(EntryType::Symlink, 0o777, 0))?;
    symlink.set_link_name("/bin/busybox")?;
    builder.append_data(&mut symlink, "bin/sh", io::empty())?;

    let mut hardlink = owned_by_root(header(EntryType::Link, 0o755, 0))?;
    hardlink.set_link_name("bin/busybox")?;
    builder.append_data(&mut hardlink, "bin/ls", io::empty())?;

    let mut device = owned_by_root(header(EntryType::Char, 0o666, 0))?;
    device.set_device_major(1)?;
    device.set_device_minor(3)?;
    builder.append_data(&mut device, "dev/null", io::empty())?;

    // No user or group names: numeric ids are listed instead
    let mut tmp = header(EntryType::Directory, 0o1777, 0);
    builder.append_data(&mut tmp, "tmp/", io::empty())?;

    Ok(builder.into_inner()?)
}

/// Creates the rootfs fixture archive at `path`.
pub fn create_fixture_archive(path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_fixture(file)?.flush()?;
    Ok(())
}
