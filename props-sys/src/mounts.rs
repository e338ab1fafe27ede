// SPDX-License-Identifier: GPL-3.0-only

use std::ffi::OsStr;
use std::fs;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

use crate::error::{Result, SysError};

/// One btrfs row of `/proc/self/mountinfo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountEntry {
    pub source: PathBuf,
    pub mount_point: PathBuf,
}

/// Find the mount point of the btrfs filesystem the given block device
/// belongs to.
///
/// Device paths are matched by device-node identity (major/minor), not by
/// string comparison: the mount table may name the device through a
/// different symlink than the caller did.
pub fn btrfs_mount_of(device_path: &Path) -> Result<PathBuf> {
    let target = fs::metadata(device_path).map_err(|source| SysError::StatFailed {
        path: device_path.to_path_buf(),
        source,
    })?;

    let mount_info = fs::read_to_string("/proc/self/mountinfo")?;

    for entry in parse_btrfs_mounts(&mount_info) {
        // Sources that have vanished since the table was read are skipped,
        // not fatal.
        let Ok(source_meta) = fs::metadata(&entry.source) else {
            continue;
        };

        if source_meta.rdev() == target.rdev() {
            tracing::debug!(
                device = %device_path.display(),
                mount_point = %entry.mount_point.display(),
                "matched device to btrfs mount"
            );
            return Ok(entry.mount_point);
        }
    }

    Err(SysError::NotMounted(device_path.to_path_buf()))
}

/// Extract the btrfs entries from mountinfo text as (source, mount point)
/// pairs. Malformed lines are skipped.
pub fn parse_btrfs_mounts(input: &str) -> Vec<MountEntry> {
    let mut entries = Vec::new();

    for line in input.lines().filter(|line| !line.trim().is_empty()) {
        let Some((left, right)) = line.split_once(" - ") else {
            continue;
        };

        let Some(mount_point) = left.split_whitespace().nth(4) else {
            continue;
        };

        let mut right_fields = right.split_whitespace();
        let Some(fs_type) = right_fields.next() else {
            continue;
        };
        let Some(source) = right_fields.next() else {
            continue;
        };

        if fs_type != "btrfs" {
            continue;
        }

        entries.push(MountEntry {
            source: decode_mount_field(source),
            mount_point: decode_mount_field(mount_point),
        });
    }

    entries
}

/// Mountinfo escapes space, tab, newline, and backslash as `\NNN` octal
/// sequences. Decode into raw bytes and carry them as an `OsStr`, so paths
/// that are not valid UTF-8 survive the trip.
fn decode_mount_field(field: &str) -> PathBuf {
    let mut bytes = Vec::with_capacity(field.len());
    let mut rest = field.as_bytes();

    while let Some(pos) = rest.iter().position(|&b| b == b'\\') {
        bytes.extend_from_slice(&rest[..pos]);
        let tail = &rest[pos..];
        match tail.get(1..4).and_then(decode_octal) {
            Some(decoded) => {
                bytes.push(decoded);
                rest = &tail[4..];
            }
            None => {
                // not an escape; keep the backslash as-is
                bytes.push(b'\\');
                rest = &tail[1..];
            }
        }
    }
    bytes.extend_from_slice(rest);

    PathBuf::from(OsStr::from_bytes(&bytes))
}

fn decode_octal(digits: &[u8]) -> Option<u8> {
    u8::from_str_radix(std::str::from_utf8(digits).ok()?, 8).ok()
}
