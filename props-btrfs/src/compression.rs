// SPDX-License-Identifier: GPL-3.0-only

//! `compression` — per-inode compression, stored as the `btrfs.compression`
//! extended attribute.

use std::fs::{File, OpenOptions};
use std::path::Path;

use props_sys::{get_xattr, set_xattr};
use props_types::ObjectType;

use crate::error::{PropError, Result};

const XATTR_BTRFS_PREFIX: &str = "btrfs.";

pub(crate) fn handle(
    _object_type: ObjectType,
    object: &Path,
    name: &str,
    value: Option<&str>,
) -> Result<()> {
    let xattr_name = format!("{XATTR_BTRFS_PREFIX}{name}");
    let file = open_object(object, value.is_some())?;

    match value {
        Some(value) => {
            set_xattr(&file, &xattr_name, normalize_value(value).as_bytes()).map_err(|e| {
                PropError::Transport(format!(
                    "failed to set {name} for {}: {e}",
                    object.display()
                ))
            })
        }
        None => {
            let current = get_xattr(&file, &xattr_name).map_err(|e| {
                PropError::Transport(format!(
                    "failed to get {name} for {}: {e}",
                    object.display()
                ))
            })?;

            // Absent attribute: success with no output.
            if let Some(bytes) = current {
                println!("{name}={}", String::from_utf8_lossy(&bytes));
            }
            Ok(())
        }
    }
}

/// Open the object file or directory; the handle closes on every exit path.
/// Directories are always opened read-only (xattr writes do not need a
/// writable fd and O_RDWR on a directory is refused by the kernel).
fn open_object(object: &Path, for_write: bool) -> Result<File> {
    let is_dir = object.is_dir();
    let result = if for_write && !is_dir {
        OpenOptions::new().read(true).write(true).open(object)
    } else {
        File::open(object)
    };

    result.map_err(|source| {
        PropError::Sys(props_sys::SysError::OpenFailed {
            path: object.to_path_buf(),
            source,
        })
    })
}

/// `no` and `none` are synonyms for clearing compression; the attribute is
/// written with an empty value, not removed.
fn normalize_value(value: &str) -> &str {
    match value {
        "no" | "none" => "",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_and_none_clear_instead_of_remove() {
        assert_eq!(normalize_value("no"), "");
        assert_eq!(normalize_value("none"), "");
    }

    #[test]
    fn other_values_pass_through_verbatim() {
        assert_eq!(normalize_value("zstd"), "zstd");
        assert_eq!(normalize_value("zstd:3"), "zstd:3");
        // only the exact lowercase literals are synonyms
        assert_eq!(normalize_value("None"), "None");
        assert_eq!(normalize_value("NO"), "NO");
    }

    #[test]
    fn xattr_name_gets_the_btrfs_prefix() {
        assert_eq!(
            format!("{XATTR_BTRFS_PREFIX}compression"),
            "btrfs.compression"
        );
    }
}
