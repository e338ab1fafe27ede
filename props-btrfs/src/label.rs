// SPDX-License-Identifier: GPL-3.0-only

//! `label` — the filesystem label, readable through the mounted root or any
//! of the filesystem's member devices.

use std::path::Path;

use props_sys::FsHandle;
use props_types::ObjectType;

use crate::error::{PropError, Result};

pub(crate) fn handle(
    object_type: ObjectType,
    object: &Path,
    _name: &str,
    value: Option<&str>,
) -> Result<()> {
    // A device object names the filesystem indirectly; the label ioctls
    // want the mounted root.
    let mount_point = match object_type {
        ObjectType::Device => props_sys::btrfs_mount_of(object)?,
        _ => object.to_path_buf(),
    };
    let handle = FsHandle::open(&mount_point)?;

    match value {
        Some(value) => handle
            .set_label(value)
            .map_err(|e| PropError::Transport(format!("failed to set label: {e}"))),
        None => {
            let label = handle
                .label()
                .map_err(|e| PropError::Transport(format!("failed to get label: {e}")))?;
            println!("label={label}");
            Ok(())
        }
    }
}
