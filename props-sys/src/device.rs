// SPDX-License-Identifier: GPL-3.0-only

//! Device resolution: correlate an arbitrary block-device path with the
//! btrfs filesystem instance that owns it and its internal devid.
//!
//! Device paths are mutable symlinks/labels while the devid is the
//! filesystem's stable internal identity; major/minor comparison is the only
//! reliable correlation between the two.

use std::fs;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

use crate::error::{Result, SysError};
use crate::ioctl::{DevInfo, FsHandle, FsInfo};
use crate::mounts;

/// Seam over the per-filesystem queries the resolver needs; implemented by
/// [`FsHandle`] against the live ioctls and by synthetic enumerators in
/// tests.
pub trait DeviceEnumerator {
    fn fs_info(&self) -> Result<FsInfo>;
    /// `Ok(None)` marks a gap in the devid space.
    fn dev_info(&self, devid: u64) -> Result<Option<DevInfo>>;
    /// Device-node identity (st_rdev) of a device path.
    fn rdev_of(&self, path: &Path) -> Result<u64>;
}

impl DeviceEnumerator for FsHandle {
    fn fs_info(&self) -> Result<FsInfo> {
        FsHandle::fs_info(self)
    }

    fn dev_info(&self, devid: u64) -> Result<Option<DevInfo>> {
        FsHandle::dev_info(self, devid)
    }

    fn rdev_of(&self, path: &Path) -> Result<u64> {
        let meta = fs::metadata(path).map_err(|source| SysError::StatFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(meta.rdev())
    }
}

/// A device path resolved to its filesystem instance.
///
/// The open mount handle travels with the devid so that one dispatch call
/// resolves once and issues every subsequent ioctl through the same
/// filesystem instance.
pub struct ResolvedDevice {
    pub devid: u64,
    pub mount_point: PathBuf,
    pub handle: FsHandle,
}

/// Resolve a block-device path to the btrfs filesystem that owns it.
pub fn resolve_device(device_path: &Path) -> Result<ResolvedDevice> {
    let mount_point = mounts::btrfs_mount_of(device_path)?;
    let handle = FsHandle::open(&mount_point)?;

    let devid = find_devid(&handle, device_path)?;
    tracing::debug!(
        device = %device_path.display(),
        devid,
        mount_point = %mount_point.display(),
        "resolved device"
    );

    Ok(ResolvedDevice {
        devid,
        mount_point,
        handle,
    })
}

/// Scan the filesystem's devid space for the device with the same
/// major/minor identity as `device_path`. First match wins; the id space is
/// expected to hold at most one device per identity.
fn find_devid(fs: &impl DeviceEnumerator, device_path: &Path) -> Result<u64> {
    let target = fs.rdev_of(device_path)?;
    let info = fs.fs_info()?;

    for devid in 0..=info.max_id {
        let Some(dev) = fs.dev_info(devid)? else {
            // gap in the devid space (removed device)
            continue;
        };

        let Some(recorded_path) = dev.path else {
            // missing device, no node to compare against
            continue;
        };

        let rdev = fs.rdev_of(&recorded_path)?;
        if libc::major(rdev) == libc::major(target) && libc::minor(rdev) == libc::minor(target) {
            return Ok(dev.devid);
        }
    }

    Err(SysError::DeviceNotFound(device_path.to_path_buf()))
}
