// SPDX-License-Identifier: GPL-3.0-only

//! Raw btrfs ioctl interface.
//!
//! Request constants are spelled out with their `_IO*` derivations since we
//! do not generate them from kernel headers. Argument structs are the
//! fixed-size kernel UAPI layouts; sizes are asserted in tests.

use std::fs::File;
use std::io;
use std::mem::MaybeUninit;
use std::os::fd::AsRawFd;
use std::path::{Path, PathBuf};

use crate::error::{Result, SysError};

// linux/btrfs.h: BTRFS_IOC_FS_INFO = _IOR(0x94, 31, struct btrfs_ioctl_fs_info_args)
const BTRFS_IOC_FS_INFO: libc::c_ulong = 0x8400_941F;
// linux/btrfs.h: BTRFS_IOC_DEV_INFO = _IOWR(0x94, 30, struct btrfs_ioctl_dev_info_args)
const BTRFS_IOC_DEV_INFO: libc::c_ulong = 0xD000_941E;
// allocation-hint patchset: BTRFS_IOC_DEV_PROPERTIES = _IOWR(0x94, 64, struct btrfs_ioctl_dev_properties)
const BTRFS_IOC_DEV_PROPERTIES: libc::c_ulong = 0xC400_9440;
// linux/fs.h: FS_IOC_GETFSLABEL = _IOR(0x94, 49, char[FSLABEL_MAX])
const FS_IOC_GETFSLABEL: libc::c_ulong = 0x8100_9431;
// linux/fs.h: FS_IOC_SETFSLABEL = _IOW(0x94, 50, char[FSLABEL_MAX])
const FS_IOC_SETFSLABEL: libc::c_ulong = 0x4100_9432;

/// Maximum filesystem label length, including the terminating NUL.
pub const FSLABEL_MAX: usize = 256;

const BTRFS_FSID_SIZE: usize = 16;
const BTRFS_UUID_SIZE: usize = 16;
const BTRFS_DEVICE_PATH_NAME_MAX: usize = 1024;

/// Select the `type` field in a dev-properties call.
pub const DEV_PROPERTY_TYPE: u64 = 1 << 0;
/// Read (rather than write) the selected properties.
pub const DEV_PROPERTY_READ: u64 = 1 << 60;

#[repr(C)]
struct BtrfsIoctlFsInfoArgs {
    max_id: u64,
    num_devices: u64,
    fsid: [u8; BTRFS_FSID_SIZE],
    nodesize: u32,
    sectorsize: u32,
    clone_alignment: u32,
    csum_type: u16,
    csum_size: u16,
    flags: u64,
    generation: u64,
    metadata_uuid: [u8; BTRFS_FSID_SIZE],
    reserved: [u8; 944],
}

#[repr(C)]
struct BtrfsIoctlDevInfoArgs {
    devid: u64,
    uuid: [u8; BTRFS_UUID_SIZE],
    bytes_used: u64,
    total_bytes: u64,
    unused: [u64; 379],
    path: [u8; BTRFS_DEVICE_PATH_NAME_MAX],
}

#[repr(C)]
struct BtrfsIoctlDevProperties {
    devid: u64,
    properties: u64,
    type_field: u64,
    dev_group: u32,
    seek_speed: u8,
    bandwidth: u8,
    unused: [u8; 994], // pad to 1k
}

/// Filesystem-level facts from BTRFS_IOC_FS_INFO.
#[derive(Debug, Clone, Copy)]
pub struct FsInfo {
    /// Highest devid the filesystem has ever assigned; the id space below
    /// it may contain gaps for removed devices.
    pub max_id: u64,
    pub num_devices: u64,
}

/// Per-device facts from BTRFS_IOC_DEV_INFO.
#[derive(Debug, Clone)]
pub struct DevInfo {
    pub devid: u64,
    /// Device node path last recorded by the filesystem; `None` for a
    /// missing/detached device.
    pub path: Option<PathBuf>,
}

/// Per-device property bitfields from BTRFS_IOC_DEV_PROPERTIES.
#[derive(Debug, Clone, Copy)]
pub struct DevProperties {
    pub type_field: u64,
}

/// An open directory handle on a btrfs mount point.
///
/// All per-filesystem ioctls go through this handle, which ties every query
/// to one filesystem instance. The handle closes when the value drops, on
/// every exit path.
pub struct FsHandle {
    dir: File,
    path: PathBuf,
}

impl FsHandle {
    pub fn open(mount_point: &Path) -> Result<FsHandle> {
        let dir = File::open(mount_point).map_err(|source| SysError::OpenFailed {
            path: mount_point.to_path_buf(),
            source,
        })?;

        let meta = dir.metadata().map_err(|source| SysError::OpenFailed {
            path: mount_point.to_path_buf(),
            source,
        })?;
        if !meta.is_dir() {
            return Err(SysError::OpenFailed {
                path: mount_point.to_path_buf(),
                source: io::Error::from(io::ErrorKind::NotADirectory),
            });
        }

        Ok(FsHandle {
            dir,
            path: mount_point.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Query filesystem-level info. EPERM is surfaced distinctly so callers
    /// can suggest elevated privileges.
    pub fn fs_info(&self) -> Result<FsInfo> {
        let mut args: MaybeUninit<BtrfsIoctlFsInfoArgs> = MaybeUninit::zeroed();

        let ret = unsafe {
            libc::ioctl(self.dir.as_raw_fd(), BTRFS_IOC_FS_INFO, args.as_mut_ptr())
        };
        if ret < 0 {
            let err = io::Error::last_os_error();
            if err.raw_os_error() == Some(libc::EPERM) {
                return Err(SysError::PermissionDenied(self.path.clone()));
            }
            return Err(SysError::QueryFailed {
                path: self.path.clone(),
                source: err,
            });
        }

        let args = unsafe { args.assume_init() };
        Ok(FsInfo {
            max_id: args.max_id,
            num_devices: args.num_devices,
        })
    }

    /// Query one devid. `Ok(None)` means the id is a gap in the devid space
    /// (ENODEV), which is not an error.
    pub fn dev_info(&self, devid: u64) -> Result<Option<DevInfo>> {
        let mut args: MaybeUninit<BtrfsIoctlDevInfoArgs> = MaybeUninit::zeroed();
        unsafe {
            (*args.as_mut_ptr()).devid = devid;
        }

        let ret = unsafe {
            libc::ioctl(self.dir.as_raw_fd(), BTRFS_IOC_DEV_INFO, args.as_mut_ptr())
        };
        if ret < 0 {
            let err = io::Error::last_os_error();
            if err.raw_os_error() == Some(libc::ENODEV) {
                return Ok(None);
            }
            return Err(SysError::DeviceInfoFailed { devid, source: err });
        }

        let args = unsafe { args.assume_init() };
        Ok(Some(DevInfo {
            devid: args.devid,
            path: c_bytes_to_path(&args.path),
        }))
    }

    /// Read the selected property bitfields of one member device.
    pub fn dev_properties(&self, devid: u64) -> Result<DevProperties> {
        let mut args: MaybeUninit<BtrfsIoctlDevProperties> = MaybeUninit::zeroed();
        unsafe {
            let args = &mut *args.as_mut_ptr();
            args.devid = devid;
            args.properties = DEV_PROPERTY_TYPE | DEV_PROPERTY_READ;
        }

        let ret = unsafe {
            libc::ioctl(
                self.dir.as_raw_fd(),
                BTRFS_IOC_DEV_PROPERTIES,
                args.as_mut_ptr(),
            )
        };
        if ret < 0 {
            return Err(SysError::Io(io::Error::last_os_error()));
        }

        let args = unsafe { args.assume_init() };
        Ok(DevProperties {
            type_field: args.type_field,
        })
    }

    /// Write the type bitfield of one member device.
    pub fn set_dev_type(&self, devid: u64, type_field: u64) -> Result<()> {
        let mut args: MaybeUninit<BtrfsIoctlDevProperties> = MaybeUninit::zeroed();
        unsafe {
            let args = &mut *args.as_mut_ptr();
            args.devid = devid;
            args.properties = DEV_PROPERTY_TYPE;
            args.type_field = type_field;
        }

        let ret = unsafe {
            libc::ioctl(
                self.dir.as_raw_fd(),
                BTRFS_IOC_DEV_PROPERTIES,
                args.as_mut_ptr(),
            )
        };
        if ret < 0 {
            return Err(SysError::Io(io::Error::last_os_error()));
        }

        Ok(())
    }

    /// Read the filesystem label through the mount handle.
    pub fn label(&self) -> Result<String> {
        let mut buf = [0u8; FSLABEL_MAX];

        let ret = unsafe {
            libc::ioctl(self.dir.as_raw_fd(), FS_IOC_GETFSLABEL, buf.as_mut_ptr())
        };
        if ret < 0 {
            return Err(SysError::Io(io::Error::last_os_error()));
        }

        let len = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
        Ok(String::from_utf8_lossy(&buf[..len]).into_owned())
    }

    /// Write the filesystem label through the mount handle. The label must
    /// fit in `FSLABEL_MAX` including the terminating NUL.
    pub fn set_label(&self, label: &str) -> Result<()> {
        let bytes = label.as_bytes();
        if bytes.len() >= FSLABEL_MAX {
            return Err(SysError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("label is too long (max {} bytes)", FSLABEL_MAX - 1),
            )));
        }

        let mut buf = [0u8; FSLABEL_MAX];
        buf[..bytes.len()].copy_from_slice(bytes);

        let ret = unsafe {
            libc::ioctl(self.dir.as_raw_fd(), FS_IOC_SETFSLABEL, buf.as_ptr())
        };
        if ret < 0 {
            return Err(SysError::Io(io::Error::last_os_error()));
        }

        Ok(())
    }
}

fn c_bytes_to_path(bytes: &[u8]) -> Option<PathBuf> {
    let len = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    if len == 0 {
        return None;
    }
    Some(PathBuf::from(
        String::from_utf8_lossy(&bytes[..len]).into_owned(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arg_structs_match_kernel_sizes() {
        assert_eq!(std::mem::size_of::<BtrfsIoctlFsInfoArgs>(), 1024);
        assert_eq!(std::mem::size_of::<BtrfsIoctlDevInfoArgs>(), 4096);
        assert_eq!(std::mem::size_of::<BtrfsIoctlDevProperties>(), 1024);
    }

    #[test]
    fn device_paths_decode_from_c_buffers() {
        let mut buf = [0u8; 32];
        buf[..9].copy_from_slice(b"/dev/sda1");
        assert_eq!(c_bytes_to_path(&buf), Some(PathBuf::from("/dev/sda1")));

        // missing devices report an empty path
        assert_eq!(c_bytes_to_path(&[0u8; 32]), None);
    }
}
