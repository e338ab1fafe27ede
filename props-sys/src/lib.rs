// SPDX-License-Identifier: GPL-3.0-only

//! Low-level system operations for btrfs property management
//!
//! This crate provides the direct system call interfaces the property layer
//! dispatches into:
//! - btrfs ioctl wrappers (filesystem info, per-device info and properties,
//!   filesystem label)
//! - extended-attribute primitives
//! - mount discovery for block devices
//! - the device resolver correlating a device path with its devid
//!
//! Everything here is synchronous, blocking I/O; every handle is scoped to a
//! single call and released on all exit paths.

pub mod device;
pub mod error;
pub mod ioctl;
pub mod mounts;
pub mod xattr;

pub use device::{DeviceEnumerator, ResolvedDevice, resolve_device};
pub use error::{Result, SysError};
pub use ioctl::{DevInfo, DevProperties, FsHandle, FsInfo};
pub use mounts::btrfs_mount_of;
pub use xattr::{get_xattr, set_xattr};
