// SPDX-License-Identifier: GPL-3.0-only

//! Named-property layer over btrfs control-plane objects
//!
//! Each property is a string-keyed attribute of a subvolume, member device,
//! mounted filesystem, or inode, with get/set semantics that differ per
//! object type and per transport (management library, extended attribute,
//! or device ioctl). The registry maps a property name to its descriptor;
//! [`dispatch`] validates applicability and hands off to the transport
//! adapter.

pub mod error;
pub mod registry;

mod allocation_hint;
mod compression;
mod label;
mod readonly;

// Re-export commonly used types
pub use error::{PropError, Result};
pub use registry::{PropertyDescriptor, descriptors, dispatch, lookup};

// Re-export shared models
pub use props_types::{AllocationHint, ObjectType, PropertyInfo};

// Re-export btrfsutil for convenience
pub use btrfsutil;
