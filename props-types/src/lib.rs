// SPDX-License-Identifier: GPL-3.0-only

//! Canonical domain models for btrfs property management
//!
//! This crate defines the types shared between the low-level system layer
//! (`props-sys`) and the property dispatch layer (`props-btrfs`):
//!
//! - `ObjectType` → the control-plane objects a property can attach to
//! - `AllocationHint` → named values for the per-device allocation bitmask
//! - `PropertyInfo` → serializable registry metadata for listing

pub mod allocation;
pub mod object;
pub mod property;

pub use allocation::{AllocationHint, DEV_ALLOCATION_MASK, HintParseError};
pub use object::ObjectType;
pub use property::PropertyInfo;
