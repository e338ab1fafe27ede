// SPDX-License-Identifier: GPL-3.0-only

//! `allocation_hint` — the per-device allocation preference bits of the
//! device type field, reached through BTRFS_IOC_DEV_PROPERTIES on the
//! owning filesystem's mount handle.

use std::path::Path;

use props_sys::resolve_device;
use props_types::{AllocationHint, DEV_ALLOCATION_MASK, ObjectType};

use crate::error::{PropError, Result};

pub(crate) fn handle(
    _object_type: ObjectType,
    object: &Path,
    _name: &str,
    value: Option<&str>,
) -> Result<()> {
    // One resolution per dispatch; the same handle serves the query and, for
    // a set, the write.
    let resolved = resolve_device(object)?;

    let props = resolved
        .handle
        .dev_properties(resolved.devid)
        .map_err(|e| {
            PropError::Transport(format!(
                "cannot query device properties on '{}': {e}",
                resolved.mount_point.display()
            ))
        })?;

    match value {
        None => {
            let bits = props.type_field & DEV_ALLOCATION_MASK;
            match AllocationHint::from_bits(bits) {
                Some(hint) => println!(
                    "devid={}, path={}: allocation_hint={hint}",
                    resolved.devid,
                    object.display()
                ),
                None => println!(
                    "devid={}, path={}: allocation_hint=unknown:{bits}",
                    resolved.devid,
                    object.display()
                ),
            }
            Ok(())
        }
        Some(value) => {
            // Value validation happens before any write ioctl is issued.
            let bits = AllocationHint::parse_value(value)?;
            let type_field = merge_hint(props.type_field, bits);

            tracing::debug!(
                devid = resolved.devid,
                type_field,
                "writing device type field"
            );
            resolved
                .handle
                .set_dev_type(resolved.devid, type_field)
                .map_err(|e| {
                    PropError::Transport(format!(
                        "cannot set device properties on '{}': {e}",
                        resolved.mount_point.display()
                    ))
                })
        }
    }
}

/// Replace the allocation bits of a type field, leaving the rest untouched.
/// A read of the current field immediately before this merge is subject to
/// the documented read-modify-write race with concurrent writers.
fn merge_hint(type_field: u64, hint_bits: u64) -> u64 {
    (type_field & !DEV_ALLOCATION_MASK) | (hint_bits & DEV_ALLOCATION_MASK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_replaces_only_the_allocation_bits() {
        let field = 0xABCD_0000 | 0x5;
        assert_eq!(merge_hint(field, 3), 0xABCD_0000 | 0x3);
        assert_eq!(merge_hint(field, 0), 0xABCD_0000);
    }

    #[test]
    fn merge_is_idempotent() {
        let once = merge_hint(0xF8, 2);
        assert_eq!(merge_hint(once, 2), once);
    }

    #[test]
    fn named_and_numeric_sets_produce_the_same_field() {
        let by_name = merge_hint(0x40, AllocationHint::parse_value("DATA_ONLY").unwrap());
        let by_number = merge_hint(0x40, AllocationHint::parse_value("3").unwrap());
        assert_eq!(by_name, by_number);
    }

    #[test]
    fn out_of_mask_values_never_reach_the_write() {
        assert!(matches!(
            AllocationHint::parse_value(&u64::MAX.to_string()),
            Err(props_types::HintParseError::Invalid(_))
        ));
    }
}
