// SPDX-License-Identifier: GPL-3.0-only

//! The property registry and dispatch entry point.
//!
//! The registry is a fixed, ordered table of descriptors built once at
//! compile time; there is no mutable global state. Every descriptor binds
//! its handler through an explicit named field.

use std::path::Path;

use enumflags2::{BitFlags, make_bitflags};
use props_types::{ObjectType, PropertyInfo};

use crate::error::{PropError, Result};
use crate::{allocation_hint, compression, label, readonly};

/// Transport adapter signature: `(object_type, object_path, property_name,
/// optional_value)`. A `None` value is a get, `Some` is a set.
pub type PropHandler = fn(ObjectType, &Path, &str, Option<&str>) -> Result<()>;

/// One entry of the property table.
pub struct PropertyDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub types: BitFlags<ObjectType>,
    pub read_only: bool,
    pub handler: PropHandler,
}

impl PropertyDescriptor {
    pub fn info(&self) -> PropertyInfo {
        PropertyInfo {
            name: self.name.to_string(),
            description: self.description.to_string(),
            types: self.types.iter().map(|t| t.as_str().to_string()).collect(),
            read_only: self.read_only,
        }
    }
}

static PROPERTIES: [PropertyDescriptor; 4] = [
    PropertyDescriptor {
        name: "ro",
        description: "read-only status of a subvolume",
        types: make_bitflags!(ObjectType::{Subvolume}),
        read_only: false,
        handler: readonly::handle,
    },
    PropertyDescriptor {
        name: "label",
        description: "label of the filesystem",
        types: make_bitflags!(ObjectType::{Device | FilesystemRoot}),
        read_only: false,
        handler: label::handle,
    },
    PropertyDescriptor {
        name: "compression",
        description: "compression algorithm for the file or directory",
        types: make_bitflags!(ObjectType::{Inode}),
        read_only: false,
        handler: compression::handle,
    },
    PropertyDescriptor {
        name: "allocation_hint",
        description: "hint to store the data/metadata chunks",
        types: make_bitflags!(ObjectType::{Device}),
        read_only: false,
        handler: allocation_hint::handle,
    },
];

/// Exact-match lookup by property name.
pub fn lookup(name: &str) -> Option<&'static PropertyDescriptor> {
    PROPERTIES.iter().find(|prop| prop.name == name)
}

/// All registered descriptors, in table order, for listing/help purposes.
pub fn descriptors() -> impl Iterator<Item = &'static PropertyDescriptor> {
    PROPERTIES.iter()
}

/// Dispatch one property operation: look the name up, check applicability
/// and writability, then hand off to the adapter. Adapter results propagate
/// unchanged; nothing here retries or recovers.
pub fn dispatch(
    object_type: ObjectType,
    path: &Path,
    name: &str,
    value: Option<&str>,
) -> Result<()> {
    let prop = lookup(name).ok_or_else(|| PropError::UnknownProperty(name.to_string()))?;
    validate(prop, object_type, value.is_some())?;
    (prop.handler)(object_type, path, name, value)
}

fn validate(prop: &PropertyDescriptor, object_type: ObjectType, is_set: bool) -> Result<()> {
    if !prop.types.contains(object_type) {
        return Err(PropError::NotApplicable {
            name: prop.name.to_string(),
            object_type,
        });
    }

    if is_set && prop.read_only {
        return Err(PropError::ReadOnlyProperty(prop.name.to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_exact() {
        for prop in descriptors() {
            assert_eq!(lookup(prop.name).unwrap().name, prop.name);
        }
        assert!(lookup("r").is_none());
        assert!(lookup("readonly").is_none());
        assert!(lookup("Label").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn unknown_property_is_rejected() {
        let err = dispatch(ObjectType::Subvolume, Path::new("/"), "nope", None).unwrap_err();
        assert!(matches!(err, PropError::UnknownProperty(_)));
    }

    #[test]
    fn every_inapplicable_pairing_is_rejected() {
        let all = [
            ObjectType::Subvolume,
            ObjectType::Device,
            ObjectType::FilesystemRoot,
            ObjectType::Inode,
        ];

        for prop in descriptors() {
            for object_type in all.into_iter().filter(|t| !prop.types.contains(*t)) {
                let err = dispatch(object_type, Path::new("/"), prop.name, None).unwrap_err();
                assert!(
                    matches!(err, PropError::NotApplicable { .. }),
                    "{} on {object_type} should not be applicable",
                    prop.name
                );
            }
        }
    }

    #[test]
    fn table_binds_the_expected_applicability() {
        assert_eq!(
            lookup("label").unwrap().types,
            make_bitflags!(ObjectType::{Device | FilesystemRoot})
        );
        assert_eq!(
            lookup("compression").unwrap().types,
            make_bitflags!(ObjectType::{Inode})
        );
        assert_eq!(
            lookup("allocation_hint").unwrap().types,
            make_bitflags!(ObjectType::{Device})
        );
        assert_eq!(
            lookup("ro").unwrap().types,
            make_bitflags!(ObjectType::{Subvolume})
        );
    }

    #[test]
    fn read_only_descriptors_reject_sets_before_the_adapter() {
        // No current table entry is read-only; the contract is enforced all
        // the same.
        fn unreachable_handler(_: ObjectType, _: &Path, _: &str, _: Option<&str>) -> Result<()> {
            panic!("adapter must not run for a rejected set");
        }

        let prop = PropertyDescriptor {
            name: "frozen",
            description: "a read-only property",
            types: make_bitflags!(ObjectType::{Inode}),
            read_only: true,
            handler: unreachable_handler,
        };

        let err = validate(&prop, ObjectType::Inode, true).unwrap_err();
        assert!(matches!(err, PropError::ReadOnlyProperty(_)));
        assert!(validate(&prop, ObjectType::Inode, false).is_ok());
    }

    #[test]
    fn descriptor_info_round_trips_for_listing() {
        let info = lookup("label").unwrap().info();
        assert_eq!(info.name, "label");
        assert_eq!(info.types, vec!["device", "filesystem"]);
        assert!(!info.read_only);
    }
}
