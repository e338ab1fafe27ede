// SPDX-License-Identifier: GPL-3.0-only

use enumflags2::bitflags;
use serde::{Deserialize, Serialize};

/// Control-plane objects a property can attach to.
///
/// A single property descriptor may cover several object types (the
/// filesystem label applies to both a member device and the mounted root),
/// so the applicability set is a bitmask of these tags.
#[bitflags]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectType {
    Subvolume = 1 << 0,
    Device = 1 << 1,
    FilesystemRoot = 1 << 2,
    Inode = 1 << 3,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Subvolume => "subvolume",
            ObjectType::Device => "device",
            ObjectType::FilesystemRoot => "filesystem",
            ObjectType::Inode => "inode",
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::ObjectType;
    use enumflags2::make_bitflags;

    #[test]
    fn types_compose_as_bitmask() {
        let set = make_bitflags!(ObjectType::{Device | FilesystemRoot});
        assert!(set.contains(ObjectType::Device));
        assert!(set.contains(ObjectType::FilesystemRoot));
        assert!(!set.contains(ObjectType::Subvolume));
        assert!(!set.contains(ObjectType::Inode));
    }
}
