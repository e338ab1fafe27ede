// SPDX-License-Identifier: GPL-3.0-only

use thiserror::Error;

/// Width of the allocation-hint field inside a device's type bitfield.
pub const DEV_ALLOCATION_MASK_BIT_COUNT: u32 = 3;

/// Mask selecting the allocation-hint bits of the device type field
/// (BTRFS_DEV_ALLOCATION_MASK).
pub const DEV_ALLOCATION_MASK: u64 = (1 << DEV_ALLOCATION_MASK_BIT_COUNT) - 1;

/// Named allocation-hint values for a btrfs member device.
///
/// The hint tells the allocator which chunk class (metadata vs. data) it
/// should prefer to place on the device. Values live inside
/// [`DEV_ALLOCATION_MASK`]; masked values without a name do occur (the field
/// is wider than the named set) and are reported numerically by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationHint {
    PreferredData,
    PreferredMetadata,
    MetadataOnly,
    DataOnly,
}

/// Display/match order follows the historical property table.
const HINT_TABLE: &[AllocationHint] = &[
    AllocationHint::PreferredMetadata,
    AllocationHint::MetadataOnly,
    AllocationHint::PreferredData,
    AllocationHint::DataOnly,
];

impl AllocationHint {
    pub fn bits(&self) -> u64 {
        match self {
            AllocationHint::PreferredData => 0,
            AllocationHint::PreferredMetadata => 1,
            AllocationHint::MetadataOnly => 2,
            AllocationHint::DataOnly => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AllocationHint::PreferredData => "PREFERRED_DATA",
            AllocationHint::PreferredMetadata => "PREFERRED_METADATA",
            AllocationHint::MetadataOnly => "METADATA_ONLY",
            AllocationHint::DataOnly => "DATA_ONLY",
        }
    }

    /// Case-sensitive exact lookup by name.
    pub fn from_name(name: &str) -> Option<Self> {
        HINT_TABLE.iter().copied().find(|hint| hint.name() == name)
    }

    /// Match a masked type-field value against the named set.
    pub fn from_bits(bits: u64) -> Option<Self> {
        HINT_TABLE.iter().copied().find(|hint| hint.bits() == bits)
    }

    /// Parse a user-supplied value: a hint name first, then an unsigned
    /// integer. Numeric values with bits outside the allocation mask are
    /// rejected.
    pub fn parse_value(value: &str) -> Result<u64, HintParseError> {
        if let Some(hint) = Self::from_name(value) {
            return Ok(hint.bits());
        }

        let bits: u64 = value
            .parse()
            .map_err(|_| HintParseError::Invalid(value.to_string()))?;

        if bits & !DEV_ALLOCATION_MASK != 0 {
            return Err(HintParseError::Invalid(value.to_string()));
        }

        Ok(bits)
    }
}

impl std::fmt::Display for AllocationHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for allocation-hint value parsing
#[derive(Error, Debug, PartialEq, Eq)]
pub enum HintParseError {
    #[error("invalid value '{0}'")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_and_numeric_values_agree() {
        assert_eq!(
            AllocationHint::parse_value("DATA_ONLY").unwrap(),
            AllocationHint::parse_value("3").unwrap()
        );
        assert_eq!(AllocationHint::parse_value("PREFERRED_DATA").unwrap(), 0);
    }

    #[test]
    fn names_are_case_sensitive() {
        assert!(AllocationHint::from_name("data_only").is_none());
        assert!(AllocationHint::parse_value("data_only").is_err());
    }

    #[test]
    fn bits_outside_the_mask_are_rejected() {
        assert!(AllocationHint::parse_value("8").is_err());
        assert!(AllocationHint::parse_value(&u64::MAX.to_string()).is_err());
        assert_eq!(AllocationHint::parse_value("7").unwrap(), 7);
    }

    #[test]
    fn unnamed_masked_values_have_no_name() {
        assert!(AllocationHint::from_bits(5).is_none());
        assert_eq!(
            AllocationHint::from_bits(2),
            Some(AllocationHint::MetadataOnly)
        );
    }
}
