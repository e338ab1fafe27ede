// SPDX-License-Identifier: GPL-3.0-only

//! `ro` — the read-only flag of a subvolume, through the btrfsutil
//! management library.

use std::path::Path;

use btrfsutil::subvolume::Subvolume;
use props_types::ObjectType;

use crate::error::{PropError, Result};

pub(crate) fn handle(
    _object_type: ObjectType,
    object: &Path,
    _name: &str,
    value: Option<&str>,
) -> Result<()> {
    match value {
        Some(value) => set(object, parse_value(value)?),
        None => get(object),
    }
}

fn get(object: &Path) -> Result<()> {
    let subvol = subvolume_of(object)?;
    let read_only = subvol
        .is_ro()
        .map_err(|e| PropError::Transport(format!("failed to get read-only flag: {e}")))?;

    println!("ro={}", if read_only { "true" } else { "false" });
    Ok(())
}

fn set(object: &Path, read_only: bool) -> Result<()> {
    let subvol = subvolume_of(object)?;
    subvol
        .set_ro(read_only)
        .map_err(|e| PropError::Transport(format!("failed to set read-only flag: {e}")))
}

fn subvolume_of(object: &Path) -> Result<Subvolume> {
    Subvolume::try_from(object)
        .map_err(|e| PropError::Transport(format!("{}: {e}", object.display())))
}

/// The set value must be exactly the literal `true` or `false`; everything
/// else is rejected before any library call.
fn parse_value(value: &str) -> Result<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(PropError::InvalidValue(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_exact_literals_are_accepted() {
        assert!(parse_value("true").unwrap());
        assert!(!parse_value("false").unwrap());

        for bad in ["True", "FALSE", "1", "0", "yes", "no", "", " true"] {
            assert!(
                matches!(parse_value(bad), Err(PropError::InvalidValue(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}
