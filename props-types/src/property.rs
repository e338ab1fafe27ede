// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};

/// Registry metadata for one property, in a transport-friendly shape.
///
/// Listing consumers (the CLI `list` command) serialize this rather than the
/// registry's internal descriptors, which carry function pointers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyInfo {
    pub name: String,
    pub description: String,
    pub types: Vec<String>,
    pub read_only: bool,
}
