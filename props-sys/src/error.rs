// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;

use thiserror::Error;

/// Error types for system-level operations
#[derive(Error, Debug)]
pub enum SysError {
    #[error("device not mounted: {0}")]
    NotMounted(PathBuf),

    #[error("cannot open {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot stat {path}: {source}")]
    StatFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("permission denied querying {0}")]
    PermissionDenied(PathBuf),

    #[error("cannot get filesystem info for {path}: {source}")]
    QueryFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot get info about device devid={devid}: {source}")]
    DeviceInfoFailed {
        devid: u64,
        source: std::io::Error,
    },

    #[error("device {0} not found in the filesystem it is mounted under")]
    DeviceNotFound(PathBuf),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for system operations
pub type Result<T> = std::result::Result<T, SysError>;
