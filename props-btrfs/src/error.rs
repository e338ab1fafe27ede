// SPDX-License-Identifier: GPL-3.0-only

use props_types::ObjectType;
use thiserror::Error;

/// Error types for property operations
#[derive(Error, Debug)]
pub enum PropError {
    #[error("unknown property: {0}")]
    UnknownProperty(String),

    #[error("property '{name}' does not apply to object type '{object_type}'")]
    NotApplicable {
        name: String,
        object_type: ObjectType,
    },

    #[error("property '{0}' is read-only")]
    ReadOnlyProperty(String),

    #[error("invalid value for property: {0}")]
    InvalidValue(String),

    #[error(transparent)]
    Sys(#[from] props_sys::SysError),

    #[error("{0}")]
    Transport(String),
}

impl From<props_types::HintParseError> for PropError {
    fn from(err: props_types::HintParseError) -> Self {
        match err {
            props_types::HintParseError::Invalid(value) => PropError::InvalidValue(value),
        }
    }
}

/// Result type alias for property operations
pub type Result<T> = std::result::Result<T, PropError>;
