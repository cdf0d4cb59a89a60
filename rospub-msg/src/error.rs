//! Error types for rospub-msg.

use crate::populate::{FieldCause, FieldError};
use thiserror::Error;

/// Result type for rospub-msg operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while resolving types, parsing definitions or reading values.
#[derive(Debug, Error)]
pub enum Error {
    /// Type name is not `package/Name` or `package/msg/Name`
    #[error("The passed message type is invalid: '{0}'")]
    InvalidTypeName(String),

    /// No definition found for the type
    #[error("Unknown message type '{0}'")]
    UnknownType(String),

    /// Type contains itself, directly or through nested fields
    #[error("Message type '{0}' contains itself")]
    RecursiveType(String),

    /// Malformed `.msg` definition
    #[error("Failed to parse '{type_name}' at line {line}: {reason}")]
    Parse {
        /// Type being parsed
        type_name: String,
        /// One-based line number
        line: usize,
        /// What is wrong with the line
        reason: String,
    },

    /// Default value in a `.msg` definition does not fit its field
    #[error("Invalid default value for '{type_name}.{field}': {cause}")]
    InvalidDefault {
        /// Type owning the field
        type_name: String,
        /// Field name
        field: String,
        /// Why the default was rejected
        cause: FieldCause,
    },

    /// IO error while reading a definition file
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Values are not well-formed YAML
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] yaml_rust2::ScanError),

    /// Values are YAML but not a mapping of field names
    #[error("Invalid values: {0}")]
    InvalidValues(String),

    /// Field population failed
    #[error(transparent)]
    Populate(#[from] FieldError),
}
