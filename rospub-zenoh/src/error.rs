//! Error types for rospub-zenoh.

use crate::names::NameKind;
use thiserror::Error;

/// Result type for rospub-zenoh operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while setting up or using a publisher.
#[derive(Debug, Error)]
pub enum Error {
    /// Message schema, encoding or hashing error
    #[error(transparent)]
    Msg(#[from] rospub_msg::Error),

    /// Zenoh session error
    #[error("Zenoh error: {0}")]
    Zenoh(#[from] zenoh::Error),

    /// Invalid name (topic, node, namespace)
    #[error("Invalid {kind} name '{name}': {reason}")]
    InvalidName {
        /// What kind of name was validated
        kind: NameKind,
        /// The rejected name
        name: String,
        /// Which rule it breaks
        reason: String,
    },

    /// Message does not match the publisher's type
    #[error("Cannot publish a '{found}' message on a '{expected}' publisher")]
    TypeMismatch {
        /// Publisher type
        expected: String,
        /// Message type
        found: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
