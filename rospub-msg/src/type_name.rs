//! Message type names.

use crate::error::{Error, Result};
use regex::Regex;
use std::{fmt, sync::LazyLock};

static PACKAGE_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]([a-z0-9_])*$").unwrap());

static MESSAGE_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]([A-Za-z0-9_])*$").unwrap());

/// Interface category of plain messages.
pub const MSG_INTERFACE: &str = "msg";

/// Fully qualified name of a message type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageTypeName {
    /// The ROS2 package name (e.g. `std_msgs`)
    pub package: String,
    /// The interface category, always `msg` for messages
    pub interface: String,
    /// The type name without package prefix (e.g. `String`)
    pub name: String,
}

impl MessageTypeName {
    /// Create a message type name in the `msg` interface category.
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            interface: MSG_INTERFACE.to_string(),
            name: name.into(),
        }
    }

    /// Parse `package/Name` or `package/msg/Name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTypeName`] for any other shape, or when the
    /// package or type name does not follow ROS2 naming rules.
    ///
    /// # Example
    ///
    /// ```
    /// use rospub_msg::MessageTypeName;
    ///
    /// let short = MessageTypeName::parse("std_msgs/String")?;
    /// let long = MessageTypeName::parse("std_msgs/msg/String")?;
    /// assert_eq!(short, long);
    /// assert!(MessageTypeName::parse("std_msgs").is_err());
    /// # Ok::<(), rospub_msg::Error>(())
    /// ```
    pub fn parse(type_name: &str) -> Result<Self> {
        let parts: Vec<&str> = type_name.split('/').collect();
        let (package, name) = match parts.as_slice() {
            [package, name] => (*package, *name),
            [package, MSG_INTERFACE, name] => (*package, *name),
            _ => return Err(Error::InvalidTypeName(type_name.to_string())),
        };

        if !PACKAGE_NAME_PATTERN.is_match(package) || !MESSAGE_NAME_PATTERN.is_match(name) {
            return Err(Error::InvalidTypeName(type_name.to_string()));
        }

        Ok(Self::new(package, name))
    }

    /// Resolve a type reference found inside a `.msg` file of `context_package`.
    ///
    /// Unqualified references (`Point`) belong to the referencing package.
    pub(crate) fn resolve_reference(reference: &str, context_package: &str) -> Result<Self> {
        if reference.contains('/') {
            Self::parse(reference)
        } else {
            Self::parse(&format!("{context_package}/{reference}"))
        }
    }

    /// Full name in the format `package/msg/Name`.
    pub fn full_name(&self) -> String {
        format!("{}/{}/{}", self.package, self.interface, self.name)
    }

    /// DDS type name, as used in Zenoh key expressions (`package::msg::dds_::Name_`).
    pub fn dds_name(&self) -> String {
        format!("{}::{}::dds_::{}_", self.package, self.interface, self.name)
    }

    /// Dotted name used when printing instances (`package.msg.Name`).
    pub fn dotted_name(&self) -> String {
        format!("{}.{}.{}", self.package, self.interface, self.name)
    }
}

impl fmt::Display for MessageTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.package, self.interface, self.name)
    }
}
