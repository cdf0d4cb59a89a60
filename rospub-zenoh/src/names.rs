//! ROS2 name validation and expansion.
//!
//! Implements the rules of the
//! [ROS2 topic and service names design](https://design.ros2.org/articles/topic_and_service_names.html)
//! needed to turn the topic given on the command line into the fully
//! qualified name used in key expressions.

use crate::error::{Error, Result};
use std::fmt;

/// What kind of name is being validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    /// A topic name
    Topic,
    /// A node base name (no namespace)
    Node,
    /// A namespace
    Namespace,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Topic => write!(f, "topic"),
            Self::Node => write!(f, "node"),
            Self::Namespace => write!(f, "namespace"),
        }
    }
}

fn invalid(kind: NameKind, name: &str, reason: impl Into<String>) -> Error {
    Error::InvalidName {
        kind,
        name: name.to_string(),
        reason: reason.into(),
    }
}

/// Check a single `/`-free token: alphanumerics and underscores, not starting
/// with a digit, no repeated underscores.
fn check_token(kind: NameKind, name: &str, token: &str) -> Result<()> {
    if let Some(c) = token.chars().find(|c| !c.is_ascii_alphanumeric() && *c != '_') {
        return Err(invalid(kind, name, format!("invalid character '{c}'")));
    }
    if token.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(invalid(
            kind,
            name,
            "name must not start with a numeric character",
        ));
    }
    if token.contains("__") {
        return Err(invalid(
            kind,
            name,
            "name must not contain repeated underscores",
        ));
    }
    Ok(())
}

/// Check a `/`-separated path of tokens, where `{substitution}` tokens are
/// allowed if `substitutions` is set.
fn check_path(kind: NameKind, name: &str, path: &str, substitutions: bool) -> Result<()> {
    if path.ends_with('/') {
        return Err(invalid(kind, name, "name must not end with a forward slash"));
    }
    for token in path.split('/') {
        if token.is_empty() {
            return Err(invalid(
                kind,
                name,
                "name must not contain repeated forward slashes",
            ));
        }
        match token.strip_prefix('{') {
            Some(rest) if substitutions => {
                let inner = rest
                    .strip_suffix('}')
                    .ok_or_else(|| invalid(kind, name, "unbalanced curly braces"))?;
                if inner.is_empty() {
                    return Err(invalid(kind, name, "empty substitution"));
                }
                check_token(kind, name, inner)?;
            }
            _ => check_token(kind, name, token)?,
        }
    }
    Ok(())
}

/// Validate a topic name.
///
/// # Rules
///
/// - Must not be empty
/// - May contain alphanumeric characters, underscores, or forward slashes
/// - May use `{substitution}` tokens
/// - May start with a tilde (`~`) for the private namespace, which must be
///   alone or followed by a forward slash
/// - Tokens must not start with a numeric character
/// - Must not end with a forward slash
/// - Must not contain repeated forward slashes or repeated underscores
///
/// # Errors
///
/// Returns [`Error::InvalidName`] if the name violates any of the above rules.
///
/// # Examples
///
/// ```
/// use rospub_zenoh::names::validate_topic_name;
///
/// assert!(validate_topic_name("foo").is_ok());
/// assert!(validate_topic_name("/foo/bar").is_ok());
/// assert!(validate_topic_name("~/private").is_ok());
/// assert!(validate_topic_name("{node}/topic").is_ok());
///
/// assert!(validate_topic_name("").is_err());
/// assert!(validate_topic_name("123").is_err());
/// assert!(validate_topic_name("foo//bar").is_err());
/// ```
pub fn validate_topic_name(name: &str) -> Result<()> {
    let kind = NameKind::Topic;
    if name.is_empty() {
        return Err(invalid(kind, name, "name must not be empty"));
    }
    let rest = match name.strip_prefix('~') {
        Some("") => return Ok(()),
        Some(rest) => rest.strip_prefix('/').ok_or_else(|| {
            invalid(
                kind,
                name,
                "tilde (~) must be followed by a forward slash (/)",
            )
        })?,
        None => name.strip_prefix('/').unwrap_or(name),
    };
    check_path(kind, name, rest, true)
}

/// Validate a node base name.
///
/// Node names only contain alphanumerics and underscores, do not start with
/// a digit and do not repeat underscores.
///
/// # Errors
///
/// Returns [`Error::InvalidName`] if the name violates any of the above rules.
///
/// # Examples
///
/// ```
/// use rospub_zenoh::names::validate_node_name;
///
/// assert!(validate_node_name("my_node").is_ok());
/// assert!(validate_node_name("publisher_std_msgs_String").is_ok());
///
/// assert!(validate_node_name("").is_err());
/// assert!(validate_node_name("my/node").is_err());
/// assert!(validate_node_name("123node").is_err());
/// ```
pub fn validate_node_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(invalid(NameKind::Node, name, "name must not be empty"));
    }
    check_token(NameKind::Node, name, name)
}

/// Validate an absolute namespace. `/` is the root namespace.
///
/// # Errors
///
/// Returns [`Error::InvalidName`] if the namespace is relative or one of its
/// tokens is invalid.
///
/// # Examples
///
/// ```
/// use rospub_zenoh::names::validate_namespace;
///
/// assert!(validate_namespace("/").is_ok());
/// assert!(validate_namespace("/foo/bar").is_ok());
///
/// assert!(validate_namespace("foo").is_err());
/// assert!(validate_namespace("/foo/").is_err());
/// ```
pub fn validate_namespace(namespace: &str) -> Result<()> {
    let kind = NameKind::Namespace;
    match namespace.strip_prefix('/') {
        Some("") => Ok(()),
        Some(rest) => check_path(kind, namespace, rest, false),
        None => Err(invalid(
            kind,
            namespace,
            "namespace must start with a forward slash (/)",
        )),
    }
}

/// Build the fully qualified node name from namespace and node name.
///
/// ```
/// use rospub_zenoh::names::build_node_fqn;
///
/// assert_eq!(build_node_fqn("/my_ns", "my_node"), "/my_ns/my_node");
/// assert_eq!(build_node_fqn("/", "my_node"), "/my_node");
/// ```
pub fn build_node_fqn(namespace: &str, node_name: &str) -> String {
    if namespace == "/" {
        format!("/{node_name}")
    } else {
        format!("{namespace}/{node_name}")
    }
}

/// Expand a topic name to its fully qualified form.
///
/// - absolute names (`/foo`) are kept as-is
/// - private names (`~`, `~/foo`) are resolved under the node's fully
///   qualified name
/// - relative names (`foo`) are resolved under the node's namespace
///
/// Substitutions are not expanded, so a name still holding `{...}` after
/// expansion is rejected.
///
/// # Errors
///
/// Returns [`Error::InvalidName`] if the namespace, the node name, the topic
/// name or the expanded result is invalid.
///
/// # Examples
///
/// ```
/// use rospub_zenoh::names::expand_topic_name;
///
/// assert_eq!(expand_topic_name("/my_ns", "my_node", "/absolute/topic")?, "/absolute/topic");
/// assert_eq!(expand_topic_name("/my_ns", "my_node", "~/private")?, "/my_ns/my_node/private");
/// assert_eq!(expand_topic_name("/my_ns", "my_node", "relative")?, "/my_ns/relative");
/// assert_eq!(expand_topic_name("/", "my_node", "chatter")?, "/chatter");
/// # Ok::<(), rospub_zenoh::Error>(())
/// ```
pub fn expand_topic_name(namespace: &str, node_name: &str, topic_name: &str) -> Result<String> {
    validate_namespace(namespace)?;
    validate_node_name(node_name)?;
    validate_topic_name(topic_name)?;

    let expanded = if topic_name.starts_with('/') {
        topic_name.to_string()
    } else if let Some(rest) = topic_name.strip_prefix('~') {
        format!("{}{rest}", build_node_fqn(namespace, node_name))
    } else {
        format!("{}/{topic_name}", namespace.trim_end_matches('/'))
    };

    if expanded.contains('{') {
        return Err(invalid(
            NameKind::Topic,
            &expanded,
            "unknown substitution in fully qualified name",
        ));
    }
    Ok(expanded)
}
