//! Dotted field paths and the structured population error.

use super::coerce::CoerceError;
use crate::message::AssignError;
use std::fmt;
use thiserror::Error;

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Named field
    Field(String),
    /// Element of an array or sequence
    Index(usize),
}

/// Location of a field inside a message, e.g. `pose.position.x` or
/// `points[2].x`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// Segments from the message root down to the field.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the path points at the message itself.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn prepend(&mut self, segment: PathSegment) {
        self.0.insert(0, segment);
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Field(name) if i == 0 => f.write_str(name)?,
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<S> for FieldPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(|s| PathSegment::Field(s.into())).collect())
    }
}

/// Why a field could not be populated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldCause {
    /// The message type has no field with this name
    #[error("'{type_name}' has no field named '{field}'")]
    UnknownField {
        /// Type that was searched
        type_name: String,
        /// Requested field
        field: String,
    },

    /// The value cannot be converted to the field's type
    #[error(transparent)]
    Malformed(#[from] CoerceError),

    /// The converted value was refused by the field
    #[error(transparent)]
    Rejected(#[from] AssignError),
}

/// A population failure, located by the path of the deepest failing field.
///
/// Nested failures keep the innermost cause; each enclosing level only
/// extends the path.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Failed to populate field '{path}': {cause}")]
pub struct FieldError {
    path: FieldPath,
    cause: FieldCause,
}

impl FieldError {
    /// Path of the failing field, from the message root.
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Underlying cause.
    pub fn cause(&self) -> &FieldCause {
        &self.cause
    }

    /// Whether the failure happened below a nested message or array field
    /// rather than on a top-level field.
    pub fn is_composite(&self) -> bool {
        self.path.len() > 1
    }

    /// Error located at the value being built, before any field name is known.
    pub(crate) fn here(cause: impl Into<FieldCause>) -> Self {
        Self {
            path: FieldPath::default(),
            cause: cause.into(),
        }
    }

    pub(crate) fn within(mut self, field: &str) -> Self {
        self.path.prepend(PathSegment::Field(field.to_string()));
        self
    }

    pub(crate) fn at_index(mut self, index: usize) -> Self {
        self.path.prepend(PathSegment::Index(index));
        self
    }
}
