//! Dynamic message instances.

use crate::{
    schema::{ElementKind, FieldKind, MessageSchema, ScalarKind},
    type_name::MessageTypeName,
};
use std::{fmt, sync::Arc};
use thiserror::Error;

/// Value held by a field of a [`DynamicMessage`].
///
/// Arrays and sequences are both stored as [`FieldValue::Array`]; the field's
/// [`FieldKind`] tells them apart.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum FieldValue {
    Bool(bool),
    Byte(u8),
    Char(u8),
    Float32(f32),
    Float64(f64),
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    String(String),
    WString(String),
    Message(DynamicMessage),
    Array(Vec<FieldValue>),
}

impl FieldValue {
    /// Short description of the value's type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Byte(_) => "byte",
            Self::Char(_) => "char",
            Self::Float32(_) => "float32",
            Self::Float64(_) => "float64",
            Self::Int8(_) => "int8",
            Self::UInt8(_) => "uint8",
            Self::Int16(_) => "int16",
            Self::UInt16(_) => "uint16",
            Self::Int32(_) => "int32",
            Self::UInt32(_) => "uint32",
            Self::Int64(_) => "int64",
            Self::UInt64(_) => "uint64",
            Self::String(_) => "string",
            Self::WString(_) => "wstring",
            Self::Message(_) => "message",
            Self::Array(_) => "array",
        }
    }

    fn matches_scalar(&self, kind: ScalarKind) -> bool {
        matches!(
            (self, kind),
            (Self::Bool(_), ScalarKind::Bool)
                | (Self::Byte(_), ScalarKind::Byte)
                | (Self::Char(_), ScalarKind::Char)
                | (Self::Float32(_), ScalarKind::Float32)
                | (Self::Float64(_), ScalarKind::Float64)
                | (Self::Int8(_), ScalarKind::Int8)
                | (Self::UInt8(_), ScalarKind::UInt8)
                | (Self::Int16(_), ScalarKind::Int16)
                | (Self::UInt16(_), ScalarKind::UInt16)
                | (Self::Int32(_), ScalarKind::Int32)
                | (Self::UInt32(_), ScalarKind::UInt32)
                | (Self::Int64(_), ScalarKind::Int64)
                | (Self::UInt64(_), ScalarKind::UInt64)
                | (Self::String(_), ScalarKind::String(_))
                | (Self::WString(_), ScalarKind::WString(_))
        )
    }
}

/// Reasons a field rejects a value at assignment.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssignError {
    /// The message has no such field
    #[error("no field named '{0}'")]
    UnknownField(String),

    /// Value type differs from the declared field type
    #[error("expected a value of type '{expected}', got '{found}'")]
    KindMismatch {
        /// Declared type
        expected: String,
        /// Type of the value
        found: String,
    },

    /// Number does not fit the declared width
    #[error("value {value} is out of range for type '{kind}'")]
    OutOfRange {
        /// Offending value
        value: String,
        /// Declared type
        kind: &'static str,
    },

    /// Bounded string is too long
    #[error("string of length {len} exceeds the upper bound of {bound}")]
    StringTooLong {
        /// Actual length
        len: usize,
        /// Declared bound
        bound: usize,
    },

    /// Fixed-size array with the wrong number of elements
    #[error("expected exactly {expected} elements, got {found}")]
    LengthMismatch {
        /// Declared length
        expected: usize,
        /// Number of elements supplied
        found: usize,
    },

    /// Bounded sequence with too many elements
    #[error("{found} elements exceed the upper bound of {bound}")]
    BoundExceeded {
        /// Declared bound
        bound: usize,
        /// Number of elements supplied
        found: usize,
    },
}

/// A message instance whose type is described at runtime by a [`MessageSchema`].
///
/// Holds exactly one value per schema field, in declaration order. A new
/// instance carries the schema defaults; [`set`](Self::set) replaces a field
/// after checking the value against the field's declared type.
#[derive(Clone)]
pub struct DynamicMessage {
    schema: Arc<MessageSchema>,
    values: Vec<FieldValue>,
}

impl DynamicMessage {
    /// Create a default-valued instance.
    pub fn new(schema: Arc<MessageSchema>) -> Self {
        let values = schema.fields().iter().map(|f| f.default_value()).collect();
        Self { schema, values }
    }

    /// Schema of this instance.
    pub fn schema(&self) -> &Arc<MessageSchema> {
        &self.schema
    }

    /// Type name of this instance.
    pub fn type_name(&self) -> &MessageTypeName {
        self.schema.name()
    }

    /// Current value of a field.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.schema.position(name).map(|i| &self.values[i])
    }

    /// Field names and current values, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.schema
            .fields()
            .iter()
            .map(|f| f.name.as_str())
            .zip(self.values.iter())
    }

    pub(crate) fn values(&self) -> &[FieldValue] {
        &self.values
    }

    /// Assign a field.
    ///
    /// # Errors
    ///
    /// Returns an [`AssignError`] if the field does not exist or the value does
    /// not fit the declared type (wrong kind, string too long, wrong array
    /// length, sequence over its bound). The message is left unchanged.
    pub fn set(&mut self, name: &str, value: FieldValue) -> Result<(), AssignError> {
        let index = self
            .schema
            .position(name)
            .ok_or_else(|| AssignError::UnknownField(name.to_string()))?;
        check_field(&self.schema.fields()[index].kind, &value)?;
        self.values[index] = value;
        Ok(())
    }
}

/// Check that `value` fits a field of kind `kind`.
pub(crate) fn check_field(kind: &FieldKind, value: &FieldValue) -> Result<(), AssignError> {
    match (kind, value) {
        (FieldKind::Scalar(scalar), value) => check_scalar(*scalar, value),
        (FieldKind::Nested(schema), FieldValue::Message(msg)) if msg.type_name() == schema.name() => {
            Ok(())
        }
        (FieldKind::Array { element, len }, FieldValue::Array(items)) => {
            if items.len() != *len {
                return Err(AssignError::LengthMismatch {
                    expected: *len,
                    found: items.len(),
                });
            }
            items.iter().try_for_each(|item| check_element(element, item))
        }
        (FieldKind::Sequence { element, bound }, FieldValue::Array(items)) => {
            if let Some(bound) = bound
                && items.len() > *bound
            {
                return Err(AssignError::BoundExceeded {
                    bound: *bound,
                    found: items.len(),
                });
            }
            items.iter().try_for_each(|item| check_element(element, item))
        }
        (kind, value) => Err(mismatch(kind, value)),
    }
}

fn check_element(element: &ElementKind, value: &FieldValue) -> Result<(), AssignError> {
    match element {
        ElementKind::Scalar(scalar) => check_scalar(*scalar, value),
        ElementKind::Nested(schema) => check_field(&FieldKind::Nested(Arc::clone(schema)), value),
    }
}

fn check_scalar(kind: ScalarKind, value: &FieldValue) -> Result<(), AssignError> {
    if !value.matches_scalar(kind) {
        return Err(AssignError::KindMismatch {
            expected: kind.to_string(),
            found: describe(value),
        });
    }
    if let (Some(bound), FieldValue::String(s) | FieldValue::WString(s)) =
        (kind.string_bound(), value)
    {
        let len = match kind {
            ScalarKind::WString(_) => s.encode_utf16().count(),
            _ => s.chars().count(),
        };
        if len > bound {
            return Err(AssignError::StringTooLong { len, bound });
        }
    }
    Ok(())
}

fn mismatch(kind: &FieldKind, value: &FieldValue) -> AssignError {
    AssignError::KindMismatch {
        expected: kind.to_string(),
        found: describe(value),
    }
}

fn describe(value: &FieldValue) -> String {
    match value {
        FieldValue::Message(msg) => msg.type_name().to_string(),
        other => other.type_name().to_string(),
    }
}

impl PartialEq for DynamicMessage {
    fn eq(&self, other: &Self) -> bool {
        self.schema.name() == other.schema.name() && self.values == other.values
    }
}

impl fmt::Debug for DynamicMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Formats as `package.msg.Name(field=value, ...)`, the way `ros2 topic pub`
/// echoes what it publishes.
impl fmt::Display for DynamicMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.type_name().dotted_name())?;
        for (i, (name, value)) in self.fields().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Byte(v) => write!(f, "b'\\x{v:02x}'"),
            Self::Char(v) => write_char(f, *v),
            Self::UInt8(v) => write!(f, "{v}"),
            Self::Float32(v) => write!(f, "{v:?}"),
            Self::Float64(v) => write!(f, "{v:?}"),
            Self::Int8(v) => write!(f, "{v}"),
            Self::Int16(v) => write!(f, "{v}"),
            Self::UInt16(v) => write!(f, "{v}"),
            Self::Int32(v) => write!(f, "{v}"),
            Self::UInt32(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::UInt64(v) => write!(f, "{v}"),
            Self::String(s) | Self::WString(s) => {
                write!(f, "'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
            }
            Self::Message(msg) => write!(f, "{msg}"),
            Self::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Quoted Latin-1 character, escaped like a Python `repr`.
fn write_char(f: &mut fmt::Formatter<'_>, v: u8) -> fmt::Result {
    match v {
        b'\\' => f.write_str(r"'\\'"),
        b'\'' => f.write_str(r"'\''"),
        b'\t' => f.write_str(r"'\t'"),
        b'\n' => f.write_str(r"'\n'"),
        b'\r' => f.write_str(r"'\r'"),
        0x20..=0x7e | 0xa1..=0xac | 0xae..=0xff => write!(f, "'{}'", char::from(v)),
        _ => write!(f, "'\\x{v:02x}'"),
    }
}
