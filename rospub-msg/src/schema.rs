//! Message schemas.
//!
//! A [`MessageSchema`] is the runtime description of a message type: its name
//! and the ordered list of its fields. Every field carries a [`FieldKind`]
//! tag telling whether it holds a primitive, a nested message, or an
//! array/sequence of either. Schemas are resolved once by the
//! [`TypeRegistry`](crate::TypeRegistry) and shared through [`Arc`].

use crate::{message::FieldValue, type_name::MessageTypeName};
use std::{fmt, sync::Arc};

// Field type ids, matching type_description_interfaces/msg/FieldType.msg
pub(crate) const FIELD_TYPE_NESTED_TYPE: u8 = 1;
pub(crate) const FIELD_TYPE_INT8: u8 = 2;
pub(crate) const FIELD_TYPE_UINT8: u8 = 3;
pub(crate) const FIELD_TYPE_INT16: u8 = 4;
pub(crate) const FIELD_TYPE_UINT16: u8 = 5;
pub(crate) const FIELD_TYPE_INT32: u8 = 6;
pub(crate) const FIELD_TYPE_UINT32: u8 = 7;
pub(crate) const FIELD_TYPE_INT64: u8 = 8;
pub(crate) const FIELD_TYPE_UINT64: u8 = 9;
pub(crate) const FIELD_TYPE_FLOAT: u8 = 10;
pub(crate) const FIELD_TYPE_DOUBLE: u8 = 11;
pub(crate) const FIELD_TYPE_BOOLEAN: u8 = 15;
pub(crate) const FIELD_TYPE_BYTE: u8 = 16;
pub(crate) const FIELD_TYPE_STRING: u8 = 17;
pub(crate) const FIELD_TYPE_WSTRING: u8 = 18;
pub(crate) const FIELD_TYPE_BOUNDED_STRING: u8 = 21;
pub(crate) const FIELD_TYPE_BOUNDED_WSTRING: u8 = 22;

/// Offset from a base type id to its fixed-size array id.
pub(crate) const ARRAY_OFFSET: u8 = 48;
/// Offset from a base type id to its bounded sequence id.
pub(crate) const BOUNDED_SEQUENCE_OFFSET: u8 = 96;
/// Offset from a base type id to its unbounded sequence id.
pub(crate) const UNBOUNDED_SEQUENCE_OFFSET: u8 = 144;

/// Primitive field types.
///
/// `char` is an 8-bit unsigned integer, as in the `.msg` to IDL mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum ScalarKind {
    Bool,
    Byte,
    Char,
    Float32,
    Float64,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    /// UTF-8 string with optional upper bound on its length
    String(Option<usize>),
    /// Wide string with optional upper bound on its length
    WString(Option<usize>),
}

impl ScalarKind {
    /// Look up a `.msg` primitive type name (`int32`, `string`, ...).
    ///
    /// Bounded strings (`string<=10`) are handled by the parser.
    pub fn from_msg_name(name: &str) -> Option<Self> {
        let kind = match name {
            "bool" => Self::Bool,
            "byte" => Self::Byte,
            "char" => Self::Char,
            "float32" => Self::Float32,
            "float64" => Self::Float64,
            "int8" => Self::Int8,
            "uint8" => Self::UInt8,
            "int16" => Self::Int16,
            "uint16" => Self::UInt16,
            "int32" => Self::Int32,
            "uint32" => Self::UInt32,
            "int64" => Self::Int64,
            "uint64" => Self::UInt64,
            "string" => Self::String(None),
            "wstring" => Self::WString(None),
            _ => return None,
        };
        Some(kind)
    }

    /// The `.msg` spelling of this type, without string bound.
    pub fn msg_name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Byte => "byte",
            Self::Char => "char",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Int8 => "int8",
            Self::UInt8 => "uint8",
            Self::Int16 => "int16",
            Self::UInt16 => "uint16",
            Self::Int32 => "int32",
            Self::UInt32 => "uint32",
            Self::Int64 => "int64",
            Self::UInt64 => "uint64",
            Self::String(_) => "string",
            Self::WString(_) => "wstring",
        }
    }

    /// Upper bound of a bounded string, if any.
    pub fn string_bound(&self) -> Option<usize> {
        match self {
            Self::String(bound) | Self::WString(bound) => *bound,
            _ => None,
        }
    }

    pub(crate) fn type_id(&self) -> u8 {
        match self {
            Self::Bool => FIELD_TYPE_BOOLEAN,
            Self::Byte => FIELD_TYPE_BYTE,
            Self::Char | Self::UInt8 => FIELD_TYPE_UINT8,
            Self::Float32 => FIELD_TYPE_FLOAT,
            Self::Float64 => FIELD_TYPE_DOUBLE,
            Self::Int8 => FIELD_TYPE_INT8,
            Self::Int16 => FIELD_TYPE_INT16,
            Self::UInt16 => FIELD_TYPE_UINT16,
            Self::Int32 => FIELD_TYPE_INT32,
            Self::UInt32 => FIELD_TYPE_UINT32,
            Self::Int64 => FIELD_TYPE_INT64,
            Self::UInt64 => FIELD_TYPE_UINT64,
            Self::String(None) => FIELD_TYPE_STRING,
            Self::String(Some(_)) => FIELD_TYPE_BOUNDED_STRING,
            Self::WString(None) => FIELD_TYPE_WSTRING,
            Self::WString(Some(_)) => FIELD_TYPE_BOUNDED_WSTRING,
        }
    }

    /// Zero value of this kind.
    pub fn default_value(&self) -> FieldValue {
        match self {
            Self::Bool => FieldValue::Bool(false),
            Self::Byte => FieldValue::Byte(0),
            Self::Char => FieldValue::Char(0),
            Self::Float32 => FieldValue::Float32(0.0),
            Self::Float64 => FieldValue::Float64(0.0),
            Self::Int8 => FieldValue::Int8(0),
            Self::UInt8 => FieldValue::UInt8(0),
            Self::Int16 => FieldValue::Int16(0),
            Self::UInt16 => FieldValue::UInt16(0),
            Self::Int32 => FieldValue::Int32(0),
            Self::UInt32 => FieldValue::UInt32(0),
            Self::Int64 => FieldValue::Int64(0),
            Self::UInt64 => FieldValue::UInt64(0),
            Self::String(_) => FieldValue::String(String::new()),
            Self::WString(_) => FieldValue::WString(String::new()),
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.msg_name())?;
        if let Some(bound) = self.string_bound() {
            write!(f, "<={bound}")?;
        }
        Ok(())
    }
}

/// Element type of an array or sequence field.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// Primitive elements
    Scalar(ScalarKind),
    /// Message elements
    Nested(Arc<MessageSchema>),
}

impl ElementKind {
    /// Default value of a single element.
    pub fn default_value(&self) -> FieldValue {
        match self {
            Self::Scalar(kind) => kind.default_value(),
            Self::Nested(schema) => FieldValue::Message(crate::DynamicMessage::new(Arc::clone(schema))),
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => write!(f, "{kind}"),
            Self::Nested(schema) => write!(f, "{}", schema.name()),
        }
    }
}

/// Declared type of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Primitive value
    Scalar(ScalarKind),
    /// Nested message
    Nested(Arc<MessageSchema>),
    /// Fixed-size array (`T[N]`)
    Array {
        /// Element type
        element: ElementKind,
        /// Exact number of elements
        len: usize,
    },
    /// Sequence (`T[]` or `T[<=N]`)
    Sequence {
        /// Element type
        element: ElementKind,
        /// Upper bound on the number of elements
        bound: Option<usize>,
    },
}

impl FieldKind {
    /// Default value of a field of this kind: zero, empty, nested default,
    /// or an array of `len` defaults.
    pub fn default_value(&self) -> FieldValue {
        match self {
            Self::Scalar(kind) => kind.default_value(),
            Self::Nested(schema) => FieldValue::Message(crate::DynamicMessage::new(Arc::clone(schema))),
            Self::Array { element, len } => {
                FieldValue::Array((0..*len).map(|_| element.default_value()).collect())
            }
            Self::Sequence { .. } => FieldValue::Array(Vec::new()),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => write!(f, "{kind}"),
            Self::Nested(schema) => write!(f, "{}", schema.name()),
            Self::Array { element, len } => write!(f, "{element}[{len}]"),
            Self::Sequence {
                element,
                bound: Some(bound),
            } => write!(f, "{element}[<={bound}]"),
            Self::Sequence {
                element,
                bound: None,
            } => write!(f, "{element}[]"),
        }
    }
}

/// A single field of a message schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    /// Field name
    pub name: String,
    /// Declared type
    pub kind: FieldKind,
    /// Default value from the definition, if one was given
    pub default: Option<FieldValue>,
}

impl FieldSchema {
    /// Create a field without an explicit default.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
        }
    }

    /// Value a fresh instance holds for this field.
    pub fn default_value(&self) -> FieldValue {
        self.default
            .clone()
            .unwrap_or_else(|| self.kind.default_value())
    }
}

/// Runtime description of a message type.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageSchema {
    name: MessageTypeName,
    fields: Vec<FieldSchema>,
}

impl MessageSchema {
    /// Create a schema from its fields, in declaration order.
    pub fn new(name: MessageTypeName, fields: Vec<FieldSchema>) -> Self {
        Self { name, fields }
    }

    /// Type name.
    pub fn name(&self) -> &MessageTypeName {
        &self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Index of a field in declaration order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Schemas of all message types referenced by this one, directly or
    /// transitively, without duplicates.
    pub fn referenced_schemas(&self) -> Vec<Arc<MessageSchema>> {
        let mut found: Vec<Arc<MessageSchema>> = Vec::new();
        collect_references(self, &mut found);
        found
    }
}

fn collect_references(schema: &MessageSchema, found: &mut Vec<Arc<MessageSchema>>) {
    for field in &schema.fields {
        let nested = match &field.kind {
            FieldKind::Nested(nested)
            | FieldKind::Array {
                element: ElementKind::Nested(nested),
                ..
            }
            | FieldKind::Sequence {
                element: ElementKind::Nested(nested),
                ..
            } => nested,
            _ => continue,
        };
        if found.iter().any(|s| s.name == nested.name) {
            continue;
        }
        found.push(Arc::clone(nested));
        collect_references(nested, found);
    }
}
