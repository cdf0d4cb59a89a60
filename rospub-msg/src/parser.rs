//! `.msg` definition parsing.
//!
//! The parser produces a [`MessageDefinition`]: field names, their type
//! references and the raw default text. Type references are resolved into a
//! [`MessageSchema`](crate::MessageSchema) by the
//! [`TypeRegistry`](crate::TypeRegistry).

use crate::{
    error::{Error, Result},
    schema::ScalarKind,
    type_name::MessageTypeName,
};
use regex::Regex;
use std::sync::LazyLock;

/// Comment delimiter
pub const COMMENT_DELIMITER: char = '#';
/// Constant separator
pub const CONSTANT_SEPARATOR: char = '=';
/// Upper bound token of bounded arrays and strings
pub const UPPER_BOUND_TOKEN: &str = "<=";

static FIELD_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]([a-z0-9_])*$").unwrap());

/// Base type of a field, before array decoration.
#[derive(Debug, Clone, PartialEq)]
pub enum BaseType {
    /// Primitive type
    Primitive(ScalarKind),
    /// Reference to another message type
    Named(MessageTypeName),
}

/// Array decoration of a field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArraySpec {
    /// Not an array
    Single,
    /// `T[N]`
    Fixed(usize),
    /// `T[<=N]`
    Bounded(usize),
    /// `T[]`
    Unbounded,
}

/// Declared type of a field.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRef {
    /// Element type
    pub base: BaseType,
    /// Array decoration
    pub array: ArraySpec,
}

/// A field line.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    /// Field name
    pub name: String,
    /// Declared type
    pub type_ref: TypeRef,
    /// Default value text, as written
    pub default: Option<String>,
    /// One-based line number
    pub line: usize,
}

/// A parsed `.msg` file. Constants are recognised and dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageDefinition {
    /// Type being defined
    pub name: MessageTypeName,
    /// Fields in declaration order
    pub fields: Vec<FieldDefinition>,
}

/// Parse the text of a `.msg` file defining `name`.
///
/// # Errors
///
/// Returns [`Error::Parse`] with the offending line number if a line is not a
/// valid field or constant declaration, or if a field name appears twice.
///
/// # Example
///
/// ```
/// use rospub_msg::{MessageTypeName, parser::{ArraySpec, parse_message_definition}};
///
/// let name = MessageTypeName::new("test_msgs", "Sample");
/// let def = parse_message_definition(&name, "int32 LIMIT=5\nint32[<=5] values [1, 2] # sample\n")?;
/// assert_eq!(def.fields.len(), 1);
/// assert_eq!(def.fields[0].type_ref.array, ArraySpec::Bounded(5));
/// assert_eq!(def.fields[0].default.as_deref(), Some("[1, 2]"));
/// # Ok::<(), rospub_msg::Error>(())
/// ```
pub fn parse_message_definition(name: &MessageTypeName, text: &str) -> Result<MessageDefinition> {
    let mut fields: Vec<FieldDefinition> = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let content = strip_comment(raw).trim();
        if content.is_empty() {
            continue;
        }

        let fail = |reason: String| Error::Parse {
            type_name: name.to_string(),
            line,
            reason,
        };

        let Some(field) = parse_line(content, &name.package).map_err(fail)? else {
            continue;
        };
        if fields.iter().any(|f| f.name == field.name) {
            return Err(fail(format!("duplicate field name '{}'", field.name)));
        }
        fields.push(FieldDefinition { line, ..field });
    }

    Ok(MessageDefinition {
        name: name.clone(),
        fields,
    })
}

/// Parse one non-empty line. Constants yield `None`.
fn parse_line(
    content: &str,
    context_package: &str,
) -> std::result::Result<Option<FieldDefinition>, String> {
    let (type_text, rest) = content
        .split_once(char::is_whitespace)
        .ok_or_else(|| format!("'{content}' is missing a field name"))?;
    let rest = rest.trim_start();

    let name_end = rest
        .find(|c: char| c.is_whitespace() || c == CONSTANT_SEPARATOR)
        .unwrap_or(rest.len());
    let (name, remainder) = rest.split_at(name_end);
    let remainder = remainder.trim();

    if remainder.starts_with(CONSTANT_SEPARATOR) {
        // Constants do not occupy space in the message
        parse_type(type_text, context_package)?;
        return Ok(None);
    }

    if !FIELD_NAME_PATTERN.is_match(name) {
        return Err(format!("'{name}' is not a valid field name"));
    }

    Ok(Some(FieldDefinition {
        name: name.to_string(),
        type_ref: parse_type(type_text, context_package)?,
        default: (!remainder.is_empty()).then(|| remainder.to_string()),
        line: 0,
    }))
}

/// Parse a type such as `int32`, `string<=10`, `Point[<=3]` or `std_msgs/Header[]`.
fn parse_type(text: &str, context_package: &str) -> std::result::Result<TypeRef, String> {
    let (base_text, array) = match text.strip_suffix(']') {
        Some(open) => {
            let start = open
                .rfind('[')
                .ok_or_else(|| format!("'{text}' ends with ']' but has no '['"))?;
            let spec = &open[start + 1..];
            let array = if spec.is_empty() {
                ArraySpec::Unbounded
            } else if let Some(bound) = spec.strip_prefix(UPPER_BOUND_TOKEN) {
                ArraySpec::Bounded(parse_size(bound, text)?)
            } else {
                ArraySpec::Fixed(parse_size(spec, text)?)
            };
            (&open[..start], array)
        }
        None => (text, ArraySpec::Single),
    };

    Ok(TypeRef {
        base: parse_base_type(base_text, context_package)?,
        array,
    })
}

fn parse_base_type(text: &str, context_package: &str) -> std::result::Result<BaseType, String> {
    if let Some(kind) = ScalarKind::from_msg_name(text) {
        return Ok(BaseType::Primitive(kind));
    }
    if let Some((base, bound)) = text.split_once(UPPER_BOUND_TOKEN) {
        let bound = Some(parse_size(bound, text)?);
        return match base {
            "string" => Ok(BaseType::Primitive(ScalarKind::String(bound))),
            "wstring" => Ok(BaseType::Primitive(ScalarKind::WString(bound))),
            _ => Err(format!("only strings can be bounded, got '{text}'")),
        };
    }

    let reference = match text {
        "Header" => "std_msgs/Header",
        "time" => "builtin_interfaces/Time",
        "duration" => "builtin_interfaces/Duration",
        other => other,
    };
    MessageTypeName::resolve_reference(reference, context_package)
        .map(BaseType::Named)
        .map_err(|_| format!("'{text}' is not a valid type"))
}

fn parse_size(text: &str, type_text: &str) -> std::result::Result<usize, String> {
    match text.parse::<usize>() {
        Ok(0) | Err(_) => Err(format!(
            "'{type_text}' needs a positive integer size, got '{text}'"
        )),
        Ok(size) => Ok(size),
    }
}

/// Drop a trailing `#` comment, leaving `#` inside quoted defaults alone.
fn strip_comment(line: &str) -> &str {
    let mut quote = None;
    for (i, c) in line.char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), c) if c == q => quote = None,
            (None, COMMENT_DELIMITER) => return &line[..i],
            _ => {}
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<MessageDefinition> {
        parse_message_definition(&MessageTypeName::new("test_msgs", "Sample"), text)
    }

    #[test]
    fn test_fields_and_comments() {
        let def = parse(
            "# leading comment\n\
             \n\
             float64 x  # trailing\n\
             string name \"a # b\"\n\
             Point   where\n",
        )
        .unwrap();
        assert_eq!(def.fields.len(), 3);
        assert_eq!(def.fields[0].name, "x");
        assert_eq!(
            def.fields[0].type_ref,
            TypeRef {
                base: BaseType::Primitive(ScalarKind::Float64),
                array: ArraySpec::Single,
            }
        );
        assert_eq!(def.fields[0].line, 3);
        assert_eq!(def.fields[1].default.as_deref(), Some("\"a # b\""));
        assert_eq!(
            def.fields[2].type_ref.base,
            BaseType::Named(MessageTypeName::new("test_msgs", "Point"))
        );
    }

    #[test]
    fn test_arrays_and_bounds() {
        let def = parse(
            "int32[] a\n\
             uint8[4] b\n\
             float32[<=3] c\n\
             string<=8 d\n\
             wstring<=2[<=5] e\n",
        )
        .unwrap();
        let arrays: Vec<ArraySpec> = def.fields.iter().map(|f| f.type_ref.array).collect();
        assert_eq!(
            arrays,
            [
                ArraySpec::Unbounded,
                ArraySpec::Fixed(4),
                ArraySpec::Bounded(3),
                ArraySpec::Single,
                ArraySpec::Bounded(5),
            ]
        );
        assert_eq!(
            def.fields[3].type_ref.base,
            BaseType::Primitive(ScalarKind::String(Some(8)))
        );
        assert_eq!(
            def.fields[4].type_ref.base,
            BaseType::Primitive(ScalarKind::WString(Some(2)))
        );
    }

    #[test]
    fn test_constants_are_skipped() {
        let def = parse("uint8 RED=1\nuint8 GREEN = 2\nstring NAME=\"x=y\"\nuint8 color\n").unwrap();
        assert_eq!(def.fields.len(), 1);
        assert_eq!(def.fields[0].name, "color");
    }

    #[test]
    fn test_legacy_aliases() {
        let def = parse("Header header\ntime stamp\nduration span\n").unwrap();
        let bases: Vec<&BaseType> = def.fields.iter().map(|f| &f.type_ref.base).collect();
        assert_eq!(
            bases,
            [
                &BaseType::Named(MessageTypeName::new("std_msgs", "Header")),
                &BaseType::Named(MessageTypeName::new("builtin_interfaces", "Time")),
                &BaseType::Named(MessageTypeName::new("builtin_interfaces", "Duration")),
            ]
        );
    }

    #[test]
    fn test_errors_report_line() {
        for (text, line) in [
            ("int32 a\nint32\n", 2),
            ("int32 Bad\n", 1),
            ("int32[0] a\n", 1),
            ("int32[x] a\n", 1),
            ("\nint32<=3 a\n", 2),
            ("int32 a\nint32 a\n", 2),
        ] {
            match parse(text) {
                Err(Error::Parse { line: l, .. }) => assert_eq!(l, line, "{text:?}"),
                other => panic!("{text:?} should fail to parse, got {other:?}"),
            }
        }
    }
}
