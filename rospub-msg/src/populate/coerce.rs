//! Scalar coercion.
//!
//! Conversion happens in two steps. [`coerce`] turns an input [`Value`] into a
//! [`Candidate`] of the right family (integer, float, bool or text) and fails
//! with a [`CoerceError`] when the value is malformed. [`Candidate::narrow`]
//! then fits the candidate into the declared width, which is an assignment
//! concern and fails with an [`AssignError`].

use crate::{message::AssignError, message::FieldValue, schema::ScalarKind, value::Value};
use std::num::{ParseFloatError, ParseIntError};
use thiserror::Error;

/// A value that cannot be converted to a field's scalar type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoerceError {
    /// Text is not an integer
    #[error("invalid literal for {kind}: '{text}' ({source})")]
    InvalidInteger {
        /// Target type
        kind: &'static str,
        /// Offending text
        text: String,
        /// Parser error
        source: ParseIntError,
    },

    /// Text is not a floating point number
    #[error("could not convert string to {kind}: '{text}' ({source})")]
    InvalidFloat {
        /// Target type
        kind: &'static str,
        /// Offending text
        text: String,
        /// Parser error
        source: ParseFloatError,
    },

    /// Text is not a single character
    #[error("expected a single character for char, got '{text}'")]
    InvalidChar {
        /// Offending text
        text: String,
    },

    /// Value has no boolean reading
    #[error("invalid literal for bool: '{text}'")]
    InvalidBool {
        /// Offending text
        text: String,
    },

    /// Infinity or NaN given for an integer field
    #[error("cannot convert '{text}' to {kind}: not a finite number")]
    NotFinite {
        /// Target type
        kind: &'static str,
        /// Offending text
        text: String,
    },

    /// Value has the wrong shape altogether
    #[error("expected {expected}, got {found}")]
    TypeMismatch {
        /// Expected type or shape
        expected: String,
        /// Shape of the value given
        found: &'static str,
    },
}

impl CoerceError {
    pub(crate) fn mismatch(expected: impl ToString, found: &Value) -> Self {
        Self::TypeMismatch {
            expected: expected.to_string(),
            found: found.kind_name(),
        }
    }
}

/// Result of coercion, before narrowing to the declared width.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Candidate {
    /// `text` keeps the input when it was not an integer literal, so range
    /// errors report what was written
    Integer { value: i128, text: Option<String> },
    Float(f64),
    Bool(bool),
    Text(String),
}

/// Convert a value to the family of `kind`.
pub(crate) fn coerce(kind: ScalarKind, value: &Value) -> Result<Candidate, CoerceError> {
    match kind {
        ScalarKind::Char => to_char(value),
        ScalarKind::Byte
        | ScalarKind::Int8
        | ScalarKind::UInt8
        | ScalarKind::Int16
        | ScalarKind::UInt16
        | ScalarKind::Int32
        | ScalarKind::UInt32
        | ScalarKind::Int64
        | ScalarKind::UInt64 => to_integer(kind, value),
        ScalarKind::Float32 | ScalarKind::Float64 => to_float(kind, value).map(Candidate::Float),
        ScalarKind::Bool => to_bool(value).map(Candidate::Bool),
        ScalarKind::String(_) | ScalarKind::WString(_) => to_text(kind, value).map(Candidate::Text),
    }
}

fn integer(value: i128) -> Candidate {
    Candidate::Integer { value, text: None }
}

fn to_integer(kind: ScalarKind, value: &Value) -> Result<Candidate, CoerceError> {
    match value {
        Value::Integer(i) => Ok(integer(i128::from(*i))),
        Value::Bool(b) => Ok(integer(i128::from(*b))),
        Value::Real(text) => {
            // Integers too large for i64 come out of YAML as reals
            if let Ok(i) = text.trim().parse::<i128>() {
                return Ok(integer(i));
            }
            let float = parse_float(kind, text)?;
            if !float.is_finite() {
                return Err(CoerceError::NotFinite {
                    kind: kind.msg_name(),
                    text: text.clone(),
                });
            }
            // Saturates past i128, which no field type can hold anyway
            Ok(Candidate::Integer {
                value: float.trunc() as i128,
                text: Some(text.clone()),
            })
        }
        Value::String(text) => parse_integer(kind, text).map(integer),
        other => Err(CoerceError::mismatch(kind, other)),
    }
}

/// A `char` is written as a one-character string, or as its code.
fn to_char(value: &Value) -> Result<Candidate, CoerceError> {
    match value {
        Value::Integer(i) => Ok(integer(i128::from(*i))),
        Value::String(text) => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Candidate::Integer {
                    value: i128::from(u32::from(c)),
                    text: Some(text.clone()),
                }),
                _ => Err(CoerceError::InvalidChar { text: text.clone() }),
            }
        }
        Value::Real(text) => Err(CoerceError::InvalidChar { text: text.clone() }),
        other => Err(CoerceError::mismatch(ScalarKind::Char, other)),
    }
}

fn parse_integer(kind: ScalarKind, text: &str) -> Result<i128, CoerceError> {
    let trimmed = text.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let (radix, digits) = match unsigned.get(..2) {
        Some("0x" | "0X") => (16, &unsigned[2..]),
        Some("0o" | "0O") => (8, &unsigned[2..]),
        Some("0b" | "0B") => (2, &unsigned[2..]),
        _ => (10, unsigned),
    };
    // A second sign is invalid; parsing the full text reports it
    let parsed = if digits.starts_with(['+', '-']) {
        i128::from_str_radix(trimmed, radix)
    } else {
        i128::from_str_radix(digits, radix).map(|m| if negative { -m } else { m })
    };
    parsed.map_err(|source| CoerceError::InvalidInteger {
        kind: kind.msg_name(),
        text: text.to_string(),
        source,
    })
}

fn to_float(kind: ScalarKind, value: &Value) -> Result<f64, CoerceError> {
    match value {
        Value::Integer(i) => Ok(*i as f64),
        Value::Bool(b) => Ok(f64::from(u8::from(*b))),
        Value::Real(text) | Value::String(text) => parse_float(kind, text),
        other => Err(CoerceError::mismatch(kind, other)),
    }
}

fn parse_float(kind: ScalarKind, text: &str) -> Result<f64, CoerceError> {
    let trimmed = text.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        ".inf" | "+.inf" => Ok(f64::INFINITY),
        "-.inf" => Ok(f64::NEG_INFINITY),
        ".nan" => Ok(f64::NAN),
        _ => trimmed
            .parse::<f64>()
            .map_err(|source| CoerceError::InvalidFloat {
                kind: kind.msg_name(),
                text: text.to_string(),
                source,
            }),
    }
}

fn to_bool(value: &Value) -> Result<bool, CoerceError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Integer(i) => Ok(*i != 0),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(CoerceError::InvalidBool { text: text.clone() }),
        },
        Value::Real(text) => Err(CoerceError::InvalidBool { text: text.clone() }),
        other => Err(CoerceError::mismatch(ScalarKind::Bool, other)),
    }
}

fn to_text(kind: ScalarKind, value: &Value) -> Result<String, CoerceError> {
    match value {
        Value::String(s) | Value::Real(s) => Ok(s.clone()),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(CoerceError::mismatch(kind.msg_name(), other)),
    }
}

impl Candidate {
    fn kind_name(&self) -> &'static str {
        match self {
            Self::Integer { .. } => "integer",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::Text(_) => "string",
        }
    }

    /// Fit the candidate into `kind`.
    pub(crate) fn narrow(self, kind: ScalarKind) -> Result<FieldValue, AssignError> {
        match (self, kind) {
            (Self::Integer { value, text }, kind) => match kind {
                ScalarKind::Byte => fit(value, text, kind, FieldValue::Byte),
                ScalarKind::Char => fit(value, text, kind, FieldValue::Char),
                ScalarKind::Int8 => fit(value, text, kind, FieldValue::Int8),
                ScalarKind::UInt8 => fit(value, text, kind, FieldValue::UInt8),
                ScalarKind::Int16 => fit(value, text, kind, FieldValue::Int16),
                ScalarKind::UInt16 => fit(value, text, kind, FieldValue::UInt16),
                ScalarKind::Int32 => fit(value, text, kind, FieldValue::Int32),
                ScalarKind::UInt32 => fit(value, text, kind, FieldValue::UInt32),
                ScalarKind::Int64 => fit(value, text, kind, FieldValue::Int64),
                ScalarKind::UInt64 => fit(value, text, kind, FieldValue::UInt64),
                _ => Err(AssignError::KindMismatch {
                    expected: kind.to_string(),
                    found: "integer".to_string(),
                }),
            },
            (Self::Float(v), ScalarKind::Float32) => {
                if v.is_finite() && v.abs() > f64::from(f32::MAX) {
                    return Err(AssignError::OutOfRange {
                        value: v.to_string(),
                        kind: kind.msg_name(),
                    });
                }
                Ok(FieldValue::Float32(v as f32))
            }
            (Self::Float(v), ScalarKind::Float64) => Ok(FieldValue::Float64(v)),
            (Self::Bool(b), ScalarKind::Bool) => Ok(FieldValue::Bool(b)),
            (Self::Text(s), ScalarKind::String(_)) => Ok(FieldValue::String(s)),
            (Self::Text(s), ScalarKind::WString(_)) => Ok(FieldValue::WString(s)),
            (candidate, kind) => Err(AssignError::KindMismatch {
                expected: kind.to_string(),
                found: candidate.kind_name().to_string(),
            }),
        }
    }
}

fn fit<T: TryFrom<i128>>(
    value: i128,
    text: Option<String>,
    kind: ScalarKind,
    wrap: fn(T) -> FieldValue,
) -> Result<FieldValue, AssignError> {
    T::try_from(value)
        .map(wrap)
        .map_err(|_| AssignError::OutOfRange {
            value: text.unwrap_or_else(|| value.to_string()),
            kind: kind.msg_name(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(kind: ScalarKind, value: Value) -> Result<FieldValue, String> {
        coerce(kind, &value)
            .map_err(|e| e.to_string())?
            .narrow(kind)
            .map_err(|e| e.to_string())
    }

    #[test]
    fn test_integers() {
        let int32 = ScalarKind::Int32;
        assert_eq!(scalar(int32, Value::Integer(7)), Ok(FieldValue::Int32(7)));
        assert_eq!(scalar(int32, Value::Bool(true)), Ok(FieldValue::Int32(1)));
        assert_eq!(
            scalar(int32, Value::Real("-2.9".into())),
            Ok(FieldValue::Int32(-2))
        );
        assert_eq!(
            scalar(int32, Value::String(" -0x10 ".into())),
            Ok(FieldValue::Int32(-16))
        );
        assert_eq!(
            scalar(int32, Value::String("0b101".into())),
            Ok(FieldValue::Int32(5))
        );
        assert_eq!(
            scalar(
                ScalarKind::UInt64,
                Value::Real("18446744073709551615".into())
            ),
            Ok(FieldValue::UInt64(u64::MAX))
        );
    }

    #[test]
    fn test_malformed_integers() {
        for text in ["abc", "", "1.5", "--5", "+-5", "0x"] {
            assert!(
                matches!(
                    coerce(ScalarKind::Int64, &Value::String(text.into())),
                    Err(CoerceError::InvalidInteger { .. })
                ),
                "{text:?}"
            );
        }
        assert!(matches!(
            coerce(ScalarKind::Int64, &Value::Real(".inf".into())),
            Err(CoerceError::NotFinite { .. })
        ));
        assert!(matches!(
            coerce(ScalarKind::Int64, &Value::Null),
            Err(CoerceError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_narrowing_is_an_assignment_error() {
        let candidate = coerce(ScalarKind::UInt8, &Value::Integer(300)).unwrap();
        assert_eq!(
            candidate.narrow(ScalarKind::UInt8),
            Err(AssignError::OutOfRange {
                value: "300".into(),
                kind: "uint8"
            })
        );
        let candidate = coerce(ScalarKind::Float32, &Value::Real("1e300".into())).unwrap();
        assert!(matches!(
            candidate.narrow(ScalarKind::Float32),
            Err(AssignError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_out_of_range_real_keeps_its_text() {
        for text in ["1e40", "1e20", "-3.5e9"] {
            assert_eq!(
                scalar(ScalarKind::Int32, Value::Real(text.into())),
                Err(format!("value {text} is out of range for type 'int32'"))
            );
        }
        assert_eq!(
            scalar(ScalarKind::UInt64, Value::Real("-1e300".into())),
            Err("value -1e300 is out of range for type 'uint64'".into())
        );
    }

    #[test]
    fn test_chars() {
        let kind = ScalarKind::Char;
        assert_eq!(scalar(kind, Value::String("a".into())), Ok(FieldValue::Char(b'a')));
        assert_eq!(scalar(kind, Value::String("é".into())), Ok(FieldValue::Char(0xe9)));
        assert_eq!(scalar(kind, Value::Integer(65)), Ok(FieldValue::Char(b'A')));
        for text in ["65", "ab", ""] {
            assert_eq!(
                coerce(kind, &Value::String(text.into())),
                Err(CoerceError::InvalidChar { text: text.into() })
            );
        }
        assert!(matches!(
            coerce(kind, &Value::Real("1.5".into())),
            Err(CoerceError::InvalidChar { .. })
        ));
        assert_eq!(
            scalar(kind, Value::String("ā".into())),
            Err("value ā is out of range for type 'char'".into())
        );
    }

    #[test]
    fn test_floats() {
        let float64 = ScalarKind::Float64;
        assert_eq!(scalar(float64, Value::Integer(2)), Ok(FieldValue::Float64(2.0)));
        assert_eq!(
            scalar(float64, Value::String("1e-3".into())),
            Ok(FieldValue::Float64(0.001))
        );
        assert_eq!(
            scalar(float64, Value::Real("-.inf".into())),
            Ok(FieldValue::Float64(f64::NEG_INFINITY))
        );
        assert!(matches!(
            coerce(float64, &Value::Real(".NaN".into())),
            Ok(Candidate::Float(v)) if v.is_nan()
        ));
        assert!(matches!(
            coerce(float64, &Value::String("notanumber".into())),
            Err(CoerceError::InvalidFloat { .. })
        ));
    }

    #[test]
    fn test_bools() {
        for (value, expected) in [
            (Value::Bool(true), true),
            (Value::Integer(0), false),
            (Value::Integer(-3), true),
            (Value::String("Yes".into()), true),
            (Value::String("off".into()), false),
        ] {
            assert_eq!(scalar(ScalarKind::Bool, value), Ok(FieldValue::Bool(expected)));
        }
        assert!(matches!(
            coerce(ScalarKind::Bool, &Value::String("maybe".into())),
            Err(CoerceError::InvalidBool { .. })
        ));
    }

    #[test]
    fn test_text() {
        let string = ScalarKind::String(None);
        assert_eq!(
            scalar(string, Value::Real("1.50".into())),
            Ok(FieldValue::String("1.50".into()))
        );
        assert_eq!(
            scalar(string, Value::Bool(false)),
            Ok(FieldValue::String("false".into()))
        );
        assert!(matches!(
            coerce(string, &Value::Sequence(vec![])),
            Err(CoerceError::TypeMismatch { found: "sequence", .. })
        ));
    }
}
