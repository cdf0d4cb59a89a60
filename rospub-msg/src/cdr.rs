//! CDR serialization of dynamic messages.
//!
//! Messages are encoded as plain CDR v1, little endian, prefixed with the
//! 4-byte encapsulation header `00 01 00 00`:
//!
//! - primitives are aligned to their own size, counted from the end of the
//!   header
//! - strings are a `u32` length including the NUL terminator, the UTF-8 bytes,
//!   then the terminator
//! - wide strings are a `u32` count of UTF-16 code units, then each unit as a
//!   `u32`
//! - sequences are a `u32` element count followed by the elements; fixed
//!   arrays have no count
//! - a message without fields is a single zero byte

use crate::{
    error::Result,
    message::{DynamicMessage, FieldValue},
    schema::FieldKind,
};
use byteorder::{LittleEndian, WriteBytesExt};
use std::io;

/// CDR little endian encapsulation header.
pub const CDR_LE_HEADER: [u8; 4] = [0x00, 0x01, 0x00, 0x00];

/// Serialize a message, header included.
///
/// # Errors
///
/// Returns [`Error::Io`](crate::Error::Io) if a string or sequence is too long
/// for its `u32` length prefix.
///
/// # Example
///
/// ```
/// use rospub_msg::{MessageTypeName, TypeRegistry, cdr};
///
/// let mut registry = TypeRegistry::new();
/// let msg = registry.new_message(&MessageTypeName::parse("std_msgs/Bool")?)?;
/// assert_eq!(cdr::encode(&msg)?, [0x00, 0x01, 0x00, 0x00, 0x00]);
/// # Ok::<(), rospub_msg::Error>(())
/// ```
pub fn encode(msg: &DynamicMessage) -> Result<Vec<u8>> {
    let mut writer = CdrWriter {
        buf: CDR_LE_HEADER.to_vec(),
    };
    writer.write_message(msg)?;
    Ok(writer.buf)
}

struct CdrWriter {
    buf: Vec<u8>,
}

impl CdrWriter {
    fn align(&mut self, size: usize) {
        let offset = self.buf.len() - CDR_LE_HEADER.len();
        let padding = (size - offset % size) % size;
        self.buf.resize(self.buf.len() + padding, 0);
    }

    fn write_length(&mut self, len: usize) -> io::Result<()> {
        let len = u32::try_from(len).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("length {len} exceeds u32"))
        })?;
        self.align(4);
        self.buf.write_u32::<LittleEndian>(len)
    }

    fn write_message(&mut self, msg: &DynamicMessage) -> io::Result<()> {
        let fields = msg.schema().fields();
        if fields.is_empty() {
            // structure_needs_at_least_one_member
            return self.buf.write_u8(0);
        }
        for (field, value) in fields.iter().zip(msg.values()) {
            match (&field.kind, value) {
                (FieldKind::Sequence { .. }, FieldValue::Array(items)) => {
                    self.write_length(items.len())?;
                    items.iter().try_for_each(|item| self.write_value(item))?;
                }
                (_, value) => self.write_value(value)?,
            }
        }
        Ok(())
    }

    fn write_value(&mut self, value: &FieldValue) -> io::Result<()> {
        match value {
            FieldValue::Bool(v) => self.buf.write_u8(u8::from(*v)),
            FieldValue::Byte(v) | FieldValue::Char(v) | FieldValue::UInt8(v) => {
                self.buf.write_u8(*v)
            }
            FieldValue::Int8(v) => self.buf.write_i8(*v),
            FieldValue::Int16(v) => {
                self.align(2);
                self.buf.write_i16::<LittleEndian>(*v)
            }
            FieldValue::UInt16(v) => {
                self.align(2);
                self.buf.write_u16::<LittleEndian>(*v)
            }
            FieldValue::Int32(v) => {
                self.align(4);
                self.buf.write_i32::<LittleEndian>(*v)
            }
            FieldValue::UInt32(v) => {
                self.align(4);
                self.buf.write_u32::<LittleEndian>(*v)
            }
            FieldValue::Float32(v) => {
                self.align(4);
                self.buf.write_f32::<LittleEndian>(*v)
            }
            FieldValue::Int64(v) => {
                self.align(8);
                self.buf.write_i64::<LittleEndian>(*v)
            }
            FieldValue::UInt64(v) => {
                self.align(8);
                self.buf.write_u64::<LittleEndian>(*v)
            }
            FieldValue::Float64(v) => {
                self.align(8);
                self.buf.write_f64::<LittleEndian>(*v)
            }
            FieldValue::String(s) => {
                self.write_length(s.len() + 1)?;
                self.buf.extend_from_slice(s.as_bytes());
                self.buf.write_u8(0)
            }
            FieldValue::WString(s) => {
                let units: Vec<u16> = s.encode_utf16().collect();
                self.write_length(units.len())?;
                units
                    .iter()
                    .try_for_each(|unit| self.buf.write_u32::<LittleEndian>(u32::from(*unit)))
            }
            FieldValue::Message(msg) => self.write_message(msg),
            FieldValue::Array(items) => items.iter().try_for_each(|item| self.write_value(item)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ElementKind, FieldSchema, MessageSchema, MessageTypeName, ScalarKind, TypeRegistry,
    };
    use std::sync::Arc;

    fn message(package: &str, name: &str) -> DynamicMessage {
        TypeRegistry::new()
            .new_message(&MessageTypeName::new(package, name))
            .unwrap()
    }

    #[test]
    fn test_string() {
        let mut msg = message("std_msgs", "String");
        msg.set("data", FieldValue::String("hello".into())).unwrap();
        assert_eq!(
            encode(&msg).unwrap(),
            [0, 1, 0, 0, 6, 0, 0, 0, b'h', b'e', b'l', b'l', b'o', 0]
        );
    }

    #[test]
    fn test_point() {
        let mut msg = message("geometry_msgs", "Point");
        msg.set("y", FieldValue::Float64(1.0)).unwrap();
        let bytes = encode(&msg).unwrap();
        assert_eq!(bytes.len(), 4 + 24);
        assert_eq!(bytes[12..20], 1.0f64.to_le_bytes());
    }

    #[test]
    fn test_empty_message() {
        assert_eq!(encode(&message("std_msgs", "Empty")).unwrap(), [0, 1, 0, 0, 0]);
    }

    #[test]
    fn test_alignment_and_sequences() {
        let schema = Arc::new(MessageSchema::new(
            MessageTypeName::new("test_msgs", "Mixed"),
            vec![
                FieldSchema::new("flag", FieldKind::Scalar(ScalarKind::Bool)),
                FieldSchema::new(
                    "values",
                    FieldKind::Sequence {
                        element: ElementKind::Scalar(ScalarKind::Int16),
                        bound: None,
                    },
                ),
                FieldSchema::new(
                    "pair",
                    FieldKind::Array {
                        element: ElementKind::Scalar(ScalarKind::UInt8),
                        len: 2,
                    },
                ),
                FieldSchema::new("wide", FieldKind::Scalar(ScalarKind::WString(None))),
            ],
        ));
        let mut msg = DynamicMessage::new(schema);
        msg.set("flag", FieldValue::Bool(true)).unwrap();
        msg.set(
            "values",
            FieldValue::Array(vec![FieldValue::Int16(-1), FieldValue::Int16(2)]),
        )
        .unwrap();
        msg.set(
            "pair",
            FieldValue::Array(vec![FieldValue::UInt8(7), FieldValue::UInt8(8)]),
        )
        .unwrap();
        msg.set("wide", FieldValue::WString("é".into())).unwrap();

        assert_eq!(
            encode(&msg).unwrap(),
            [
                0, 1, 0, 0, // header
                1, 0, 0, 0, // flag + padding
                2, 0, 0, 0, // sequence length
                0xff, 0xff, 2, 0, // values
                7, 8, 0, 0, // pair + padding
                1, 0, 0, 0, // wide length
                0xe9, 0, 0, 0, // 'é'
            ]
        );
    }
}
