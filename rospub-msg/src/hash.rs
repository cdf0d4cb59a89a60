//! RIHS01 type hash.
//!
//! Implements the ROS Interface Hashing Standard version 1 over a
//! [`MessageSchema`]: the type description and all referenced type
//! descriptions are rendered as canonical JSON and hashed with SHA256.

use crate::schema::{
    ARRAY_OFFSET, BOUNDED_SEQUENCE_OFFSET, ElementKind, FIELD_TYPE_NESTED_TYPE, FIELD_TYPE_UINT8,
    FieldKind, MessageSchema, UNBOUNDED_SEQUENCE_OFFSET,
};
use sha2::{Digest, Sha256};

/// RIHS01 version prefix
const RIHS01_PREFIX: &str = "RIHS01_";

/// Field inserted in the description of messages without fields.
const EMPTY_STRUCT_MEMBER: &str = "structure_needs_at_least_one_member";

/// Compute the `RIHS01_<sha256 hex>` hash of a message type.
///
/// The canonical form matches `rosidl_generator_type_description`:
/// - default values are left out
/// - JSON uses the separators `", "` and `": "` and keeps key insertion order
/// - `type_description` comes first, then `referenced_type_descriptions`
///   sorted by type name
pub fn type_hash(schema: &MessageSchema) -> String {
    let mut refs = schema.referenced_schemas();
    refs.sort_by(|a, b| a.name().full_name().cmp(&b.name().full_name()));
    let refs_json: Vec<String> = refs.iter().map(|s| type_description_json(s)).collect();

    let hashable = format!(
        r#"{{"type_description": {}, "referenced_type_descriptions": [{}]}}"#,
        type_description_json(schema),
        refs_json.join(", ")
    );

    let digest = Sha256::digest(hashable.as_bytes());
    format!("{RIHS01_PREFIX}{digest:x}")
}

/// DDS type name (`package::msg::dds_::Name_`).
pub fn dds_type_name(schema: &MessageSchema) -> String {
    schema.name().dds_name()
}

fn type_description_json(schema: &MessageSchema) -> String {
    let fields: Vec<String> = if schema.fields().is_empty() {
        vec![field_json(EMPTY_STRUCT_MEMBER, FIELD_TYPE_UINT8, 0, 0, "")]
    } else {
        schema
            .fields()
            .iter()
            .map(|f| {
                let (type_id, capacity, string_capacity, nested) = describe(&f.kind);
                field_json(&f.name, type_id, capacity, string_capacity, &nested)
            })
            .collect()
    };
    format!(
        r#"{{"type_name": "{}", "fields": [{}]}}"#,
        escape(&schema.name().full_name()),
        fields.join(", ")
    )
}

fn field_json(
    name: &str,
    type_id: u8,
    capacity: usize,
    string_capacity: usize,
    nested_type_name: &str,
) -> String {
    format!(
        r#"{{"name": "{}", "type": {{"type_id": {type_id}, "capacity": {capacity}, "string_capacity": {string_capacity}, "nested_type_name": "{}"}}}}"#,
        escape(name),
        escape(nested_type_name)
    )
}

/// `(type_id, capacity, string_capacity, nested_type_name)` of a field.
fn describe(kind: &FieldKind) -> (u8, usize, usize, String) {
    let (element, offset, capacity) = match kind {
        FieldKind::Scalar(scalar) => {
            return (scalar.type_id(), 0, scalar.string_bound().unwrap_or(0), String::new());
        }
        FieldKind::Nested(schema) => {
            return (FIELD_TYPE_NESTED_TYPE, 0, 0, schema.name().full_name());
        }
        FieldKind::Array { element, len } => (element, ARRAY_OFFSET, *len),
        FieldKind::Sequence {
            element,
            bound: Some(bound),
        } => (element, BOUNDED_SEQUENCE_OFFSET, *bound),
        FieldKind::Sequence {
            element,
            bound: None,
        } => (element, UNBOUNDED_SEQUENCE_OFFSET, 0),
    };
    match element {
        ElementKind::Scalar(scalar) => (
            scalar.type_id() + offset,
            capacity,
            scalar.string_bound().unwrap_or(0),
            String::new(),
        ),
        ElementKind::Nested(schema) => (
            FIELD_TYPE_NESTED_TYPE + offset,
            capacity,
            0,
            schema.name().full_name(),
        ),
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
