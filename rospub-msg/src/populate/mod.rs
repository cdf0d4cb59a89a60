//! Field population.
//!
//! [`populate`] walks a [`ValueTree`] and assigns each entry to the field of
//! the same name. The field's [`FieldKind`] decides what happens to the value:
//! scalars are coerced, nested messages are built from a mapping by recursion,
//! arrays and sequences are built element by element. A failure is reported as
//! a [`FieldError`] whose path is extended by every enclosing level.

mod coerce;
mod path;

pub use coerce::CoerceError;
pub use path::{FieldCause, FieldError, FieldPath, PathSegment};

use crate::{
    message::{DynamicMessage, FieldValue},
    schema::{ElementKind, FieldKind, MessageSchema, ScalarKind},
    value::{Value, ValueTree},
};
use std::sync::Arc;

/// Assign every entry of `values` to the field of the same name in `target`.
///
/// Entries are processed in input order and the first failure stops the walk.
/// Fields assigned before the failure keep their new value; a nested message
/// that fails is never assigned, so `target` holds no half-built sub-message.
///
/// # Errors
///
/// Returns a [`FieldError`] naming the deepest failing field:
/// - [`FieldCause::UnknownField`] if the message has no such field
/// - [`FieldCause::Malformed`] if a value cannot be converted to the field type
/// - [`FieldCause::Rejected`] if the converted value does not fit the field
///
/// # Example
///
/// ```
/// use rospub_msg::{FieldCause, MessageTypeName, TypeRegistry, ValueTree, populate};
///
/// let mut registry = TypeRegistry::new();
/// let mut msg = registry.new_message(&MessageTypeName::parse("geometry_msgs/Pose")?)?;
///
/// let values = ValueTree::from_yaml("{position: {x: notanumber}}")?;
/// let err = populate(&mut msg, &values).unwrap_err();
/// assert_eq!(err.path().to_string(), "position.x");
/// assert!(matches!(err.cause(), FieldCause::Malformed(_)));
/// # Ok::<(), rospub_msg::Error>(())
/// ```
pub fn populate(target: &mut DynamicMessage, values: &ValueTree) -> Result<(), FieldError> {
    let schema = Arc::clone(target.schema());
    for (name, value) in values.iter() {
        let field = schema.field(name).ok_or_else(|| {
            FieldError::here(FieldCause::UnknownField {
                type_name: schema.name().to_string(),
                field: name.to_string(),
            })
            .within(name)
        })?;
        let built = build_field(&field.kind, value).map_err(|e| e.within(name))?;
        target
            .set(name, built)
            .map_err(|e| FieldError::here(e).within(name))?;
    }
    Ok(())
}

/// Build the value of a field of kind `kind` from `value`.
///
/// Errors carry the path below the field; the caller adds the field name.
pub(crate) fn build_field(kind: &FieldKind, value: &Value) -> Result<FieldValue, FieldError> {
    match kind {
        FieldKind::Scalar(scalar) => build_scalar(*scalar, value),
        FieldKind::Nested(schema) => build_message(schema, value),
        FieldKind::Array { element, .. } | FieldKind::Sequence { element, .. } => {
            let Value::Sequence(items) = value else {
                return Err(FieldError::here(CoerceError::mismatch(kind, value)));
            };
            items
                .iter()
                .enumerate()
                .map(|(i, item)| build_element(element, item).map_err(|e| e.at_index(i)))
                .collect::<Result<Vec<_>, _>>()
                .map(FieldValue::Array)
        }
    }
}

fn build_element(element: &ElementKind, value: &Value) -> Result<FieldValue, FieldError> {
    match element {
        ElementKind::Scalar(scalar) => build_scalar(*scalar, value),
        ElementKind::Nested(schema) => build_message(schema, value),
    }
}

fn build_scalar(kind: ScalarKind, value: &Value) -> Result<FieldValue, FieldError> {
    coerce::coerce(kind, value)
        .map_err(FieldError::here)?
        .narrow(kind)
        .map_err(FieldError::here)
}

fn build_message(schema: &Arc<MessageSchema>, value: &Value) -> Result<FieldValue, FieldError> {
    let Value::Mapping(tree) = value else {
        return Err(FieldError::here(CoerceError::mismatch(schema.name(), value)));
    };
    let mut nested = DynamicMessage::new(Arc::clone(schema));
    populate(&mut nested, tree)?;
    Ok(FieldValue::Message(nested))
}
