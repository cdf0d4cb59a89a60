//! Message type registry.

use crate::{
    builtin,
    error::{Error, Result},
    message::{DynamicMessage, FieldValue, check_field},
    parser::{ArraySpec, BaseType, FieldDefinition, TypeRef, parse_message_definition},
    populate::{FieldError, build_field},
    schema::{ElementKind, FieldKind, FieldSchema, MessageSchema},
    type_name::MessageTypeName,
    value::Value,
};
use std::{
    collections::HashMap,
    env, fs,
    path::{Path, PathBuf},
    sync::Arc,
};

/// Environment variable listing ROS2 install prefixes.
pub const AMENT_PREFIX_PATH: &str = "AMENT_PREFIX_PATH";

/// Resolves message type names to schemas.
///
/// Definitions are looked up, in order, in:
/// 1. the extra search roots, as `<root>/<package>/msg/<Name>.msg`
/// 2. the ament prefixes, as `<prefix>/share/<package>/msg/<Name>.msg`
/// 3. the embedded definitions of `builtin_interfaces`, `std_msgs` and common
///    `geometry_msgs` types
///
/// Resolved schemas are cached, so nested types shared by several messages
/// are parsed once and share the same [`Arc`].
#[derive(Debug, Default)]
pub struct TypeRegistry {
    search_paths: Vec<PathBuf>,
    ament_prefixes: Vec<PathBuf>,
    cache: HashMap<MessageTypeName, Arc<MessageSchema>>,
}

impl TypeRegistry {
    /// Registry backed by the embedded definitions only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry that also searches the prefixes listed in `AMENT_PREFIX_PATH`.
    pub fn from_env() -> Self {
        let ament_prefixes = env::var_os(AMENT_PREFIX_PATH)
            .map(|value| env::split_paths(&value).collect())
            .unwrap_or_default();
        Self {
            ament_prefixes,
            ..Self::default()
        }
    }

    /// Add a search root holding `<package>/msg/<Name>.msg` files.
    #[must_use]
    pub fn with_search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.add_search_path(path);
        self
    }

    /// Add a search root holding `<package>/msg/<Name>.msg` files.
    pub fn add_search_path(&mut self, path: impl Into<PathBuf>) {
        self.search_paths.push(path.into());
    }

    /// Resolve a type and everything it references.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownType`] if no definition is found for the type or one
    ///   of its nested types
    /// - [`Error::Parse`] or [`Error::InvalidDefault`] if a definition is malformed
    /// - [`Error::RecursiveType`] if a type contains itself
    /// - [`Error::Io`] if a definition file exists but cannot be read
    pub fn resolve(&mut self, name: &MessageTypeName) -> Result<Arc<MessageSchema>> {
        self.resolve_inner(name, &mut Vec::new())
    }

    /// Build a default-valued instance of a type.
    ///
    /// # Errors
    ///
    /// See [`resolve`](Self::resolve).
    pub fn new_message(&mut self, name: &MessageTypeName) -> Result<DynamicMessage> {
        Ok(DynamicMessage::new(self.resolve(name)?))
    }

    fn resolve_inner(
        &mut self,
        name: &MessageTypeName,
        stack: &mut Vec<MessageTypeName>,
    ) -> Result<Arc<MessageSchema>> {
        if let Some(schema) = self.cache.get(name) {
            return Ok(Arc::clone(schema));
        }
        if stack.contains(name) {
            return Err(Error::RecursiveType(name.to_string()));
        }

        let text = self.load(name)?;
        let definition = parse_message_definition(name, &text)?;

        stack.push(name.clone());
        let fields = definition
            .fields
            .iter()
            .map(|field| self.resolve_field(name, field, stack))
            .collect::<Result<Vec<_>>>();
        stack.pop();

        let schema = Arc::new(MessageSchema::new(name.clone(), fields?));
        self.cache.insert(name.clone(), Arc::clone(&schema));
        Ok(schema)
    }

    fn resolve_field(
        &mut self,
        owner: &MessageTypeName,
        field: &FieldDefinition,
        stack: &mut Vec<MessageTypeName>,
    ) -> Result<FieldSchema> {
        let kind = self.resolve_kind(&field.type_ref, stack)?;
        let default = field
            .default
            .as_deref()
            .map(|text| -> Result<FieldValue> {
                let value = Value::from_yaml(text)?;
                build_field(&kind, &value)
                    .and_then(|v| check_field(&kind, &v).map(|()| v).map_err(FieldError::here))
                    .map_err(|e| Error::InvalidDefault {
                        type_name: owner.to_string(),
                        field: field.name.clone(),
                        cause: e.cause().clone(),
                    })
            })
            .transpose()?;
        Ok(FieldSchema {
            name: field.name.clone(),
            kind,
            default,
        })
    }

    fn resolve_kind(
        &mut self,
        type_ref: &TypeRef,
        stack: &mut Vec<MessageTypeName>,
    ) -> Result<FieldKind> {
        let element = match &type_ref.base {
            BaseType::Primitive(kind) => ElementKind::Scalar(*kind),
            BaseType::Named(name) => ElementKind::Nested(self.resolve_inner(name, stack)?),
        };
        Ok(match (type_ref.array, element) {
            (ArraySpec::Single, ElementKind::Scalar(kind)) => FieldKind::Scalar(kind),
            (ArraySpec::Single, ElementKind::Nested(schema)) => FieldKind::Nested(schema),
            (ArraySpec::Fixed(len), element) => FieldKind::Array { element, len },
            (ArraySpec::Bounded(bound), element) => FieldKind::Sequence {
                element,
                bound: Some(bound),
            },
            (ArraySpec::Unbounded, element) => FieldKind::Sequence {
                element,
                bound: None,
            },
        })
    }

    fn load(&self, name: &MessageTypeName) -> Result<String> {
        let relative = Path::new(&name.package)
            .join(&name.interface)
            .join(format!("{}.msg", name.name));

        let candidates = self
            .search_paths
            .iter()
            .map(|root| root.join(&relative))
            .chain(
                self.ament_prefixes
                    .iter()
                    .map(|prefix| prefix.join("share").join(&relative)),
            );
        for path in candidates {
            if path.is_file() {
                tracing::debug!("Loading {name} from {}", path.display());
                return Ok(fs::read_to_string(&path)?);
            }
        }

        if let Some(text) = builtin::lookup(&name.package, &name.name) {
            tracing::debug!("Using embedded definition of {name}");
            return Ok(text.to_string());
        }
        Err(Error::UnknownType(name.to_string()))
    }
}
