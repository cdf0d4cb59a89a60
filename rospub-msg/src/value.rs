//! Field values parsed from YAML text.

use crate::error::{Error, Result};
use yaml_rust2::{Yaml, YamlLoader};

/// A value from the input text, before it is matched against a schema.
///
/// Reals keep their source text so that coercion can parse them at the
/// precision of the target field.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Real(String),
    String(String),
    Sequence(Vec<Value>),
    Mapping(ValueTree),
}

impl Value {
    /// Short description of the value's shape, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::String(_) => "string",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
        }
    }

    /// Parse a single YAML value, e.g. a `.msg` default such as `[1, 2]`.
    pub(crate) fn from_yaml(text: &str) -> Result<Self> {
        let docs = YamlLoader::load_from_str(text)?;
        Ok(docs.into_iter().next().map_or(Self::Null, Value::from))
    }
}

impl From<Yaml> for Value {
    fn from(yaml: Yaml) -> Self {
        match yaml {
            Yaml::Boolean(b) => Self::Bool(b),
            Yaml::Integer(i) => Self::Integer(i),
            Yaml::Real(text) => Self::Real(text),
            Yaml::String(s) => Self::String(s),
            Yaml::Array(items) => Self::Sequence(items.into_iter().map(Value::from).collect()),
            Yaml::Hash(hash) => Self::Mapping(
                hash.into_iter()
                    .map(|(k, v)| (key_text(k), Value::from(v)))
                    .collect(),
            ),
            Yaml::Null | Yaml::Alias(_) | Yaml::BadValue => Self::Null,
        }
    }
}

fn key_text(key: Yaml) -> String {
    match key {
        Yaml::String(s) | Yaml::Real(s) => s,
        Yaml::Integer(i) => i.to_string(),
        Yaml::Boolean(b) => b.to_string(),
        _ => "null".to_string(),
    }
}

/// Ordered mapping from field names to values.
///
/// Entries keep the order in which they appear in the input; inserting an
/// existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueTree {
    entries: Vec<(String, Value)>,
}

impl ValueTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse YAML text such as `{data: hello}` or `"x: 1\ny: 2"`.
    ///
    /// Only the first document is read. Empty text, `{}` and `null` give an
    /// empty tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Yaml`] if the text is not valid YAML and
    /// [`Error::InvalidValues`] if the document is not a mapping.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let docs = YamlLoader::load_from_str(text)?;
        let Some(doc) = docs.into_iter().next() else {
            return Ok(Self::new());
        };
        match Value::from(doc) {
            Value::Null => Ok(Self::new()),
            Value::Mapping(tree) => Ok(tree),
            other => Err(Error::InvalidValues(format!(
                "expected a mapping of field names to values, got a {}",
                other.kind_name()
            ))),
        }
    }

    /// Insert a value, replacing any previous value for the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Value for a key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v))
    }

    /// Entries in input order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Value)> for ValueTree {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut tree = Self::new();
        for (key, value) in iter {
            tree.insert(key, value);
        }
        tree
    }
}
