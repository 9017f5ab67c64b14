//! The hierarchical config tree consumed by the section parsers.

use std::borrow::Cow;

use crate::error::IngestResult;

/// Whether a node holds a value or a block of children.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Scalar,
    Compound,
}

/// Read-only view of one node in a configuration tree.
///
/// Parsers only need these four operations, so any tree format can be
/// plugged in by implementing this trait.
pub trait ConfigNode {
    /// The node's own key.
    fn id(&self) -> &str;

    fn kind(&self) -> NodeKind;

    /// The value of a scalar node, rendered as a string. `None` for
    /// compound nodes.
    fn string_value(&self) -> Option<Cow<'_, str>>;

    /// Children of a compound node in document order. Empty for scalars.
    fn children(&self) -> Vec<&Self>;
}

/// Value held by a [`ConfigTree`] node.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigValue {
    String(String),
    Integer(i64),
    Compound(Vec<ConfigTree>),
}

/// An owned, in-memory config tree.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigTree {
    id: String,
    value: ConfigValue,
}

impl ConfigTree {
    pub fn scalar(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: ConfigValue::String(value.into()),
        }
    }

    pub fn integer(id: impl Into<String>, value: i64) -> Self {
        Self {
            id: id.into(),
            value: ConfigValue::Integer(value),
        }
    }

    pub fn compound(id: impl Into<String>, children: Vec<ConfigTree>) -> Self {
        Self {
            id: id.into(),
            value: ConfigValue::Compound(children),
        }
    }

    /// Parse a TOML document into a tree rooted at an anonymous node.
    ///
    /// Tables become compound nodes with their keys as ids, arrays become
    /// compound nodes with ids `"0"`, `"1"`, ..., and booleans, floats and
    /// datetimes become string scalars.
    pub fn from_toml_str(source: &str) -> IngestResult<Self> {
        let table: toml::Table = source.parse()?;
        Ok(Self::from_toml_value(String::new(), toml::Value::Table(table)))
    }

    fn from_toml_value(id: String, value: toml::Value) -> Self {
        use toml::Value;

        let value = match value {
            Value::String(s) => ConfigValue::String(s),
            Value::Integer(i) => ConfigValue::Integer(i),
            Value::Float(f) => ConfigValue::String(f.to_string()),
            Value::Boolean(b) => ConfigValue::String(b.to_string()),
            Value::Datetime(d) => ConfigValue::String(d.to_string()),
            Value::Array(items) => ConfigValue::Compound(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, v)| Self::from_toml_value(i.to_string(), v))
                    .collect(),
            ),
            Value::Table(table) => ConfigValue::Compound(
                table
                    .into_iter()
                    .map(|(k, v)| Self::from_toml_value(k, v))
                    .collect(),
            ),
        };
        Self { id, value }
    }

    /// First child with the given id.
    pub fn child(&self, id: &str) -> Option<&ConfigTree> {
        match &self.value {
            ConfigValue::Compound(children) => children.iter().find(|c| c.id == id),
            _ => None,
        }
    }

    pub fn value(&self) -> &ConfigValue {
        &self.value
    }
}

impl ConfigNode for ConfigTree {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> NodeKind {
        match self.value {
            ConfigValue::Compound(_) => NodeKind::Compound,
            _ => NodeKind::Scalar,
        }
    }

    fn string_value(&self) -> Option<Cow<'_, str>> {
        match &self.value {
            ConfigValue::String(s) => Some(Cow::Borrowed(s)),
            ConfigValue::Integer(i) => Some(Cow::Owned(i.to_string())),
            ConfigValue::Compound(_) => None,
        }
    }

    fn children(&self) -> Vec<&Self> {
        match &self.value {
            ConfigValue::Compound(children) => children.iter().collect(),
            _ => Vec::new(),
        }
    }
}
