//! Configuration tree consumed by noise injectors and the devices that own
//! them.
//!
//! A [`ConfigNode`] is a named node carrying string attributes and ordered
//! children, the shape of an XML element.  Trees are built programmatically
//! or loaded from TOML, where tables become children and scalars become
//! attributes:
//!
//! ```toml
//! [battery.noise]
//! model = "uniform"
//! level = 0.1
//! ```

use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// ConfigNode
// ---------------------------------------------------------------------------

/// One node of a configuration tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigNode {
    name: String,
    attributes: BTreeMap<String, String>,
    children: Vec<ConfigNode>,
}

impl ConfigNode {
    /// Create an empty node.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Builder: set an attribute, replacing any previous value.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// Builder: append a child node.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Set an attribute, replacing any previous value.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl ToString) {
        self.attributes.insert(key.into(), value.to_string());
    }

    /// Tag name of this node.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw attribute text, if present.
    pub fn attribute_raw(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Parse a required attribute.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingField`] if the attribute is absent,
    /// [`ConfigError::InvalidValue`] if it does not parse as `T`.
    pub fn attribute<T>(&self, key: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let raw = self
            .attribute_raw(key)
            .ok_or_else(|| ConfigError::MissingField(key.to_owned()))?;
        parse_attribute(key, raw)
    }

    /// Parse an optional attribute, falling back to `default` when absent.
    ///
    /// A present attribute that fails to parse is still an error.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] if the attribute does not parse as `T`.
    pub fn attribute_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.attribute_raw(key)
            .map_or(Ok(default), |raw| parse_attribute(key, raw))
    }

    /// First child with the given tag name.
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Whether a child with the given tag name exists.
    pub fn has_child(&self, name: &str) -> bool {
        self.child(name).is_some()
    }

    /// All children, in insertion order.
    ///
    /// Trees loaded from TOML list sibling tables by key name, since TOML
    /// tables are unordered; an array of tables keeps its array order.
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Load a tree from TOML text.  The returned root node is called `name`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Toml`] if the text is not valid TOML.
    pub fn from_toml_str(name: impl Into<String>, text: &str) -> Result<Self, ConfigError> {
        let table: toml::Table = text.parse()?;
        Ok(Self::from_table(name.into(), &table))
    }

    /// Load a tree from a TOML file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, [`ConfigError::Toml`]
    /// if it is not valid TOML.
    pub fn from_file(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(name, &content)
    }

    fn from_table(name: String, table: &toml::Table) -> Self {
        let mut node = Self::new(name);
        for (key, value) in table {
            match value {
                toml::Value::Table(sub) => node.children.push(Self::from_table(key.clone(), sub)),
                toml::Value::Array(items) => {
                    let mut scalars = Vec::new();
                    for item in items {
                        if let toml::Value::Table(sub) = item {
                            node.children.push(Self::from_table(key.clone(), sub));
                        } else {
                            scalars.push(render_scalar(item));
                        }
                    }
                    if !scalars.is_empty() {
                        node.set_attribute(key.clone(), scalars.join(","));
                    }
                }
                scalar => node.set_attribute(key.clone(), render_scalar(scalar)),
            }
        }
        node
    }
}

fn parse_attribute<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim()
        .parse()
        .map_err(|e| ConfigError::invalid(key, format!("cannot parse `{raw}`: {e}")))
}

fn render_scalar(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
