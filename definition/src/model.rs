//! Serializable schema definitions.
//!
//! A definition is plain configuration: it is read from YAML or JSON, and
//! [`compile`](SchemaDefinition::compile)d into a live schema tree.
//!
//! # Example YAML
//!
//! ```yaml
//! kind: object
//! required: true
//! properties:
//!   - name: id
//!     required: true
//!     type: string
//!   - name: tags
//!     type: { kind: array, value_type: string }
//!   - name: role
//!     type: string
//!     rules:
//!       - included: [admin, user]
//! rules:
//!   - at_least_one_exists: [id, email]
//! ```

use std::fmt;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;
use value_schema_core::CompareOperator;

use crate::error::{DefinitionError, Result};

/// Which schema a definition compiles into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaKind {
    /// Required flag and rules only.
    Value,
    /// Declared properties of an object or map.
    Object,
    /// Every element of an array.
    Array,
    /// Every key and value of a map.
    Map,
}

impl SchemaKind {
    /// Returns the lowercase name used in definition files.
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaKind::Value => "value",
            SchemaKind::Object => "object",
            SchemaKind::Array => "array",
            SchemaKind::Map => "map",
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An expected type: an alias from the type-name table, or a nested schema.
///
/// The name `any` accepts every value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeDefinition {
    Name(String),
    Schema(Box<SchemaDefinition>),
}

/// One validation rule, written as a single-key map such as
/// `included: [a, b]` or `not: { excluded: [c] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleDefinition {
    Included(Vec<serde_json::Value>),
    Excluded(Vec<serde_json::Value>),
    AtLeastOneExists(Vec<String>),
    OnlyOneExists(Vec<String>),
    PropertiesComparison {
        property1: String,
        operation: CompareOperator,
        property2: String,
    },
    ValueComparison {
        operation: CompareOperator,
        value: serde_json::Value,
    },
    And(Vec<RuleDefinition>),
    Or(Vec<RuleDefinition>),
    Not(Box<RuleDefinition>),
}

/// A declared property of an object definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    /// Untyped when absent.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<TypeDefinition>,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        with = "serde_yaml::with::singleton_map_recursive"
    )]
    pub rules: Vec<RuleDefinition>,
}

impl PropertyDefinition {
    /// Creates an optional, untyped property.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            value_type: None,
            rules: Vec::new(),
        }
    }

    /// Marks the property as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the property type.
    pub fn with_type(mut self, value_type: TypeDefinition) -> Self {
        self.value_type = Some(value_type);
        self
    }

    /// Adds a rule.
    pub fn with_rule(mut self, rule: RuleDefinition) -> Self {
        self.rules.push(rule);
        self
    }
}

/// A schema definition as stored in a file.
///
/// Fields that do not apply to `kind` must be left out; compiling rejects
/// them.
///
/// # Examples
///
/// ```
/// use value_schema_definition::{SchemaDefinition, SchemaKind};
///
/// let definition = SchemaDefinition::from_yaml_str(
///     "kind: array\nrequired: true\nvalue_type: int\n",
/// )
/// .unwrap();
/// assert_eq!(definition.kind, SchemaKind::Array);
/// assert!(definition.required);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDefinition {
    pub kind: SchemaKind,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        with = "serde_yaml::with::singleton_map_recursive"
    )]
    pub rules: Vec<RuleDefinition>,
    /// Object only.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub allow_extra_properties: bool,
    /// Object only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<PropertyDefinition>,
    /// Map only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_type: Option<TypeDefinition>,
    /// Array and map only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<TypeDefinition>,
}

/// On-disk format of a definition, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionFormat {
    Yaml,
    Json,
}

impl DefinitionFormat {
    /// Detects the format from a `.yaml`, `.yml` or `.json` extension.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedFormat`](DefinitionError::UnsupportedFormat) for
    /// any other extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "yaml" | "yml" => Ok(DefinitionFormat::Yaml),
            "json" => Ok(DefinitionFormat::Json),
            _ => Err(DefinitionError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

impl SchemaDefinition {
    /// Creates an empty definition of the given kind.
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            required: false,
            rules: Vec::new(),
            allow_extra_properties: false,
            properties: Vec::new(),
            key_type: None,
            value_type: None,
        }
    }

    /// Loads a definition from a YAML or JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](DefinitionError::Io) if the file cannot be read,
    /// [`UnsupportedFormat`](DefinitionError::UnsupportedFormat) for an
    /// unknown extension, or a parse error from the chosen format.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = DefinitionFormat::from_path(path)?;
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let definition: Self = match format {
            DefinitionFormat::Yaml => serde_yaml::from_reader(reader)?,
            DefinitionFormat::Json => serde_json::from_reader(reader)?,
        };
        debug!(path = %path.display(), kind = %definition.kind, "Loaded schema definition");
        Ok(definition)
    }

    /// Saves the definition in the format matching the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](DefinitionError::Io) if the file cannot be written,
    /// [`UnsupportedFormat`](DefinitionError::UnsupportedFormat) for an
    /// unknown extension, or a serialization error.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = DefinitionFormat::from_path(path)?;
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        match format {
            DefinitionFormat::Yaml => serde_yaml::to_writer(writer, self)?,
            DefinitionFormat::Json => serde_json::to_writer_pretty(writer, self)?,
        }
        Ok(())
    }

    /// Parses a YAML definition.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Parses a JSON definition.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serializes to YAML.
    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Serializes to JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const USER_YAML: &str = r#"
kind: object
required: true
properties:
  - name: id
    required: true
    type: string
  - name: tags
    type: { kind: array, value_type: string }
  - name: age
    type: int
    rules:
      - value_comparison: { operation: ">=", value: 0 }
rules:
  - at_least_one_exists: [id, email]
  - not:
      included: [root]
"#;

    #[test]
    fn test_parse_yaml() {
        let definition = SchemaDefinition::from_yaml_str(USER_YAML).unwrap();
        assert_eq!(definition.kind, SchemaKind::Object);
        assert!(definition.required);
        assert_eq!(definition.properties.len(), 3);
        assert_eq!(
            definition.properties[0].value_type,
            Some(TypeDefinition::Name("string".into()))
        );

        let Some(TypeDefinition::Schema(tags)) = &definition.properties[1].value_type else {
            panic!("expected nested schema");
        };
        assert_eq!(tags.kind, SchemaKind::Array);

        assert_eq!(
            definition.properties[2].rules,
            vec![RuleDefinition::ValueComparison {
                operation: CompareOperator::Ge,
                value: json!(0),
            }]
        );
        assert_eq!(
            definition.rules,
            vec![
                RuleDefinition::AtLeastOneExists(vec!["id".into(), "email".into()]),
                RuleDefinition::Not(Box::new(RuleDefinition::Included(vec![json!("root")]))),
            ]
        );
    }

    #[test]
    fn test_parse_json() {
        let text = json!({
            "kind": "map",
            "key_type": "string",
            "value_type": "int",
            "rules": [{"or": [{"included": [1]}, {"excluded": [2]}]}]
        })
        .to_string();
        let definition = SchemaDefinition::from_json_str(&text).unwrap();
        assert_eq!(definition.kind, SchemaKind::Map);
        assert_eq!(definition.key_type, Some(TypeDefinition::Name("string".into())));
        assert!(matches!(&definition.rules[0], RuleDefinition::Or(rules) if rules.len() == 2));
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let err = SchemaDefinition::from_yaml_str("kind: value\nrequird: true\n").unwrap_err();
        assert!(matches!(err, DefinitionError::Yaml(_)));
    }

    #[test]
    fn test_yaml_and_json_agree() {
        let definition = SchemaDefinition::from_yaml_str(USER_YAML).unwrap();
        let from_json = SchemaDefinition::from_json_str(&definition.to_json_string().unwrap()).unwrap();
        let from_yaml = SchemaDefinition::from_yaml_str(&definition.to_yaml_string().unwrap()).unwrap();
        assert_eq!(from_json, definition);
        assert_eq!(from_yaml, definition);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            DefinitionFormat::from_path(Path::new("a/schema.YML")).unwrap(),
            DefinitionFormat::Yaml
        );
        assert_eq!(
            DefinitionFormat::from_path(Path::new("schema.json")).unwrap(),
            DefinitionFormat::Json
        );
        assert!(matches!(
            DefinitionFormat::from_path(Path::new("schema.toml")),
            Err(DefinitionError::UnsupportedFormat(_))
        ));
    }
}
