//! Compilation of definitions into live schema trees.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::warn;
use value_schema_core::{
    AndRule, AnyValue, ArraySchema, AtLeastOneExistsRule, CompareOperator, ExcludedRule,
    IncludedRule, MapSchema, NotRule, ObjectSchema, OnlyOneExistsRule, OrRule,
    PropertiesComparisonRule, PropertySchema, Schema, TypeDescriptor, ValidationRule,
    ValueComparisonRule, ValueSchema, matcher,
};

use crate::error::{DefinitionError, Result};
use crate::model::{PropertyDefinition, RuleDefinition, SchemaDefinition, SchemaKind, TypeDefinition};

/// Applies the required flag and compiled rules through a schema's builders.
macro_rules! configure {
    ($schema:expr, $required:expr, $rules:expr) => {{
        let mut schema = $schema;
        if $required {
            schema = schema.make_required();
        }
        for rule in $rules {
            schema = schema.with_shared_rule(rule);
        }
        schema
    }};
}

impl SchemaDefinition {
    /// Builds the schema this definition describes.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidDefinition`](DefinitionError::InvalidDefinition) when
    /// a field does not apply to the kind, a property is declared twice or
    /// has no name, or a type name is not in the alias table.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use value_schema_core::AnyValue;
    /// use value_schema_definition::SchemaDefinition;
    ///
    /// let schema = SchemaDefinition::from_yaml_str(
    ///     "kind: object\nproperties:\n  - name: id\n    required: true\n    type: string\n",
    /// )
    /// .unwrap()
    /// .compile()
    /// .unwrap();
    ///
    /// let results = schema.validate(&AnyValue::from(json!({"id": 7})));
    /// assert_eq!(results[0].path, ".id");
    /// assert_eq!(results[0].code, "TYPE_MISMATCH");
    /// ```
    pub fn compile(&self) -> Result<Arc<dyn Schema>> {
        self.check_fields()?;
        let rules = compile_rules(&self.rules)?;

        let schema: Arc<dyn Schema> = match self.kind {
            SchemaKind::Value => Arc::new(configure!(ValueSchema::new(), self.required, rules)),
            SchemaKind::Object => {
                let mut schema = ObjectSchema::new().allow_extra_properties(self.allow_extra_properties);
                for property in &self.properties {
                    schema = schema.with_property(property.compile()?);
                }
                Arc::new(configure!(schema, self.required, rules))
            }
            SchemaKind::Array => {
                let schema = ArraySchema::new(compile_type(self.value_type.as_ref())?);
                Arc::new(configure!(schema, self.required, rules))
            }
            SchemaKind::Map => {
                let schema = MapSchema::new(
                    compile_type(self.key_type.as_ref())?,
                    compile_type(self.value_type.as_ref())?,
                );
                Arc::new(configure!(schema, self.required, rules))
            }
        };
        Ok(schema)
    }

    fn check_fields(&self) -> Result<()> {
        let invalid = |field: &str| -> Result<()> {
            Err(DefinitionError::InvalidDefinition(format!(
                "'{field}' does not apply to a {} schema",
                self.kind
            )))
        };

        if self.kind != SchemaKind::Object {
            if !self.properties.is_empty() {
                return invalid("properties");
            }
            if self.allow_extra_properties {
                return invalid("allow_extra_properties");
            }
        }
        if self.kind != SchemaKind::Map && self.key_type.is_some() {
            return invalid("key_type");
        }
        if matches!(self.kind, SchemaKind::Value | SchemaKind::Object) && self.value_type.is_some() {
            return invalid("value_type");
        }

        let mut seen = HashSet::new();
        for property in &self.properties {
            if property.name.trim().is_empty() {
                return Err(DefinitionError::InvalidDefinition(
                    "property name must not be empty".to_string(),
                ));
            }
            if !seen.insert(property.name.as_str()) {
                return Err(DefinitionError::InvalidDefinition(format!(
                    "property '{}' is declared more than once",
                    property.name
                )));
            }
        }
        Ok(())
    }
}

impl PropertyDefinition {
    /// Builds the property schema.
    pub fn compile(&self) -> Result<PropertySchema> {
        let schema = PropertySchema::new(&self.name, compile_type(self.value_type.as_ref())?);
        Ok(configure!(schema, self.required, compile_rules(&self.rules)?))
    }
}

impl RuleDefinition {
    /// Builds the validation rule.
    pub fn compile(&self) -> Result<Arc<dyn ValidationRule>> {
        let rule: Arc<dyn ValidationRule> = match self {
            RuleDefinition::Included(values) => Arc::new(IncludedRule::new(values.clone())),
            RuleDefinition::Excluded(values) => Arc::new(ExcludedRule::new(values.clone())),
            RuleDefinition::AtLeastOneExists(properties) => {
                Arc::new(AtLeastOneExistsRule::new(properties.clone()))
            }
            RuleDefinition::OnlyOneExists(properties) => {
                Arc::new(OnlyOneExistsRule::new(properties.clone()))
            }
            RuleDefinition::PropertiesComparison {
                property1,
                operation,
                property2,
            } => {
                warn_unrecognized(operation);
                Arc::new(PropertiesComparisonRule::new(
                    property1.as_str(),
                    operation.clone(),
                    property2.as_str(),
                ))
            }
            RuleDefinition::ValueComparison { operation, value } => {
                warn_unrecognized(operation);
                Arc::new(ValueComparisonRule::new(
                    operation.clone(),
                    AnyValue::from(value.clone()),
                ))
            }
            RuleDefinition::And(rules) => Arc::new(AndRule::new(compile_rules(rules)?)),
            RuleDefinition::Or(rules) => Arc::new(OrRule::new(compile_rules(rules)?)),
            RuleDefinition::Not(rule) => Arc::new(NotRule::from_shared(rule.compile()?)),
        };
        Ok(rule)
    }
}

fn compile_rules(rules: &[RuleDefinition]) -> Result<Vec<Arc<dyn ValidationRule>>> {
    rules.iter().map(RuleDefinition::compile).collect()
}

fn compile_type(value_type: Option<&TypeDefinition>) -> Result<TypeDescriptor> {
    match value_type {
        None => Ok(TypeDescriptor::Any),
        Some(TypeDefinition::Name(name)) if name.trim().eq_ignore_ascii_case("any") => {
            Ok(TypeDescriptor::Any)
        }
        Some(TypeDefinition::Name(name)) if matcher::is_known_type_name(name) => {
            Ok(TypeDescriptor::Name(name.clone()))
        }
        Some(TypeDefinition::Name(name)) => Err(DefinitionError::InvalidDefinition(format!(
            "unknown type name '{name}'"
        ))),
        Some(TypeDefinition::Schema(definition)) => Ok(TypeDescriptor::Schema(definition.compile()?)),
    }
}

/// Unrecognized operators always pass at validation time.
fn warn_unrecognized(operation: &CompareOperator) {
    if let CompareOperator::Unrecognized(token) = operation {
        warn!(operator = %token, "Comparison rule uses an unrecognized operator and always passes");
    }
}
