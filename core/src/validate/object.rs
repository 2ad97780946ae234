use crate::validate::property::PropertySchema;
use crate::validate::result::{ValidationResult, codes};
use crate::validate::schema::{
    Schema, SchemaCore, TypeDescriptor, key_path, schema_builders, validate_base,
};
use crate::{AnyValue, reflect};

/// Validates an object or map against a declared list of properties.
///
/// Declared properties are matched to actual keys by exact name. Keys left
/// over after every declared property has been processed are unexpected:
/// each produces an `UNEXPECTED_PROPERTY` warning unless extra properties are
/// allowed.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use value_schema_core::{AnyValue, ObjectSchema, Schema, TypeCode, ValidationResultType};
///
/// let schema = ObjectSchema::new()
///     .with_required_property("name", TypeCode::String)
///     .with_optional_property("age", TypeCode::Integer);
///
/// let results = schema.validate(&AnyValue::from(json!({"name": "Alice", "nick": "Al"})));
/// assert_eq!(results.len(), 1);
/// assert_eq!(results[0].path, "nick");
/// assert_eq!(results[0].result_type, ValidationResultType::Warning);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    core: SchemaCore,
    properties: Vec<PropertySchema>,
    allow_extra_properties: bool,
}

impl ObjectSchema {
    /// Creates a schema with no declared properties that warns on extra ones.
    pub fn new() -> Self {
        Self::default()
    }

    /// Controls whether undeclared properties produce warnings.
    pub fn allow_extra_properties(mut self, allow: bool) -> Self {
        self.allow_extra_properties = allow;
        self
    }

    /// Returns `true` when undeclared properties are accepted silently.
    pub fn allows_extra_properties(&self) -> bool {
        self.allow_extra_properties
    }

    /// Returns the declared properties in declaration order.
    pub fn properties(&self) -> &[PropertySchema] {
        &self.properties
    }

    /// Declares a property.
    pub fn with_property(mut self, property: PropertySchema) -> Self {
        self.properties.push(property);
        self
    }

    /// Declares a property that must be present and non-null.
    pub fn with_required_property(
        self,
        name: impl Into<String>,
        value_type: impl Into<TypeDescriptor>,
    ) -> Self {
        self.with_property(PropertySchema::new(name, value_type).make_required())
    }

    /// Declares a property that may be absent.
    pub fn with_optional_property(
        self,
        name: impl Into<String>,
        value_type: impl Into<TypeDescriptor>,
    ) -> Self {
        self.with_property(PropertySchema::new(name, value_type))
    }
}

schema_builders!(ObjectSchema);

impl Schema for ObjectSchema {
    fn core(&self) -> &SchemaCore {
        &self.core
    }

    fn perform_validation(&self, path: &str, value: &AnyValue, results: &mut Vec<ValidationResult>) {
        validate_base(self, path, value, results);
        if value.is_null() {
            return;
        }

        let mut remaining = reflect::get_properties(value);
        for property in &self.properties {
            let actual = remaining.shift_remove(property.name()).unwrap_or_default();
            property.perform_validation(path, &actual, results);
        }

        if self.allow_extra_properties {
            return;
        }
        for key in remaining.into_keys() {
            results.push(
                ValidationResult::warning(
                    key_path(path, &key),
                    codes::UNEXPECTED_PROPERTY,
                    format!("Found unexpected property {key}"),
                )
                .with_actual(key),
            );
        }
    }
}
