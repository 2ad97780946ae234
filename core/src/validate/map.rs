use crate::validate::result::{ValidationResult, codes, display_name};
use crate::validate::schema::{
    Schema, SchemaCore, TypeDescriptor, key_path, perform_type_validation, schema_builders,
    validate_base,
};
use crate::{AnyValue, TypeCode};

/// Validates every key and value of a map.
///
/// Both the key and the value of an entry are reported at `path.key`. A
/// non-map value is an error only when the schema is required; an optional
/// schema accepts it silently, unlike [`ArraySchema`](crate::ArraySchema).
#[derive(Debug, Clone, Default)]
pub struct MapSchema {
    core: SchemaCore,
    key_type: TypeDescriptor,
    value_type: TypeDescriptor,
}

impl MapSchema {
    /// Creates a schema checking every key against `key_type` and every value against `value_type`.
    pub fn new(key_type: impl Into<TypeDescriptor>, value_type: impl Into<TypeDescriptor>) -> Self {
        Self {
            core: SchemaCore::default(),
            key_type: key_type.into(),
            value_type: value_type.into(),
        }
    }

    /// Returns the key type.
    pub fn key_type(&self) -> &TypeDescriptor {
        &self.key_type
    }

    /// Returns the value type.
    pub fn value_type(&self) -> &TypeDescriptor {
        &self.value_type
    }
}

schema_builders!(MapSchema);

impl Schema for MapSchema {
    fn core(&self) -> &SchemaCore {
        &self.core
    }

    fn perform_validation(&self, path: &str, value: &AnyValue, results: &mut Vec<ValidationResult>) {
        validate_base(self, path, value, results);
        if value.is_null() {
            return;
        }

        let Some(map) = value.as_map() else {
            if self.is_required() {
                let actual = value.type_code();
                results.push(
                    ValidationResult::error(
                        path,
                        codes::VALUE_ISNOT_MAP,
                        format!("{} must be a map but found {}", display_name(path), actual),
                    )
                    .with_expected(TypeCode::Map.as_str())
                    .with_actual(actual.as_str()),
                );
            }
            return;
        };

        for (key, entry) in map.entries() {
            let entry_path = key_path(path, &key);
            perform_type_validation(&entry_path, &self.key_type, &AnyValue::String(key), results);
            perform_type_validation(&entry_path, &self.value_type, &entry, results);
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_entry_values_are_checked() {
        let schema = MapSchema::new(TypeCode::String, TypeCode::Integer);
        let results = schema.validate(&AnyValue::from(json!({"a": 1, "b": "two"})));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, "b");
        assert_eq!(results[0].code, codes::TYPE_MISMATCH);
    }

    #[test]
    fn test_keys_are_checked_as_strings() {
        let schema = MapSchema::new(TypeCode::Integer, TypeDescriptor::Any);
        let results = schema.validate(&AnyValue::from(json!({"1": true})));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].actual, AnyValue::from("String"));
    }

    #[test]
    fn test_optional_non_map_is_accepted() {
        let schema = MapSchema::new(TypeCode::String, TypeCode::String);
        assert!(schema.validate(&"text".into()).is_empty());

        let results = schema.make_required().validate(&"text".into());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].code, codes::VALUE_ISNOT_MAP);
    }

    #[test]
    fn test_objects_are_not_maps() {
        let schema = MapSchema::new(TypeCode::String, TypeCode::String).make_required();
        let results = schema.validate(&crate::AnyObject::new().with("a", "b").into());
        assert_eq!(results[0].code, codes::VALUE_ISNOT_MAP);
    }
}
